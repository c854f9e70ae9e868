// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Board identifiers and bus addresses.
//!
//! Both arrive from discovery output and from deployment files as either a
//! JSON number or a string. Identifiers are compared through a single
//! canonical form: anything that parses as a non-negative integer (decimal,
//! or `0x`-prefixed hex) compares by value, everything else compares as
//! trimmed text. So `"0x10"`, `"16"` and `16` are the same card, and
//! `"007"` equals `7`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A scalar that may be written as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Canonical {
    Numeric(u128),
    Text(String),
}

fn canonicalize(text: &str) -> Canonical {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() => u128::from_str_radix(hex, 16).ok(),
        Some(_) => None,
        None if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
            trimmed.parse::<u128>().ok()
        }
        None => None,
    };
    match parsed {
        Some(value) => Canonical::Numeric(value),
        None => Canonical::Text(trimmed.to_string()),
    }
}

/// Identifier of a board as reported by discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Scalar);

impl CardId {
    fn canonical(&self) -> Canonical {
        canonicalize(&self.0.to_string())
    }
}

impl PartialEq for CardId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for CardId {}

impl Hash for CardId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CardId {
    fn from(text: &str) -> Self {
        CardId(Scalar::Text(text.to_string()))
    }
}

impl From<u64> for CardId {
    fn from(value: u64) -> Self {
        CardId(Scalar::Number(value.into()))
    }
}

/// Opaque bus address of a board, passed through to the worker verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardAddress(Scalar);

impl fmt::Display for BoardAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for BoardAddress {
    fn from(value: u64) -> Self {
        BoardAddress(Scalar::Number(value.into()))
    }
}

impl From<&str> for BoardAddress {
    fn from(text: &str) -> Self {
        BoardAddress(Scalar::Text(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_equivalence() {
        struct TestCase {
            name: &'static str,
            left: CardId,
            right: CardId,
            equal: bool,
        }

        let test_cases = vec![
            TestCase { name: "number vs decimal text", left: CardId::from(16), right: CardId::from("16"), equal: true },
            TestCase { name: "number vs hex text", left: CardId::from(16), right: CardId::from("0x10"), equal: true },
            TestCase { name: "hex case", left: CardId::from("0x00AB"), right: CardId::from("0xab"), equal: true },
            TestCase { name: "leading zeros", left: CardId::from("007"), right: CardId::from(7), equal: true },
            TestCase { name: "surrounding whitespace", left: CardId::from(" pump "), right: CardId::from("pump"), equal: true },
            TestCase { name: "different text", left: CardId::from("pump"), right: CardId::from("Pump"), equal: false },
            TestCase { name: "different numbers", left: CardId::from(1), right: CardId::from(2), equal: false },
            TestCase { name: "bare hex prefix is text", left: CardId::from("0x"), right: CardId::from(0), equal: false },
        ];

        for case in test_cases {
            assert_eq!(case.left == case.right, case.equal, "{}", case.name);
        }
    }

    #[test]
    fn test_wide_hardware_ids_compare_numerically() {
        let discovered = CardId::from("0x000000000001000000000042");
        let configured = CardId::from("0x1000000000042");
        assert_eq!(discovered, configured);
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let ids: Vec<CardId> = serde_json::from_str(r#"[5, "5", "0x5"]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[1], ids[2]);

        let addr: BoardAddress = serde_json::from_str("12").unwrap();
        assert_eq!(addr.to_string(), "12");
    }
}
