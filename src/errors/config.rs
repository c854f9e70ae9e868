// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::boards::CardId;

/// Reasons an endpoint's configuration cannot be bound to a board.
///
/// These are local to one endpoint: the endpoint stays inert and the
/// rest of the session carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Discovery never populated the board table
    MissingBoardTable,
    /// The configured card id is absent (or unset) in the board table
    UnknownCard {
        /// The card id from the endpoint config, if one was given
        card_id: Option<CardId>,
    },
    /// No pin was configured
    MissingPin,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBoardTable => {
                write!(f, "No boards available: address discovery has not populated the board table")
            }
            ConfigError::UnknownCard { card_id: Some(card_id) } => {
                write!(f, "Invalid card: '{}' is not in the board table", card_id)
            }
            ConfigError::UnknownCard { card_id: None } => {
                write!(f, "Invalid card: no card id configured")
            }
            ConfigError::MissingPin => write!(f, "Invalid pin: no pin configured"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_card() {
        let err = ConfigError::UnknownCard {
            card_id: Some(CardId::from("0x00AB")),
        };
        assert!(err.to_string().contains("'0x00AB'"));
        assert_eq!(
            ConfigError::MissingPin.to_string(),
            "Invalid pin: no pin configured"
        );
    }
}
