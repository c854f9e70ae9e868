// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::{BoardAddress, CardId};

/// One board from the discovery table. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDescriptor {
    pub id: CardId,
    #[serde(rename = "addr")]
    pub address: BoardAddress,
    pub product: ProductInfo,
}

/// Product block of a descriptor. Only `id` is interpreted; the rest is kept
/// so the host read endpoint can hand it back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProductInfo {
    /// Product id rendered for log lines, without JSON string quotes.
    pub fn id_text(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
