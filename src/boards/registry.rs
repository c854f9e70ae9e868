// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::errors::DiscoveryError;

use super::{BoardAddress, BoardDescriptor, CardId};

/// Table of discovered boards, built once from discovery output.
///
/// The registry is never mutated after construction. Endpoints borrow it
/// while they resolve their address and keep nothing but the address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardRegistry {
    boards: Vec<BoardDescriptor>,
}

impl BoardRegistry {
    /// Build a registry, rejecting tables where two boards share an id.
    pub fn from_descriptors(boards: Vec<BoardDescriptor>) -> Result<Self, DiscoveryError> {
        let mut seen = HashSet::new();
        for board in &boards {
            if !seen.insert(&board.id) {
                return Err(DiscoveryError::DuplicateBoardId(board.id.to_string()));
            }
        }
        Ok(Self { boards })
    }

    /// Parse the complete standard output of the discovery subcommand.
    pub fn parse_discovery_output(stdout: &[u8]) -> Result<Self, DiscoveryError> {
        let boards: Vec<BoardDescriptor> = serde_json::from_slice(stdout)
            .map_err(|e| DiscoveryError::MalformedOutput(e.to_string()))?;
        Self::from_descriptors(boards)
    }

    /// Address of the first board whose id matches `card_id`.
    pub fn lookup(&self, card_id: &CardId) -> Option<&BoardAddress> {
        self.boards
            .iter()
            .find(|board| &board.id == card_id)
            .map(|board| &board.address)
    }

    /// True when discovery produced at least one board.
    pub fn is_populated(&self) -> bool {
        !self.boards.is_empty()
    }

    /// Read-only view of the table, in discovery order.
    pub fn snapshot(&self) -> &[BoardDescriptor] {
        &self.boards
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Render the table as the JSON array served to external callers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.boards)
    }
}
