// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Binding an endpoint's configuration to a discovered board.
//!
//! Checks run in a fixed order so the warning names the first problem:
//!
//! 1. **Board table**: discovery must have produced at least one board
//! 2. **Card**: the configured card id must be present in the table
//! 3. **Pin**: a pin must be configured
//!
//! A failure here is local to one endpoint. It never aborts the session.

use crate::boards::{BoardAddress, BoardRegistry};
use crate::config::EndpointConfig;
use crate::errors::ConfigError;

/// Where an endpoint's worker talks to: a board address and a pin on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub address: BoardAddress,
    pub pin: u32,
}

/// Resolve `endpoint` against the board table.
///
/// # Examples
/// ```
/// use touchbridge_flow::boards::{BoardAddress, BoardRegistry, CardId};
/// use touchbridge_flow::config::{resolve_binding, EndpointConfig, EndpointKind};
/// use touchbridge_flow::errors::ConfigError;
///
/// let registry = BoardRegistry::parse_discovery_output(
///     br#"[{"id": 171, "addr": 5, "product": {"id": "tbg-din"}}]"#,
/// ).unwrap();
///
/// let door = EndpointConfig::new("door", EndpointKind::DigitalInput, Some(CardId::from("0xAB")), Some(3));
/// let binding = resolve_binding(&door, &registry).unwrap();
/// assert_eq!(binding.address, BoardAddress::from(5));
/// assert_eq!(binding.pin, 3);
///
/// let half = EndpointConfig::new("half", EndpointKind::DigitalInput, Some(CardId::from(171)), None);
/// assert_eq!(resolve_binding(&half, &registry), Err(ConfigError::MissingPin));
/// ```
pub fn resolve_binding(
    endpoint: &EndpointConfig,
    registry: &BoardRegistry,
) -> Result<Binding, ConfigError> {
    if !registry.is_populated() {
        return Err(ConfigError::MissingBoardTable);
    }

    let address = endpoint
        .card
        .as_ref()
        .and_then(|card| registry.lookup(card))
        .ok_or_else(|| ConfigError::UnknownCard {
            card_id: endpoint.card.clone(),
        })?;

    let pin = endpoint.pin.ok_or(ConfigError::MissingPin)?;

    Ok(Binding {
        address: address.clone(),
        pin,
    })
}
