// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for board address discovery.
//!
//! This module contains message types for logging events related to:
//! * Launching the discovery subcommand
//! * Rejected discovery output
//! * The resulting board table

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Discovery subcommand about to run.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use touchbridge_flow::observability::messages::discovery::DiscoveryStarted;
///
/// let msg = DiscoveryStarted {
///     program: "tbg_client",
///     server: Some("tcp://192.168.2.11:5555"),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct DiscoveryStarted<'a> {
    pub program: &'a str,
    pub server: Option<&'a str>,
}

impl Display for DiscoveryStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.server {
            Some(server) => write!(
                f,
                "Starting board address discovery with '{}' via server {}",
                self.program, server
            ),
            None => write!(f, "Starting board address discovery with '{}'", self.program),
        }
    }
}

impl StructuredLog for DiscoveryStarted<'_> {
    fn log(&self) {
        tracing::info!(program = self.program, server = self.server, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "discovery",
            span_name = name,
            program = self.program,
            server = self.server,
        )
    }
}

/// Discovery failed; no endpoint can be built this session.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DiscoveryFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for DiscoveryFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Touchbridge address discovery failed: {}", self.error)
    }
}

impl StructuredLog for DiscoveryFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }
}

/// The raw output that could not be parsed, for diagnosis.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct DiscoveryOutputRejected<'a> {
    pub stdout: &'a str,
}

impl Display for DiscoveryOutputRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Discovery stdout was: {}", self.stdout)
    }
}

impl StructuredLog for DiscoveryOutputRejected<'_> {
    fn log(&self) {
        tracing::warn!(stdout_len = self.stdout.len(), "{}", self);
    }
}

/// One board from the discovered table.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use touchbridge_flow::observability::messages::discovery::BoardListed;
///
/// let msg = BoardListed {
///     address: "5",
///     card_id: "0x00000000000100000000AB01",
///     product_id: "tbg-hco",
/// };
///
/// assert_eq!(msg.to_string(), "5 : 0x00000000000100000000AB01 : tbg-hco");
/// ```
pub struct BoardListed<'a> {
    pub address: &'a str,
    pub card_id: &'a str,
    pub product_id: &'a str,
}

impl Display for BoardListed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} : {} : {}", self.address, self.card_id, self.product_id)
    }
}

impl StructuredLog for BoardListed<'_> {
    fn log(&self) {
        tracing::info!(
            address = self.address,
            card_id = self.card_id,
            product_id = self.product_id,
            "{}", self
        );
    }
}

/// Discovery succeeded and the board table is installed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DiscoveryCompleted {
    pub board_count: usize,
}

impl Display for DiscoveryCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Address discovery completed: {} boards", self.board_count)
    }
}

impl StructuredLog for DiscoveryCompleted {
    fn log(&self) {
        tracing::info!(board_count = self.board_count, "{}", self);
    }
}
