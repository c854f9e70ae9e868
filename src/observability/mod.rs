// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! All operational log lines in the bridge come from the message types in
//! [`messages`]. Each message is a small struct implementing `Display` and
//! [`messages::StructuredLog`], which keeps wording in one place and emits
//! the same structured fields every time an event is logged.
//!
//! # Usage
//!
//! ```rust
//! use touchbridge_flow::observability::messages::StructuredLog;
//! use touchbridge_flow::observability::messages::discovery::DiscoveryCompleted;
//!
//! DiscoveryCompleted { board_count: 3 }.log();
//! ```

pub mod messages;
