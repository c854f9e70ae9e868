// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `discovery` - Board address discovery
//! * `worker` - Worker process lifecycle and I/O failures
//! * `endpoint` - Endpoint binding, traffic and shutdown

use tracing::Span;

pub mod discovery;
pub mod endpoint;
pub mod worker;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its level, with its fields attached.
    fn log(&self);

    /// A span carrying the message's fields, for instrumenting work that
    /// follows the event.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}
