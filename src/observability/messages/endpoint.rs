// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for endpoint lifecycle and bus traffic.
//!
//! This module contains message types for logging events related to:
//! * Binding an endpoint to its board, or rejecting its configuration
//! * Samples published to the bus and inbound messages written or ignored
//! * Host-initiated close and unexpected worker exits

use crate::config::EndpointKind;
use crate::errors::{ConfigError, ProcessError};
use crate::observability::messages::StructuredLog;
use crate::traits::EndpointStatus;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Configuration could not be bound to a board; the endpoint stays inert.
///
/// # Log Level
/// `warn!` - The session continues without this endpoint
///
/// # Example
/// ```
/// use touchbridge_flow::config::EndpointKind;
/// use touchbridge_flow::errors::ConfigError;
/// use touchbridge_flow::observability::messages::endpoint::EndpointRejected;
///
/// let msg = EndpointRejected {
///     endpoint: "door",
///     kind: EndpointKind::DigitalInput,
///     error: &ConfigError::MissingPin,
/// };
///
/// assert!(msg.to_string().contains("Invalid pin"));
/// ```
pub struct EndpointRejected<'a> {
    pub endpoint: &'a str,
    pub kind: EndpointKind,
    pub error: &'a ConfigError,
}

impl Display for EndpointRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Endpoint '{}' ({}) left inert: {}",
            self.endpoint, self.kind, self.error
        )
    }
}

impl StructuredLog for EndpointRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            endpoint = self.endpoint,
            kind = %self.kind,
            error = %self.error,
            "{}", self
        );
    }
}

/// Endpoint bound and its worker launched.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EndpointStarted<'a> {
    pub endpoint: &'a str,
    pub kind: EndpointKind,
    pub command: &'a str,
}

impl Display for EndpointStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Endpoint '{}' ({}) running '{}'",
            self.endpoint, self.kind, self.command
        )
    }
}

impl StructuredLog for EndpointStarted<'_> {
    fn log(&self) {
        tracing::info!(
            endpoint = self.endpoint,
            kind = %self.kind,
            command = self.command,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "endpoint",
            span_name = name,
            endpoint = self.endpoint,
            kind = %self.kind,
        )
    }
}

/// Endpoint worker could not be launched.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct EndpointLaunchFailed<'a> {
    pub endpoint: &'a str,
    pub error: &'a ProcessError,
}

impl Display for EndpointLaunchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Endpoint '{}' could not start its worker: {}", self.endpoint, self.error)
    }
}

impl StructuredLog for EndpointLaunchFailed<'_> {
    fn log(&self) {
        tracing::error!(endpoint = self.endpoint, error = %self.error, "{}", self);
    }
}

/// Endpoint worker reported a process-level error while running.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct EndpointFailed<'a> {
    pub endpoint: &'a str,
    pub error: &'a ProcessError,
}

impl Display for EndpointFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Endpoint '{}' worker error: {}", self.endpoint, self.error)
    }
}

impl StructuredLog for EndpointFailed<'_> {
    fn log(&self) {
        tracing::error!(endpoint = self.endpoint, error = %self.error, "{}", self);
    }
}

/// One decoded sample sent to the bus.
///
/// # Log Level
/// `debug!` - Per-sample traffic
pub struct SamplePublished<'a> {
    pub endpoint: &'a str,
    pub topic: &'a str,
    pub value: f64,
}

impl Display for SamplePublished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Endpoint '{}' published {} = {}", self.endpoint, self.topic, self.value)
    }
}

impl StructuredLog for SamplePublished<'_> {
    fn log(&self) {
        tracing::debug!(
            endpoint = self.endpoint,
            topic = self.topic,
            value = self.value,
            "{}", self
        );
    }
}

/// One line written to the endpoint's worker.
///
/// # Log Level
/// `debug!` - Per-message traffic
pub struct OutputWritten<'a> {
    pub endpoint: &'a str,
    pub line: &'a str,
}

impl Display for OutputWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Endpoint '{}' wrote '{}'", self.endpoint, self.line)
    }
}

impl StructuredLog for OutputWritten<'_> {
    fn log(&self) {
        tracing::debug!(endpoint = self.endpoint, line = self.line, "{}", self);
    }
}

/// An inbound message was dropped without reaching the worker.
///
/// # Log Level
/// `debug!` - Expected for inert endpoints and non-numeric payloads
///
/// # Example
/// ```
/// use touchbridge_flow::observability::messages::endpoint::InboundIgnored;
///
/// let msg = InboundIgnored {
///     endpoint: "lamp",
///     reason: "payload is not numeric",
/// };
///
/// assert_eq!(msg.to_string(), "Endpoint 'lamp' ignored inbound message: payload is not numeric");
/// ```
pub struct InboundIgnored<'a> {
    pub endpoint: &'a str,
    pub reason: &'a str,
}

impl Display for InboundIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Endpoint '{}' ignored inbound message: {}", self.endpoint, self.reason)
    }
}

impl StructuredLog for InboundIgnored<'_> {
    fn log(&self) {
        tracing::debug!(endpoint = self.endpoint, reason = self.reason, "{}", self);
    }
}

/// Host asked the endpoint to close.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EndpointCloseRequested<'a> {
    pub endpoint: &'a str,
}

impl Display for EndpointCloseRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Closing endpoint '{}'", self.endpoint)
    }
}

impl StructuredLog for EndpointCloseRequested<'_> {
    fn log(&self) {
        tracing::info!(endpoint = self.endpoint, "{}", self);
    }
}

/// Close completed; the worker (if any) has exited.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EndpointClosed<'a> {
    pub endpoint: &'a str,
}

impl Display for EndpointClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Endpoint '{}' closed", self.endpoint)
    }
}

impl StructuredLog for EndpointClosed<'_> {
    fn log(&self) {
        tracing::info!(endpoint = self.endpoint, "{}", self);
    }
}

/// Worker exited while the endpoint was still running. It is not restarted.
///
/// # Log Level
/// `warn!` - Endpoint is dead until redeployed
pub struct EndpointStopped<'a> {
    pub endpoint: &'a str,
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl Display for EndpointStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Endpoint '{}' worker stopped unexpectedly: code={:?}, signal={:?}",
            self.endpoint, self.code, self.signal
        )
    }
}

impl StructuredLog for EndpointStopped<'_> {
    fn log(&self) {
        tracing::warn!(
            endpoint = self.endpoint,
            code = self.code,
            signal = self.signal,
            "{}", self
        );
    }
}

/// New display status for an endpoint.
///
/// # Log Level
/// `debug!` - Changes with every sample or write
pub struct EndpointStatusChanged<'a> {
    pub endpoint: &'a str,
    pub status: &'a EndpointStatus,
}

impl Display for EndpointStatusChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Endpoint '{}' status: {}", self.endpoint, self.status)
    }
}

impl StructuredLog for EndpointStatusChanged<'_> {
    fn log(&self) {
        tracing::debug!(endpoint = self.endpoint, status = %self.status, "{}", self);
    }
}

/// A bus message named an endpoint that is not running.
///
/// # Log Level
/// `warn!` - Likely a host-side addressing mistake
pub struct UnknownEndpoint<'a> {
    pub endpoint: &'a str,
}

impl Display for UnknownEndpoint<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No endpoint '{}' in this session, message dropped", self.endpoint)
    }
}

impl StructuredLog for UnknownEndpoint<'_> {
    fn log(&self) {
        tracing::warn!(endpoint = self.endpoint, "{}", self);
    }
}
