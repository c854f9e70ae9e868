// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::EndpointKind;
use crate::process::ProcessObserver;
use crate::traits::{ClosePhase, InboundMessage};

/// Lifecycle of an endpoint.
///
/// Wire writes happen only while `Running`; samples are published only
/// while `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// Configuration was rejected; no worker was ever launched.
    Inert,
    Running,
    /// Close requested; output is suppressed until the worker exits.
    Closing,
    Closed,
}

/// One configured I/O channel bridged to the host bus.
pub trait Endpoint: ProcessObserver + Send {
    fn id(&self) -> &str;

    fn kind(&self) -> EndpointKind;

    fn state(&self) -> EndpointState;

    /// Handle a message from the host bus.
    fn on_input(&mut self, message: &InboundMessage);

    /// Host-initiated close. Returns `Pending` when the caller has to wait
    /// for the worker's exit event before reporting completion.
    fn begin_close(&mut self) -> ClosePhase;
}
