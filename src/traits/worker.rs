// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ProcessError;
use crate::process::WorkerExit;
use crate::protocol::Command;

/// Outcome of asking a worker to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePhase {
    /// A termination signal went out; wait for the exit event.
    Pending,
    /// Nothing was running, so the close is already complete.
    Closed,
}

/// The owner's handle on one worker process.
///
/// Implemented by [`ClientProcessSupervisor`](crate::process::ClientProcessSupervisor)
/// for real processes. Endpoints are generic over it so their state machines
/// can be driven without spawning anything.
pub trait WorkerLink: Send {
    /// Launch the worker running `command`.
    fn spawn(&mut self, command: &Command) -> Result<(), ProcessError>;

    /// Send one newline-terminated line to the worker. A no-op unless running.
    fn write(&mut self, line: &str);

    /// Start terminating the worker.
    fn request_close(&mut self) -> ClosePhase;

    /// Record that the worker's exit event has been observed.
    fn confirm_exit(&mut self, exit: &WorkerExit);

    /// Record a process-level error reported by the worker.
    fn mark_failed(&mut self, error: &ProcessError);

    fn is_running(&self) -> bool;
}
