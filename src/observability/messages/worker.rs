// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for worker process lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Worker launch and launch failures
//! * Input channel writes and write failures
//! * Termination signals and exits
//! * Worker diagnostics on stderr

use crate::errors::ProcessError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Worker launched.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use touchbridge_flow::observability::messages::worker::WorkerSpawned;
///
/// let msg = WorkerSpawned {
///     worker: "door",
///     command: "din 5 3",
///     pid: Some(4242),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct WorkerSpawned<'a> {
    pub worker: &'a str,
    pub command: &'a str,
    pub pid: Option<u32>,
}

impl Display for WorkerSpawned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' started: command='{}', pid={:?}",
            self.worker, self.command, self.pid
        )
    }
}

impl StructuredLog for WorkerSpawned<'_> {
    fn log(&self) {
        tracing::info!(
            worker = self.worker,
            command = self.command,
            pid = self.pid,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "worker",
            span_name = name,
            worker = self.worker,
            pid = self.pid,
        )
    }
}

/// Worker could not be launched.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerSpawnFailed<'a> {
    pub worker: &'a str,
    pub command: &'a str,
    pub error: &'a ProcessError,
}

impl Display for WorkerSpawnFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' failed to start '{}': {}",
            self.worker, self.command, self.error
        )
    }
}

impl StructuredLog for WorkerSpawnFailed<'_> {
    fn log(&self) {
        tracing::error!(
            worker = self.worker,
            command = self.command,
            error = %self.error,
            "{}", self
        );
    }
}

/// A line was not written because the worker is not running.
///
/// # Log Level
/// `debug!` - Expected during startup failures and shutdown
pub struct WorkerWriteSkipped<'a> {
    pub worker: &'a str,
    pub line: &'a str,
}

impl Display for WorkerWriteSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker '{}' not running, dropped '{}'", self.worker, self.line)
    }
}

impl StructuredLog for WorkerWriteSkipped<'_> {
    fn log(&self) {
        tracing::debug!(worker = self.worker, line = self.line, "{}", self);
    }
}

/// Writing to the worker's input channel failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerWriteFailed<'a> {
    pub worker: &'a str,
    pub error: &'a ProcessError,
}

impl Display for WorkerWriteFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker '{}' input channel failed: {}", self.worker, self.error)
    }
}

impl StructuredLog for WorkerWriteFailed<'_> {
    fn log(&self) {
        tracing::error!(worker = self.worker, error = %self.error, "{}", self);
    }
}

/// The worker reported a process-level error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerFailed<'a> {
    pub worker: &'a str,
    pub error: &'a ProcessError,
}

impl Display for WorkerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker '{}' command error: {}", self.worker, self.error)
    }
}

impl StructuredLog for WorkerFailed<'_> {
    fn log(&self) {
        tracing::error!(worker = self.worker, error = %self.error, "{}", self);
    }
}

/// Close requested; a termination signal is on its way.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerCloseRequested<'a> {
    pub worker: &'a str,
    pub pid: Option<u32>,
}

impl Display for WorkerCloseRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Closing worker '{}' (pid={:?})", self.worker, self.pid)
    }
}

impl StructuredLog for WorkerCloseRequested<'_> {
    fn log(&self) {
        tracing::info!(worker = self.worker, pid = self.pid, "{}", self);
    }
}

/// A signal was delivered (or failed to be delivered) to the worker.
///
/// # Log Level
/// `debug!` on success, `warn!` when `kill` failed
pub struct WorkerSignalled<'a> {
    pub worker: &'a str,
    pub pid: u32,
    pub signal: i32,
    pub error: Option<&'a std::io::Error>,
}

impl Display for WorkerSignalled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.error {
            None => write!(
                f,
                "Sent signal {} to worker '{}' (pid {})",
                self.signal, self.worker, self.pid
            ),
            Some(error) => write!(
                f,
                "Failed to send signal {} to worker '{}' (pid {}): {}",
                self.signal, self.worker, self.pid, error
            ),
        }
    }
}

impl StructuredLog for WorkerSignalled<'_> {
    fn log(&self) {
        match self.error {
            None => tracing::debug!(worker = self.worker, pid = self.pid, signal = self.signal, "{}", self),
            Some(_) => tracing::warn!(worker = self.worker, pid = self.pid, signal = self.signal, "{}", self),
        }
    }
}

/// The worker ignored SIGTERM for the whole grace period and is being killed.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct WorkerKillEscalated<'a> {
    pub worker: &'a str,
    pub pid: Option<u32>,
    pub grace: Duration,
}

impl Display for WorkerKillEscalated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' (pid={:?}) still running {:?} after SIGTERM, killing",
            self.worker, self.pid, self.grace
        )
    }
}

impl StructuredLog for WorkerKillEscalated<'_> {
    fn log(&self) {
        tracing::warn!(
            worker = self.worker,
            pid = self.pid,
            grace_ms = self.grace.as_millis() as u64,
            "{}", self
        );
    }
}

/// Worker exit observed.
///
/// # Log Level
/// `info!` when the exit was requested, `warn!` otherwise
///
/// # Example
/// ```
/// use touchbridge_flow::observability::messages::worker::WorkerExited;
///
/// let msg = WorkerExited {
///     worker: "door",
///     pid: Some(4242),
///     code: None,
///     signal: Some(15),
///     requested: true,
/// };
///
/// assert!(msg.to_string().contains("signal=Some(15)"));
/// ```
pub struct WorkerExited<'a> {
    pub worker: &'a str,
    pub pid: Option<u32>,
    pub code: Option<i32>,
    pub signal: Option<i32>,
    pub requested: bool,
}

impl Display for WorkerExited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' exited: pid={:?}, code={:?}, signal={:?}",
            self.worker, self.pid, self.code, self.signal
        )
    }
}

impl StructuredLog for WorkerExited<'_> {
    fn log(&self) {
        if self.requested {
            tracing::info!(worker = self.worker, code = self.code, signal = self.signal, "{}", self);
        } else {
            tracing::warn!(worker = self.worker, code = self.code, signal = self.signal, "{}", self);
        }
    }
}

/// Diagnostic output from the worker.
///
/// # Log Level
/// `debug!` - Worker chatter, never surfaced to the bus
pub struct WorkerStderr<'a> {
    pub worker: &'a str,
    pub text: &'a str,
}

impl Display for WorkerStderr<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker '{}' stderr: {}", self.worker, self.text.trim_end())
    }
}

impl StructuredLog for WorkerStderr<'_> {
    fn log(&self) {
        tracing::debug!(worker = self.worker, "{}", self);
    }
}
