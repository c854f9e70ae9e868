// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! State shared by every endpoint kind.
//!
//! [`EndpointCore`] owns the worker link and the host context, and enforces
//! the lifecycle rules common to all four kinds:
//!
//! * wire writes happen only while `Running`,
//! * samples reach the bus only while `Running`,
//! * `Closing` is entered before the termination signal goes out, so no
//!   sample read after the signal is ever published,
//! * a worker exit is never followed by a restart.

use std::sync::Arc;

use crate::boards::BoardRegistry;
use crate::config::{resolve_binding, Binding, EndpointConfig, EndpointKind};
use crate::errors::ProcessError;
use crate::observability::messages::endpoint::*;
use crate::observability::messages::worker::WorkerStderr;
use crate::observability::messages::StructuredLog;
use crate::process::WorkerExit;
use crate::protocol::Command;
use crate::traits::{
    ClosePhase, EndpointState, EndpointStatus, FlowContext, OutboundMessage, WorkerLink,
};

pub struct EndpointCore<W: WorkerLink> {
    id: String,
    kind: EndpointKind,
    worker: W,
    context: Arc<dyn FlowContext>,
    state: EndpointState,
    /// A process error was reported; the error status outlives the exit.
    failed: bool,
}

impl<W: WorkerLink> EndpointCore<W> {
    pub fn new(config: &EndpointConfig, worker: W, context: Arc<dyn FlowContext>) -> Self {
        Self {
            id: config.id.clone(),
            kind: config.kind,
            worker,
            context,
            state: EndpointState::Inert,
            failed: false,
        }
    }

    /// Resolve the board address and pin, or warn and stay inert.
    pub fn bind(&self, config: &EndpointConfig, registry: &BoardRegistry) -> Option<Binding> {
        match resolve_binding(config, registry) {
            Ok(binding) => Some(binding),
            Err(error) => {
                EndpointRejected {
                    endpoint: &self.id,
                    kind: self.kind,
                    error: &error,
                }
                .log();
                self.context.warn(&error.to_string());
                None
            }
        }
    }

    /// Launch the worker. Returns true when the endpoint is now running.
    pub fn launch(&mut self, command: &Command) -> bool {
        match self.worker.spawn(command) {
            Ok(()) => {
                self.state = EndpointState::Running;
                EndpointStarted {
                    endpoint: &self.id,
                    kind: self.kind,
                    command: &command.to_line(),
                }
                .log();
                self.context.set_status(EndpointStatus::Ok);
                true
            }
            Err(error) => {
                EndpointLaunchFailed {
                    endpoint: &self.id,
                    error: &error,
                }
                .log();
                self.state = EndpointState::Closed;
                self.context.error(&error.to_string());
                self.context.set_status(EndpointStatus::Failed);
                false
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    pub fn state(&self) -> EndpointState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EndpointState::Running
    }

    pub fn context(&self) -> &dyn FlowContext {
        self.context.as_ref()
    }

    /// Write one line to the worker. Returns false when the line was dropped.
    pub fn write(&mut self, line: &str) -> bool {
        if !self.is_running() {
            self.ignore("endpoint is not running");
            return false;
        }
        OutputWritten {
            endpoint: &self.id,
            line,
        }
        .log();
        self.worker.write(line);
        true
    }

    /// Publish decoded samples on `topic`, in order. Nothing is sent unless running.
    pub fn publish(&self, topic: &str, samples: &[f64]) {
        if !self.is_running() {
            return;
        }
        for &value in samples {
            SamplePublished {
                endpoint: &self.id,
                topic,
                value,
            }
            .log();
            self.context.send(OutboundMessage {
                topic: topic.to_string(),
                payload: value,
            });
            self.context.set_status(EndpointStatus::Value(value));
        }
    }

    pub fn ignore(&self, reason: &str) {
        InboundIgnored {
            endpoint: &self.id,
            reason,
        }
        .log();
    }

    pub fn log_stderr(&self, chunk: &[u8]) {
        WorkerStderr {
            worker: &self.id,
            text: &String::from_utf8_lossy(chunk),
        }
        .log();
    }

    /// Enter `Closing` and signal the worker.
    ///
    /// Callers must stop sample emission before calling this.
    pub fn begin_close(&mut self) -> ClosePhase {
        match self.state {
            EndpointState::Running => {
                self.state = EndpointState::Closing;
                EndpointCloseRequested { endpoint: &self.id }.log();
                match self.worker.request_close() {
                    ClosePhase::Pending => ClosePhase::Pending,
                    ClosePhase::Closed => {
                        self.finish_close();
                        ClosePhase::Closed
                    }
                }
            }
            EndpointState::Closing => ClosePhase::Pending,
            EndpointState::Inert => {
                self.state = EndpointState::Closed;
                ClosePhase::Closed
            }
            EndpointState::Closed => ClosePhase::Closed,
        }
    }

    pub fn handle_exit(&mut self, exit: WorkerExit) {
        self.worker.confirm_exit(&exit);
        match self.state {
            EndpointState::Closing => self.finish_close(),
            EndpointState::Running => {
                EndpointStopped {
                    endpoint: &self.id,
                    code: exit.code,
                    signal: exit.signal,
                }
                .log();
                self.state = EndpointState::Closed;
                if !self.failed {
                    self.context.set_status(EndpointStatus::Stopped);
                }
            }
            EndpointState::Inert | EndpointState::Closed => {}
        }
    }

    pub fn handle_error(&mut self, error: ProcessError) {
        self.worker.mark_failed(&error);
        self.failed = true;
        EndpointFailed {
            endpoint: &self.id,
            error: &error,
        }
        .log();
        self.context.error(&error.to_string());
        self.context.set_status(EndpointStatus::Failed);
    }

    fn finish_close(&mut self) {
        self.state = EndpointState::Closed;
        EndpointClosed { endpoint: &self.id }.log();
        self.context.set_status(EndpointStatus::Closed);
    }
}

/// Outbound topic for samples read from `pin`.
pub fn sample_topic(namespace: &str, pin: u32) -> String {
    format!("{}/{}", namespace, pin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::{BoardAddress, CardId};
    use crate::testing::{registry, RecordingContext, RecordingWorker, WorkerCall};

    fn config(pin: Option<u32>) -> EndpointConfig {
        EndpointConfig::new("ep", EndpointKind::DigitalInput, Some(CardId::from(171)), pin)
    }

    fn command() -> Command {
        Command::DigitalRead {
            address: BoardAddress::from(5),
            pin: 3,
        }
    }

    #[test]
    fn test_bind_failure_warns_and_stays_inert() {
        let context = RecordingContext::new();
        let core = EndpointCore::new(&config(None), RecordingWorker::new(), context.clone());

        assert!(core.bind(&config(None), &registry()).is_none());
        assert_eq!(core.state(), EndpointState::Inert);
        assert_eq!(context.warnings(), vec!["Invalid pin: no pin configured".to_string()]);
    }

    #[test]
    fn test_writes_only_while_running() {
        let worker = RecordingWorker::new();
        let mut core = EndpointCore::new(&config(Some(3)), worker.clone(), RecordingContext::new());

        assert!(!core.write("1"));
        assert!(core.launch(&command()));
        assert!(core.write("1"));
        assert_eq!(core.begin_close(), ClosePhase::Pending);
        assert!(!core.write("0"));

        assert_eq!(worker.written(), vec!["1".to_string()]);
    }

    #[test]
    fn test_launch_failure_reports_error() {
        let context = RecordingContext::new();
        let mut core = EndpointCore::new(
            &config(Some(3)),
            RecordingWorker::failing(ProcessError::CommandNotFound),
            context.clone(),
        );

        assert!(!core.launch(&command()));
        assert_eq!(core.state(), EndpointState::Closed);
        assert_eq!(context.errors().len(), 1);
        assert_eq!(context.last_status(), Some(EndpointStatus::Failed));
    }

    #[test]
    fn test_exit_while_running_is_stopped_not_restarted() {
        let worker = RecordingWorker::new();
        let context = RecordingContext::new();
        let mut core = EndpointCore::new(&config(Some(3)), worker.clone(), context.clone());
        core.launch(&command());

        core.handle_exit(WorkerExit { code: Some(2), signal: None });

        assert_eq!(core.state(), EndpointState::Closed);
        assert_eq!(context.last_status(), Some(EndpointStatus::Stopped));
        let spawns = worker
            .calls()
            .into_iter()
            .filter(|call| matches!(call, WorkerCall::Spawn(_)))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn test_worker_error_is_reported_and_outlives_the_exit() {
        let worker = RecordingWorker::new();
        let context = RecordingContext::new();
        let mut core = EndpointCore::new(&config(Some(3)), worker.clone(), context.clone());
        core.launch(&command());

        core.handle_error(ProcessError::Other(Some(libc::EPIPE)));

        assert_eq!(context.errors(), vec![ProcessError::Other(Some(libc::EPIPE)).to_string()]);
        assert_eq!(context.last_status(), Some(EndpointStatus::Failed));
        assert!(worker
            .calls()
            .contains(&WorkerCall::MarkFailed(ProcessError::Other(Some(libc::EPIPE)))));

        core.handle_exit(WorkerExit { code: Some(0), signal: None });
        assert_eq!(core.state(), EndpointState::Closed);
        assert_eq!(context.last_status(), Some(EndpointStatus::Failed));
    }

    #[test]
    fn test_close_completes_on_exit() {
        let context = RecordingContext::new();
        let mut core = EndpointCore::new(&config(Some(3)), RecordingWorker::new(), context.clone());
        core.launch(&command());

        assert_eq!(core.begin_close(), ClosePhase::Pending);
        assert_eq!(core.state(), EndpointState::Closing);
        assert_eq!(core.begin_close(), ClosePhase::Pending);

        core.handle_exit(WorkerExit { code: None, signal: Some(15) });
        assert_eq!(core.state(), EndpointState::Closed);
        assert_eq!(context.last_status(), Some(EndpointStatus::Closed));
    }

    #[test]
    fn test_inert_close_is_immediate() {
        let mut core = EndpointCore::new(&config(None), RecordingWorker::new(), RecordingContext::new());
        assert_eq!(core.begin_close(), ClosePhase::Closed);
        assert_eq!(core.state(), EndpointState::Closed);
    }

    #[test]
    fn test_sample_topic() {
        assert_eq!(sample_topic("tbg", 3), "tbg/3");
    }
}
