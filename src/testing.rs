// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test doubles for the worker link and the host context.

use std::sync::{Arc, Mutex};

use crate::boards::BoardRegistry;
use crate::errors::ProcessError;
use crate::process::WorkerExit;
use crate::protocol::Command;
use crate::traits::{ClosePhase, EndpointStatus, FlowContext, OutboundMessage, WorkerLink};

/// Board table with card 171 (`0xAB`) at address 5.
pub fn registry() -> BoardRegistry {
    BoardRegistry::parse_discovery_output(
        br#"[{"id": 171, "addr": 5, "product": {"id": "tbg-test"}}]"#,
    )
    .unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerCall {
    Spawn(Command),
    Write(String),
    RequestClose,
    ConfirmExit(WorkerExit),
    MarkFailed(ProcessError),
}

#[derive(Debug, Default)]
struct WorkerLog {
    calls: Vec<WorkerCall>,
    running: bool,
}

/// A worker link that records every call instead of running a process.
/// Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingWorker {
    log: Arc<Mutex<WorkerLog>>,
    spawn_error: Option<ProcessError>,
}

impl RecordingWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A worker whose launch fails with `error`.
    pub fn failing(error: ProcessError) -> Self {
        Self {
            log: Arc::default(),
            spawn_error: Some(error),
        }
    }

    pub fn calls(&self) -> Vec<WorkerCall> {
        self.log.lock().unwrap().calls.clone()
    }

    /// Lines that reached the worker's input channel.
    pub fn written(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WorkerCall::Write(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    pub fn spawned(&self) -> Vec<Command> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WorkerCall::Spawn(command) => Some(command),
                _ => None,
            })
            .collect()
    }
}

impl WorkerLink for RecordingWorker {
    fn spawn(&mut self, command: &Command) -> Result<(), ProcessError> {
        let mut log = self.log.lock().unwrap();
        log.calls.push(WorkerCall::Spawn(command.clone()));
        match &self.spawn_error {
            Some(error) => Err(error.clone()),
            None => {
                log.running = true;
                Ok(())
            }
        }
    }

    fn write(&mut self, line: &str) {
        let mut log = self.log.lock().unwrap();
        if log.running {
            log.calls.push(WorkerCall::Write(line.to_string()));
        }
    }

    fn request_close(&mut self) -> ClosePhase {
        let mut log = self.log.lock().unwrap();
        log.calls.push(WorkerCall::RequestClose);
        if log.running {
            log.running = false;
            ClosePhase::Pending
        } else {
            ClosePhase::Closed
        }
    }

    fn confirm_exit(&mut self, exit: &WorkerExit) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(WorkerCall::ConfirmExit(*exit));
        log.running = false;
    }

    fn mark_failed(&mut self, error: &ProcessError) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(WorkerCall::MarkFailed(error.clone()));
        log.running = false;
    }

    fn is_running(&self) -> bool {
        self.log.lock().unwrap().running
    }
}

/// A host context that keeps everything it is handed.
#[derive(Debug, Default)]
pub struct RecordingContext {
    sent: Mutex<Vec<OutboundMessage>>,
    statuses: Mutex<Vec<EndpointStatus>>,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<EndpointStatus> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<EndpointStatus> {
        self.statuses.lock().unwrap().last().cloned()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl FlowContext for RecordingContext {
    fn send(&self, message: OutboundMessage) {
        self.sent.lock().unwrap().push(message);
    }

    fn set_status(&self, status: EndpointStatus) {
        self.statuses.lock().unwrap().push(status);
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
