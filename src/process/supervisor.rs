// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ownership of one long-lived worker process.
//!
//! The supervisor launches the worker with piped stdio and hands the pipes
//! to background tasks on the tokio reactor:
//!
//! * a writer task drains queued input lines into the worker's stdin,
//! * one reader task per output pipe forwards raw chunks as events,
//! * a watcher task owns the child, delivers termination signals and
//!   reports the exit once both output pipes are drained.
//!
//! All results flow back to the owner through one event channel, so
//! callers never block on process I/O.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command as ProcessCommand};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::WorkerConfig;
use crate::errors::ProcessError;
use crate::observability::messages::worker::*;
use crate::observability::messages::StructuredLog;
use crate::protocol::Command;
use crate::traits::{ClosePhase, WorkerLink};

use super::events::{ProcessEvent, WorkerExit};

const READ_CHUNK_SIZE: usize = 4096;

/// Lifecycle of a supervised worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Spawning,
    Running,
    Closing,
    Closed,
    /// A process-level error occurred. The process may still be alive until
    /// its exit is confirmed.
    Failed,
}

pub struct ClientProcessSupervisor {
    label: String,
    program: PathBuf,
    server: Option<String>,
    term_grace: Duration,
    events: mpsc::UnboundedSender<ProcessEvent>,
    state: SupervisorState,
    stdin: Option<mpsc::UnboundedSender<String>>,
    terminate: Option<oneshot::Sender<()>>,
    pid: Option<u32>,
}

impl ClientProcessSupervisor {
    /// Create an idle supervisor. `server` overrides the worker-wide remote
    /// endpoint for this process only.
    pub fn new(
        label: impl Into<String>,
        worker: &WorkerConfig,
        server: Option<String>,
        events: mpsc::UnboundedSender<ProcessEvent>,
    ) -> Self {
        Self {
            label: label.into(),
            program: worker.program.clone(),
            server: server.or_else(|| worker.server.clone()),
            term_grace: worker.term_grace(),
            events,
            state: SupervisorState::Idle,
            stdin: None,
            terminate: None,
            pid: None,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn launch(&mut self, command: &Command) -> Result<Child, ProcessError> {
        let args = command.invocation_args(self.server.as_deref());
        ProcessCommand::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProcessError::from_io(&e))
    }
}

impl WorkerLink for ClientProcessSupervisor {
    /// Launch the worker. Only the first call on an idle supervisor does
    /// anything; later calls are ignored.
    ///
    /// Success means the launch call did not fail synchronously. The worker
    /// may still fail to start up; that arrives later as an event.
    fn spawn(&mut self, command: &Command) -> Result<(), ProcessError> {
        if self.state != SupervisorState::Idle {
            return Ok(());
        }
        self.state = SupervisorState::Spawning;

        let mut child = match self.launch(command) {
            Ok(child) => child,
            Err(error) => {
                WorkerSpawnFailed {
                    worker: &self.label,
                    command: &command.to_line(),
                    error: &error,
                }
                .log();
                self.state = SupervisorState::Failed;
                return Err(error);
            }
        };

        let pid = child.id();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(forward_output(
                stdout,
                self.events.clone(),
                ProcessEvent::Stdout,
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(forward_output(
                stderr,
                self.events.clone(),
                ProcessEvent::Stderr,
            )));
        }
        if let Some(stdin) = child.stdin.take() {
            let (line_tx, line_rx) = mpsc::unbounded_channel();
            tokio::spawn(write_lines(
                stdin,
                line_rx,
                self.events.clone(),
                self.label.clone(),
            ));
            self.stdin = Some(line_tx);
        }

        let (terminate_tx, terminate_rx) = oneshot::channel();
        tokio::spawn(watch_exit(
            child,
            pid,
            terminate_rx,
            self.term_grace,
            readers,
            self.events.clone(),
            self.label.clone(),
        ));

        self.terminate = Some(terminate_tx);
        self.pid = pid;
        self.state = SupervisorState::Running;

        WorkerSpawned {
            worker: &self.label,
            command: &command.to_line(),
            pid,
        }
        .log();
        Ok(())
    }

    /// Queue one line for the worker's stdin. A no-op unless running.
    fn write(&mut self, line: &str) {
        if self.state != SupervisorState::Running {
            WorkerWriteSkipped {
                worker: &self.label,
                line,
            }
            .log();
            return;
        }
        if let Some(stdin) = &self.stdin {
            // a closed receiver means the writer already reported its failure
            let _ = stdin.send(line.to_string());
        }
    }

    fn request_close(&mut self) -> ClosePhase {
        match self.state {
            SupervisorState::Closing => ClosePhase::Pending,
            SupervisorState::Running | SupervisorState::Failed if self.terminate.is_some() => {
                if let Some(terminate) = self.terminate.take() {
                    let _ = terminate.send(());
                }
                self.state = SupervisorState::Closing;
                WorkerCloseRequested {
                    worker: &self.label,
                    pid: self.pid,
                }
                .log();
                ClosePhase::Pending
            }
            _ => {
                self.state = SupervisorState::Closed;
                ClosePhase::Closed
            }
        }
    }

    fn confirm_exit(&mut self, exit: &WorkerExit) {
        WorkerExited {
            worker: &self.label,
            pid: self.pid,
            code: exit.code,
            signal: exit.signal,
            requested: self.state == SupervisorState::Closing,
        }
        .log();
        self.state = SupervisorState::Closed;
        self.stdin = None;
        self.terminate = None;
        self.pid = None;
    }

    fn mark_failed(&mut self, error: &ProcessError) {
        WorkerFailed {
            worker: &self.label,
            error,
        }
        .log();
        if matches!(
            self.state,
            SupervisorState::Spawning | SupervisorState::Running
        ) {
            self.state = SupervisorState::Failed;
            self.stdin = None;
        }
    }

    fn is_running(&self) -> bool {
        self.state == SupervisorState::Running
    }
}

impl std::fmt::Debug for ClientProcessSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientProcessSupervisor")
            .field("label", &self.label)
            .field("program", &self.program)
            .field("server", &self.server)
            .field("state", &self.state)
            .field("pid", &self.pid)
            .finish()
    }
}

async fn forward_output<R>(
    mut reader: R,
    events: mpsc::UnboundedSender<ProcessEvent>,
    wrap: fn(Vec<u8>) -> ProcessEvent,
) where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if events.send(wrap(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
        }
    }
}

async fn write_lines(
    mut stdin: ChildStdin,
    mut lines: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<ProcessEvent>,
    label: String,
) {
    while let Some(mut line) = lines.recv().await {
        line.push('\n');
        let result = match stdin.write_all(line.as_bytes()).await {
            Ok(()) => stdin.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            let error = ProcessError::from_io(&e);
            WorkerWriteFailed {
                worker: &label,
                error: &error,
            }
            .log();
            let _ = events.send(ProcessEvent::Error(error));
            break;
        }
    }
}

async fn watch_exit(
    mut child: Child,
    pid: Option<u32>,
    mut terminate: oneshot::Receiver<()>,
    term_grace: Duration,
    readers: Vec<JoinHandle<()>>,
    events: mpsc::UnboundedSender<ProcessEvent>,
    label: String,
) {
    let status = tokio::select! {
        biased;
        status = child.wait() => status,
        // also taken when the supervisor is dropped without closing
        _ = &mut terminate => {
            if let Some(pid) = pid {
                send_signal(&label, pid, libc::SIGTERM);
            }
            match tokio::time::timeout(term_grace, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    WorkerKillEscalated { worker: &label, pid, grace: term_grace }.log();
                    let _ = child.start_kill();
                    child.wait().await
                }
            }
        }
    };

    // drain both pipes first so the exit is the last event for this worker
    for reader in readers {
        let _ = tokio::time::timeout(term_grace, reader).await;
    }

    let exit = match status {
        Ok(status) => WorkerExit::from(status),
        Err(e) => {
            let _ = events.send(ProcessEvent::Error(ProcessError::from_io(&e)));
            WorkerExit::default()
        }
    };
    let _ = events.send(ProcessEvent::Exit(exit));
}

fn send_signal(label: &str, pid: u32, signal: libc::c_int) {
    let ret = unsafe { libc::kill(pid as libc::pid_t, signal) };
    let error = (ret != 0).then(std::io::Error::last_os_error);
    WorkerSignalled {
        worker: label,
        pid,
        signal,
        error: error.as_ref(),
    }
    .log();
}
