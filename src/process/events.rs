// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::process::ExitStatus;

use crate::errors::ProcessError;

/// How a worker process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerExit {
    /// Exit code, when the process exited on its own.
    pub code: Option<i32>,
    /// Terminating signal, when the process was killed.
    pub signal: Option<i32>,
}

impl From<ExitStatus> for WorkerExit {
    fn from(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;
        Self {
            code: status.code(),
            signal: status.signal(),
        }
    }
}

/// Everything a supervised worker reports back to its owner.
///
/// For one process, `Stdout` chunks arrive in the order the worker wrote
/// them and `Exit` is always the final event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Exit(WorkerExit),
    Error(ProcessError),
}

impl ProcessEvent {
    /// Deliver this event to the matching observer method.
    pub fn dispatch<O: ProcessObserver + ?Sized>(self, observer: &mut O) {
        match self {
            ProcessEvent::Stdout(chunk) => observer.on_stdout(&chunk),
            ProcessEvent::Stderr(chunk) => observer.on_stderr(&chunk),
            ProcessEvent::Exit(exit) => observer.on_exit(exit),
            ProcessEvent::Error(error) => observer.on_error(error),
        }
    }
}

/// Receiver of worker events, implemented by each endpoint kind.
pub trait ProcessObserver {
    fn on_stdout(&mut self, chunk: &[u8]);

    /// Worker diagnostics. Ignored unless an observer cares.
    fn on_stderr(&mut self, _chunk: &[u8]) {}

    fn on_exit(&mut self, exit: WorkerExit);

    fn on_error(&mut self, error: ProcessError);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl ProcessObserver for Recorder {
        fn on_stdout(&mut self, chunk: &[u8]) {
            self.seen.push(format!("out:{}", String::from_utf8_lossy(chunk)));
        }

        fn on_exit(&mut self, exit: WorkerExit) {
            self.seen.push(format!("exit:{:?}", exit.code));
        }

        fn on_error(&mut self, error: ProcessError) {
            self.seen.push(format!("error:{}", error));
        }
    }

    #[test]
    fn test_dispatch_routes_each_kind() {
        let mut recorder = Recorder::default();
        ProcessEvent::Stdout(b"1\n".to_vec()).dispatch(&mut recorder);
        ProcessEvent::Stderr(b"ignored".to_vec()).dispatch(&mut recorder);
        ProcessEvent::Error(ProcessError::CommandNotFound).dispatch(&mut recorder);
        ProcessEvent::Exit(WorkerExit { code: Some(0), signal: None }).dispatch(&mut recorder);

        assert_eq!(
            recorder.seen,
            vec!["out:1\n", "error:Worker command not found", "exit:Some(0)"]
        );
    }
}
