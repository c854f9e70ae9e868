// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by worker processes, classified from the OS failure reason.

use std::io;
use thiserror::Error;

/// Process-level failure of a worker, either at launch or while running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The worker executable does not exist.
    #[error("Worker command not found")]
    CommandNotFound,

    /// The worker executable exists but may not be executed.
    #[error("Worker command is not executable")]
    PermissionDenied,

    /// Any other OS failure, carrying the raw error code when the OS gave one.
    #[error("Worker error: {}", describe_os_code(.0))]
    Other(Option<i32>),
}

fn describe_os_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("os error {}", code),
        None => "unknown".to_string(),
    }
}

impl ProcessError {
    /// Classify an I/O error reported while launching or talking to a worker.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ProcessError::CommandNotFound,
            io::ErrorKind::PermissionDenied => ProcessError::PermissionDenied,
            _ => ProcessError::Other(err.raw_os_error()),
        }
    }
}

impl From<io::Error> for ProcessError {
    fn from(err: io::Error) -> Self {
        ProcessError::from_io(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        struct TestCase {
            name: &'static str,
            error: io::Error,
            expected: ProcessError,
        }

        let test_cases = vec![
            TestCase {
                name: "missing executable",
                error: io::Error::from_raw_os_error(libc::ENOENT),
                expected: ProcessError::CommandNotFound,
            },
            TestCase {
                name: "not executable",
                error: io::Error::from_raw_os_error(libc::EACCES),
                expected: ProcessError::PermissionDenied,
            },
            TestCase {
                name: "broken pipe",
                error: io::Error::from_raw_os_error(libc::EPIPE),
                expected: ProcessError::Other(Some(libc::EPIPE)),
            },
            TestCase {
                name: "synthetic error",
                error: io::Error::new(io::ErrorKind::Other, "boom"),
                expected: ProcessError::Other(None),
            },
        ];

        for case in test_cases {
            assert_eq!(ProcessError::from_io(&case.error), case.expected, "{}", case.name);
        }
    }

    #[test]
    fn test_other_display_includes_code() {
        assert_eq!(ProcessError::Other(Some(32)).to_string(), "Worker error: os error 32");
        assert_eq!(ProcessError::Other(None).to_string(), "Worker error: unknown");
    }
}
