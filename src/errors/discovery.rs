// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::ProcessError;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// Session-level failure of board address discovery.
///
/// None of these are retried; no endpoint can be built until a discovery
/// call succeeds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    /// The discovery subcommand exited unsuccessfully (`None` when killed by a signal).
    #[error("Address discovery failed: worker exited with {}", describe_exit(.0))]
    ProcessFailed(Option<i32>),

    /// Standard output was not a JSON array of board descriptors.
    #[error("Address discovery returned malformed output: {0}")]
    MalformedOutput(String),

    /// Two descriptors share an id, so lookups would be ambiguous.
    #[error("Address discovery returned duplicate board id '{0}'")]
    DuplicateBoardId(String),

    /// The discovery subcommand could not be launched at all.
    #[error("Address discovery could not start the worker: {0}")]
    Launch(#[from] ProcessError),
}
