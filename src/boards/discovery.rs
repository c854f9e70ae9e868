// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::process::Stdio;
use tokio::process::Command as ProcessCommand;

use crate::config::WorkerConfig;
use crate::errors::{DiscoveryError, ProcessError};
use crate::observability::messages::discovery::*;
use crate::observability::messages::StructuredLog;
use crate::protocol::Command;

use super::BoardRegistry;

/// Run the discovery subcommand once and build the board table from its output.
///
/// The whole of standard output must be a JSON array of descriptors. A
/// nonzero exit, unparseable output or a duplicated board id fails the call.
pub async fn discover(worker: &WorkerConfig) -> Result<BoardRegistry, DiscoveryError> {
    let args = Command::Discover.invocation_args(worker.server.as_deref());
    let program = worker.program.display().to_string();

    DiscoveryStarted {
        program: &program,
        server: worker.server.as_deref(),
    }
    .log();

    let output = ProcessCommand::new(&worker.program)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            let error = ProcessError::from_io(&e);
            DiscoveryFailed { error: &error }.log();
            DiscoveryError::Launch(error)
        })?;

    if !output.status.success() {
        let error = DiscoveryError::ProcessFailed(output.status.code());
        DiscoveryFailed { error: &error }.log();
        return Err(error);
    }

    let registry = BoardRegistry::parse_discovery_output(&output.stdout).map_err(|error| {
        DiscoveryFailed { error: &error }.log();
        if matches!(error, DiscoveryError::MalformedOutput(_)) {
            DiscoveryOutputRejected {
                stdout: &String::from_utf8_lossy(&output.stdout),
            }
            .log();
        }
        error
    })?;

    for board in registry.snapshot() {
        BoardListed {
            address: &board.address.to_string(),
            card_id: &board.id.to_string(),
            product_id: &board.product.id_text(),
        }
        .log();
    }

    DiscoveryCompleted {
        board_count: registry.len(),
    }
    .log();

    Ok(registry)
}
