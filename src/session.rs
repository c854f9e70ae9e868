// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One bridge session: the board table and the worker settings it was
//! discovered with.

use std::sync::Arc;

use crate::boards::{discover, BoardRegistry};
use crate::config::WorkerConfig;
use crate::endpoints::{EndpointFactory, EndpointSettings};
use crate::errors::DiscoveryError;

/// A session whose discovery succeeded.
///
/// There is no way to build a `Session` from a failed discovery, so holding
/// one is proof that endpoints may be constructed. The board table is
/// shared read-only with every endpoint factory.
#[derive(Debug, Clone)]
pub struct Session {
    registry: Arc<BoardRegistry>,
    worker: WorkerConfig,
}

impl Session {
    /// Run discovery once. A failure is not retried.
    pub async fn open(worker: &WorkerConfig) -> Result<Self, DiscoveryError> {
        let registry = discover(worker).await?;
        Ok(Self::with_registry(registry, worker.clone()))
    }

    /// A session over a board table obtained elsewhere.
    pub fn with_registry(registry: BoardRegistry, worker: WorkerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            worker,
        }
    }

    pub fn registry(&self) -> &BoardRegistry {
        &self.registry
    }

    pub fn worker(&self) -> &WorkerConfig {
        &self.worker
    }

    pub fn factory(&self, settings: EndpointSettings) -> EndpointFactory {
        EndpointFactory::new(Arc::clone(&self.registry), self.worker.clone(), settings)
    }
}
