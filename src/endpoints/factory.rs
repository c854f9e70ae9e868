// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::boards::BoardRegistry;
use crate::config::{EndpointConfig, EndpointKind, WorkerConfig};
use crate::process::{ClientProcessSupervisor, ProcessEvent};
use crate::traits::{Endpoint, FlowContext};

use super::{
    BooleanOutput, CombinedOutput, DiagnosticInput, DigitalInput, EndpointHandle,
    EndpointSettings,
};

/// Builds endpoints against one discovered board table.
///
/// Only obtainable from a [`Session`](crate::session::Session) whose
/// discovery succeeded, so no endpoint can exist without a board table.
#[derive(Debug, Clone)]
pub struct EndpointFactory {
    registry: Arc<BoardRegistry>,
    worker: WorkerConfig,
    settings: EndpointSettings,
}

impl EndpointFactory {
    pub(crate) fn new(
        registry: Arc<BoardRegistry>,
        worker: WorkerConfig,
        settings: EndpointSettings,
    ) -> Self {
        Self {
            registry,
            worker,
            settings,
        }
    }

    pub fn settings(&self) -> &EndpointSettings {
        &self.settings
    }

    /// Build one endpoint with a real worker process behind it.
    ///
    /// The worker (if the config binds) is launched immediately, so this
    /// must run inside a tokio runtime. Worker events arrive on the returned
    /// receiver.
    pub fn build(
        &self,
        config: &EndpointConfig,
        context: Arc<dyn FlowContext>,
    ) -> (Box<dyn Endpoint>, mpsc::UnboundedReceiver<ProcessEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let worker =
            ClientProcessSupervisor::new(&config.id, &self.worker, config.server.clone(), events_tx);
        let registry = self.registry.as_ref();

        let endpoint: Box<dyn Endpoint> = match config.kind {
            EndpointKind::DigitalInput => Box::new(DigitalInput::new(
                config,
                registry,
                &self.settings,
                worker,
                context,
            )),
            EndpointKind::DiagnosticInput => Box::new(DiagnosticInput::new(
                config,
                registry,
                &self.settings,
                worker,
                context,
            )),
            EndpointKind::BooleanOutput => {
                Box::new(BooleanOutput::new(config, registry, worker, context))
            }
            EndpointKind::CombinedOutput => {
                Box::new(CombinedOutput::new(config, registry, worker, context))
            }
        };
        (endpoint, events_rx)
    }

    /// Build an endpoint and start driving it.
    pub fn start(&self, config: &EndpointConfig, context: Arc<dyn FlowContext>) -> EndpointHandle {
        let (endpoint, events) = self.build(config, context);
        EndpointHandle::spawn(endpoint, events)
    }
}
