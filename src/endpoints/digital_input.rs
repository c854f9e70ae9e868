// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::boards::BoardRegistry;
use crate::config::{EndpointConfig, EndpointKind};
use crate::errors::ProcessError;
use crate::process::{ClientProcessSupervisor, ProcessObserver, WorkerExit};
use crate::protocol::{Command, LineDecoder, Transform};
use crate::traits::{ClosePhase, Endpoint, EndpointState, FlowContext, InboundMessage, WorkerLink};

use super::lifecycle::{sample_topic, EndpointCore};
use super::EndpointSettings;

/// Streams a digital input pin with `din` and republishes every edge unchanged.
pub struct DigitalInput<W: WorkerLink = ClientProcessSupervisor> {
    core: EndpointCore<W>,
    decoder: LineDecoder,
    topic: String,
}

impl<W: WorkerLink> DigitalInput<W> {
    pub fn new(
        config: &EndpointConfig,
        registry: &BoardRegistry,
        settings: &EndpointSettings,
        worker: W,
        context: Arc<dyn FlowContext>,
    ) -> Self {
        let mut core = EndpointCore::new(config, worker, context);
        let mut topic = String::new();
        if let Some(binding) = core.bind(config, registry) {
            topic = sample_topic(&settings.topic_namespace, binding.pin);
            core.launch(&Command::DigitalRead {
                address: binding.address,
                pin: binding.pin,
            });
        }
        Self {
            core,
            decoder: LineDecoder::new(Transform::PassThrough, settings.framing),
            topic,
        }
    }
}

impl<W: WorkerLink> ProcessObserver for DigitalInput<W> {
    fn on_stdout(&mut self, chunk: &[u8]) {
        let samples = self.decoder.feed(chunk);
        self.core.publish(&self.topic, &samples);
    }

    fn on_stderr(&mut self, chunk: &[u8]) {
        self.core.log_stderr(chunk);
    }

    fn on_exit(&mut self, exit: WorkerExit) {
        self.core.handle_exit(exit);
    }

    fn on_error(&mut self, error: ProcessError) {
        self.core.handle_error(error);
    }
}

impl<W: WorkerLink> Endpoint for DigitalInput<W> {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn kind(&self) -> EndpointKind {
        EndpointKind::DigitalInput
    }

    fn state(&self) -> EndpointState {
        self.core.state()
    }

    fn on_input(&mut self, _message: &InboundMessage) {
        self.core.ignore("digital inputs accept no messages");
    }

    fn begin_close(&mut self) -> ClosePhase {
        self.decoder.suppress();
        self.core.begin_close()
    }
}
