// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::boards::BoardRegistry;
use crate::config::{EndpointConfig, EndpointKind};
use crate::errors::ProcessError;
use crate::process::{ClientProcessSupervisor, ProcessObserver, WorkerExit};
use crate::protocol::{coerce_number, format_value, Command, LineDecoder, Transform};
use crate::traits::{
    ClosePhase, Endpoint, EndpointState, EndpointStatus, FlowContext, InboundMessage, WorkerLink,
};

use super::lifecycle::{sample_topic, EndpointCore};
use super::EndpointSettings;

/// Streams an analog diagnostic channel with `ain_stdio`, publishing each
/// sample converted to amps.
///
/// Numeric inbound messages are written through to the worker's input
/// channel as-is, independent of the sensed stream.
pub struct DiagnosticInput<W: WorkerLink = ClientProcessSupervisor> {
    core: EndpointCore<W>,
    decoder: LineDecoder,
    topic: String,
}

impl<W: WorkerLink> DiagnosticInput<W> {
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
            core.launch(&Command::AnalogRead {
                address: binding.address,
                pin: binding.pin,
            });
        }
        Self {
            core,
            decoder: LineDecoder::new(Transform::DiagnosticScale, settings.framing),
            topic,
        }
    }
}

impl<W: WorkerLink> ProcessObserver for DiagnosticInput<W> {
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

impl<W: WorkerLink> Endpoint for DiagnosticInput<W> {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn kind(&self) -> EndpointKind {
        EndpointKind::DiagnosticInput
    }

    fn state(&self) -> EndpointState {
        self.core.state()
    }

    fn on_input(&mut self, message: &InboundMessage) {
        let Some(value) = coerce_number(&message.payload) else {
            self.core.ignore("payload is not numeric");
            return;
        };
        if self.core.write(&format_value(value)) {
            self.core.context().set_status(EndpointStatus::Value(value));
        }
    }

    fn begin_close(&mut self) -> ClosePhase {
        self.decoder.suppress();
        self.core.begin_close()
    }
}
