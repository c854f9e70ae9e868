// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::boards::BoardRegistry;
use crate::config::{EndpointConfig, EndpointKind};
use crate::errors::ProcessError;
use crate::process::{ClientProcessSupervisor, ProcessObserver, WorkerExit};
use crate::protocol::{format_value, normalize_bool, Command};
use crate::traits::{
    ClosePhase, Endpoint, EndpointState, EndpointStatus, FlowContext, InboundMessage, WorkerLink,
};

use super::lifecycle::EndpointCore;

/// Drives one boolean output through a resident `dout` worker.
///
/// The worker is launched once with no level argument and reads one level
/// per input line, so every change goes over the same input channel.
pub struct BooleanOutput<W: WorkerLink = ClientProcessSupervisor> {
    core: EndpointCore<W>,
}

impl<W: WorkerLink> BooleanOutput<W> {
    pub fn new(
        config: &EndpointConfig,
        registry: &BoardRegistry,
        worker: W,
        context: Arc<dyn FlowContext>,
    ) -> Self {
        let mut core = EndpointCore::new(config, worker, context);
        if let Some(binding) = core.bind(config, registry) {
            core.launch(&Command::DigitalWriteStream {
                address: binding.address,
                pin: binding.pin,
            });
        }

        let mut endpoint = Self { core };
        if endpoint.core.is_running() {
            let initial = config.initial_level.as_ref().and_then(normalize_bool);
            endpoint.set_level(initial.unwrap_or(0.0));
        }
        endpoint
    }

    fn set_level(&mut self, level: f64) {
        if self.core.write(&format_value(level)) {
            self.core.context().set_status(EndpointStatus::Value(level));
        }
    }
}

impl<W: WorkerLink> ProcessObserver for BooleanOutput<W> {
    fn on_stdout(&mut self, _chunk: &[u8]) {}

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

impl<W: WorkerLink> Endpoint for BooleanOutput<W> {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn kind(&self) -> EndpointKind {
        EndpointKind::BooleanOutput
    }

    fn state(&self) -> EndpointState {
        self.core.state()
    }

    fn on_input(&mut self, message: &InboundMessage) {
        match normalize_bool(&message.payload) {
            Some(level) => self.set_level(level),
            None => self.core.ignore("payload is not a level"),
        }
    }

    fn begin_close(&mut self) -> ClosePhase {
        self.core.begin_close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::{BoardAddress, CardId};
    use crate::testing::{registry, RecordingContext, RecordingWorker};
    use serde_json::json;

    fn config(initial_level: Option<serde_json::Value>) -> EndpointConfig {
        EndpointConfig {
            initial_level,
            ..EndpointConfig::new("lamp", EndpointKind::BooleanOutput, Some(CardId::from(171)), Some(4))
        }
    }

    #[test]
    fn test_single_worker_for_every_write() {
        let worker = RecordingWorker::new();
        let context = RecordingContext::new();
        let mut endpoint = BooleanOutput::new(&config(None), &registry(), worker.clone(), context.clone());

        for payload in [json!("true"), json!(0), json!(5), json!(-5), json!(0.5), json!("false")] {
            endpoint.on_input(&InboundMessage::new(payload));
        }

        assert_eq!(
            worker.spawned(),
            vec![Command::DigitalWriteStream { address: BoardAddress::from(5), pin: 4 }]
        );
        assert_eq!(worker.written(), vec!["0", "1", "0", "1", "0", "0.5", "0"]);
        assert_eq!(context.last_status(), Some(EndpointStatus::Value(0.0)));
    }

    #[test]
    fn test_initial_level_is_written_first() {
        let worker = RecordingWorker::new();
        let _endpoint = BooleanOutput::new(
            &config(Some(json!("true"))),
            &registry(),
            worker.clone(),
            RecordingContext::new(),
        );
        assert_eq!(worker.written(), vec!["1"]);
    }

    #[test]
    fn test_non_numeric_payload_is_ignored() {
        let worker = RecordingWorker::new();
        let mut endpoint = BooleanOutput::new(&config(None), &registry(), worker.clone(), RecordingContext::new());

        endpoint.on_input(&InboundMessage::new(json!("on")));
        endpoint.on_input(&InboundMessage::new(json!({"level": 1})));

        assert_eq!(worker.written(), vec!["0"]);
    }

    #[test]
    fn test_writes_after_close_are_dropped() {
        let worker = RecordingWorker::new();
        let mut endpoint = BooleanOutput::new(&config(None), &registry(), worker.clone(), RecordingContext::new());

        assert_eq!(endpoint.begin_close(), ClosePhase::Pending);
        endpoint.on_input(&InboundMessage::new(json!(1)));

        assert_eq!(worker.written(), vec!["0"]);
    }

    #[test]
    fn test_broken_input_channel_shows_error() {
        let context = RecordingContext::new();
        let mut endpoint = BooleanOutput::new(&config(None), &registry(), RecordingWorker::new(), context.clone());

        endpoint.on_error(ProcessError::Other(Some(libc::EPIPE)));
        endpoint.on_exit(WorkerExit { code: Some(0), signal: None });

        assert_eq!(context.errors().len(), 1);
        assert_eq!(context.last_status(), Some(EndpointStatus::Failed));
        assert_eq!(endpoint.state(), EndpointState::Closed);
    }
}
