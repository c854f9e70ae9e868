// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::boards::BoardRegistry;
use crate::config::{Binding, EndpointConfig, EndpointKind};
use crate::errors::ProcessError;
use crate::process::{ClientProcessSupervisor, ProcessObserver, WorkerExit};
use crate::protocol::{normalize_bool, pwm_steps, Command};
use crate::traits::{
    ClosePhase, Endpoint, EndpointState, EndpointStatus, FlowContext, InboundMessage, WorkerLink,
};

use super::lifecycle::EndpointCore;

/// Topic that routes an inbound message to the PWM channel. Compared
/// case-insensitively; any other topic (or none) drives the enable line.
pub const PWM_TOPIC: &str = "pwm";

/// Last values written to a combined output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputLevels {
    pub enable: f64,
    pub pwm: f64,
}

/// Drives an enable line and a PWM channel on the same pin through one
/// interactive worker.
pub struct CombinedOutput<W: WorkerLink = ClientProcessSupervisor> {
    core: EndpointCore<W>,
    binding: Option<Binding>,
    levels: OutputLevels,
}

impl<W: WorkerLink> CombinedOutput<W> {
    pub fn new(
        config: &EndpointConfig,
        registry: &BoardRegistry,
        worker: W,
        context: Arc<dyn FlowContext>,
    ) -> Self {
        let mut core = EndpointCore::new(config, worker, context);
        let binding = core.bind(config, registry);
        if binding.is_some() {
            core.launch(&Command::Interactive);
        }

        let mut endpoint = Self {
            core,
            binding,
            levels: OutputLevels::default(),
        };
        if endpoint.core.is_running() {
            let initial = |value: &Option<serde_json::Value>| {
                value.as_ref().and_then(normalize_bool).unwrap_or(0.0)
            };
            endpoint.write_enable(initial(&config.initial_enable));
            endpoint.write_pwm(initial(&config.initial_pwm));
        }
        endpoint
    }

    pub fn last_known(&self) -> OutputLevels {
        self.levels
    }

    fn write_enable(&mut self, level: f64) {
        let Some(binding) = &self.binding else { return };
        let command = Command::DigitalWrite {
            address: binding.address.clone(),
            pin: binding.pin,
            level,
        };
        if self.core.write(&command.to_line()) {
            self.levels.enable = level;
            self.report();
        }
    }

    fn write_pwm(&mut self, level: f64) {
        let Some(binding) = &self.binding else { return };
        let command = Command::AnalogWrite {
            address: binding.address.clone(),
            pin: binding.pin,
            steps: pwm_steps(level),
        };
        if self.core.write(&command.to_line()) {
            self.levels.pwm = level;
            self.report();
        }
    }

    fn report(&self) {
        self.core.context().set_status(EndpointStatus::Output {
            pwm: self.levels.pwm,
            enable: self.levels.enable >= 1.0,
        });
    }
}

impl<W: WorkerLink> ProcessObserver for CombinedOutput<W> {
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

impl<W: WorkerLink> Endpoint for CombinedOutput<W> {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn kind(&self) -> EndpointKind {
        EndpointKind::CombinedOutput
    }

    fn state(&self) -> EndpointState {
        self.core.state()
    }

    fn on_input(&mut self, message: &InboundMessage) {
        let Some(level) = normalize_bool(&message.payload) else {
            self.core.ignore("payload is not a level");
            return;
        };
        let is_pwm = message
            .topic
            .as_deref()
            .is_some_and(|topic| topic.eq_ignore_ascii_case(PWM_TOPIC));
        if is_pwm {
            self.write_pwm(level);
        } else {
            self.write_enable(level);
        }
    }

    fn begin_close(&mut self) -> ClosePhase {
        self.core.begin_close()
    }
}
