// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The four endpoint kinds and the machinery that runs them.
//!
//! Each kind composes the same parts: a [`WorkerLink`](crate::traits::WorkerLink)
//! to its worker process, the command encoder, and (for inputs) a line
//! decoder. [`EndpointFactory`] builds them against a discovered board
//! table and [`EndpointHandle`] drives one on the tokio reactor.

mod boolean_output;
mod combined_output;
mod diagnostic_input;
mod digital_input;
mod factory;
mod lifecycle;
mod runner;


pub use boolean_output::BooleanOutput;
pub use combined_output::{CombinedOutput, OutputLevels, PWM_TOPIC};
pub use diagnostic_input::DiagnosticInput;
pub use digital_input::DigitalInput;
pub use factory::EndpointFactory;
pub use lifecycle::{sample_topic, EndpointCore};
pub use runner::{Bridge, EndpointHandle};

use crate::config::consts::DEFAULT_TOPIC_NAMESPACE;
use crate::config::Config;
use crate::protocol::FramingPolicy;

/// Session-wide settings shared by every input endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSettings {
    /// Outbound topics are `<topic_namespace>/<pin>`.
    pub topic_namespace: String,
    pub framing: FramingPolicy,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            topic_namespace: DEFAULT_TOPIC_NAMESPACE.to_string(),
            framing: FramingPolicy::default(),
        }
    }
}

impl From<&Config> for EndpointSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            topic_namespace: cfg.topic_namespace.clone(),
            framing: cfg.decoder.framing,
        }
    }
}
