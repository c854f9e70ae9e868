// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::protocol::format_value;

/// A message delivered to an endpoint by the host bus.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct InboundMessage {
    /// Only consulted by the combined output, to pick PWM or enable.
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl InboundMessage {
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            topic: None,
            payload,
        }
    }

    pub fn with_topic(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: Some(topic.into()),
            payload,
        }
    }
}

/// One decoded sample published to the host bus as `{topic, payload}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: f64,
}

/// What the host shows next to an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointStatus {
    /// Worker launched.
    Ok,
    /// Last value read or written.
    Value(f64),
    /// Combined output's last known PWM level and enable state.
    Output { pwm: f64, enable: bool },
    /// Closed by the host.
    Closed,
    /// Worker exited without being asked to.
    Stopped,
    /// Worker reported a process-level error.
    Failed,
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointStatus::Ok => write!(f, "OK"),
            EndpointStatus::Value(value) => write!(f, "{}", format_value(*value)),
            EndpointStatus::Output { pwm, enable } => {
                write!(f, "{:.3} {}", pwm, if *enable { "on" } else { "off" })
            }
            EndpointStatus::Closed => write!(f, "closed"),
            EndpointStatus::Stopped => write!(f, "stopped"),
            EndpointStatus::Failed => write!(f, "error"),
        }
    }
}

/// Everything an endpoint needs from its host: publishing samples,
/// showing status and surfacing warnings or errors to the user.
pub trait FlowContext: Send + Sync {
    fn send(&self, message: OutboundMessage);

    fn set_status(&self, status: EndpointStatus);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(EndpointStatus::Ok.to_string(), "OK");
        assert_eq!(EndpointStatus::Value(1.0).to_string(), "1");
        assert_eq!(
            EndpointStatus::Output { pwm: 0.5, enable: true }.to_string(),
            "0.500 on"
        );
        assert_eq!(EndpointStatus::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_inbound_message_from_json() {
        let msg: InboundMessage = serde_json::from_str(r#"{"topic": "PWM", "payload": 0.5}"#).unwrap();
        assert_eq!(msg, InboundMessage::with_topic("PWM", serde_json::json!(0.5)));

        let bare: InboundMessage = serde_json::from_str(r#"{"payload": "true"}"#).unwrap();
        assert_eq!(bare.topic, None);
    }
}
