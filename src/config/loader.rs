// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::boards::CardId;
use crate::config::consts::{DEFAULT_TERM_GRACE_MS, DEFAULT_TOPIC_NAMESPACE, DEFAULT_WORKER_PROGRAM};
use crate::errors::ConfigFileError;
use crate::protocol::FramingPolicy;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Deployment configuration for one bridge session.
///
/// Describes where the worker executable lives, how worker output is
/// framed, and every endpoint to bridge. Loaded from YAML (or TOML when the
/// file ends in `.toml`).
///
/// # Example
/// ```yaml
/// worker:
///   program: /usr/local/bin/tbg_client
///   server: tcp://192.168.2.11:5555
/// decoder:
///   framing: carry_over
/// topic_namespace: tbg
/// endpoints:
///   - id: door
///     kind: digital_input
///     card: "0x00000000000100000000AB02"
///     pin: 3
///   - id: pump
///     kind: combined_output
///     card: 7
///     pin: 1
///     initial_enable: 1
///     initial_pwm: 0.25
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default = "default_topic_namespace")]
    pub topic_namespace: String,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

fn default_topic_namespace() -> String {
    DEFAULT_TOPIC_NAMESPACE.to_string()
}

fn default_worker_program() -> PathBuf {
    PathBuf::from(DEFAULT_WORKER_PROGRAM)
}

/// Worker executable settings shared by discovery and every endpoint.
///
/// # Fields
/// * `program` - Path of the worker executable (defaults to `tbg_client` on `PATH`)
/// * `server` - Remote server endpoint, passed as `-s <server>` (optional)
/// * `term_grace_ms` - Milliseconds between SIGTERM and SIGKILL on close (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_worker_program")]
    pub program: PathBuf,
    pub server: Option<String>,
    pub term_grace_ms: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: default_worker_program(),
            server: None,
            term_grace_ms: None,
        }
    }
}

impl WorkerConfig {
    /// Grace period before a closing worker is killed, using the built-in default if not configured.
    pub fn term_grace(&self) -> Duration {
        Duration::from_millis(self.term_grace_ms.unwrap_or(DEFAULT_TERM_GRACE_MS))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DecoderConfig {
    #[serde(default)]
    pub framing: FramingPolicy,
}

/// The four endpoint behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Streams `din` edges and republishes them unchanged.
    DigitalInput,
    /// Streams `ain_stdio` counts and republishes them as amps.
    DiagnosticInput,
    /// Drives one boolean output through a resident `dout` worker.
    BooleanOutput,
    /// Drives an enable line and a PWM channel through an interactive worker.
    CombinedOutput,
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EndpointKind::DigitalInput => "digital_input",
            EndpointKind::DiagnosticInput => "diagnostic_input",
            EndpointKind::BooleanOutput => "boolean_output",
            EndpointKind::CombinedOutput => "combined_output",
        };
        write!(f, "{}", name)
    }
}

/// Configuration for one endpoint.
///
/// `card` and `pin` are optional here so that a half-configured endpoint
/// still loads; it is rejected when bound to the board table and stays
/// inert instead of failing the whole session.
///
/// # Fields
/// * `id` - Unique endpoint identifier, used to address inbound messages
/// * `kind` - Which of the four behaviors to run
/// * `card` - Board id as reported by discovery
/// * `pin` - Pin number on the board
/// * `server` - Per-endpoint override of `worker.server`
/// * `initial_level` - Boolean output level written at startup
/// * `initial_enable` / `initial_pwm` - Combined output state written at startup
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub id: String,
    pub kind: EndpointKind,
    pub card: Option<CardId>,
    pub pin: Option<u32>,
    pub server: Option<String>,
    pub initial_level: Option<serde_json::Value>,
    pub initial_enable: Option<serde_json::Value>,
    pub initial_pwm: Option<serde_json::Value>,
}

impl EndpointConfig {
    /// Minimal config for `kind` bound to `card`/`pin`, with no initial values.
    pub fn new(id: impl Into<String>, kind: EndpointKind, card: Option<CardId>, pin: Option<u32>) -> Self {
        Self {
            id: id.into(),
            kind,
            card,
            pin,
            server: None,
            initial_level: None,
            initial_enable: None,
            initial_pwm: None,
        }
    }
}

/// Load a config from a YAML or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigFileError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);
    let cfg: Config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Load a config and reject files where two endpoints share an id.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigFileError> {
    let cfg = load_config(path)?;

    let mut seen = HashSet::new();
    for endpoint in &cfg.endpoints {
        if !seen.insert(endpoint.id.as_str()) {
            return Err(ConfigFileError::DuplicateEndpointId(endpoint.id.clone()));
        }
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
worker:
  program: /opt/touchbridge/tbg_client
  server: tcp://192.168.2.11:5555
endpoints:
  - id: door
    kind: digital_input
    card: "0x00AB"
    pin: 3
  - id: pump
    kind: combined_output
    card: 7
    pin: 1
    initial_enable: "true"
    initial_pwm: 0.25
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.worker.program, PathBuf::from("/opt/touchbridge/tbg_client"));
        assert_eq!(cfg.worker.server.as_deref(), Some("tcp://192.168.2.11:5555"));
        assert_eq!(cfg.endpoints.len(), 2);
        assert_eq!(cfg.endpoints[0].kind, EndpointKind::DigitalInput);
        assert_eq!(cfg.endpoints[0].card, Some(CardId::from(0xAB)));
        assert_eq!(cfg.endpoints[1].initial_pwm, Some(serde_json::json!(0.25)));
        assert_eq!(cfg.endpoints[1].initial_enable, Some(serde_json::json!("true")));
    }

    #[test]
    fn test_defaults() {
        let cfg: Config = serde_yaml::from_str("endpoints: []").unwrap();

        assert_eq!(cfg.worker.program, PathBuf::from("tbg_client"));
        assert!(cfg.worker.server.is_none());
        assert_eq!(cfg.worker.term_grace(), Duration::from_millis(5_000));
        assert_eq!(cfg.decoder.framing, FramingPolicy::CarryOver);
        assert_eq!(cfg.topic_namespace, "tbg");
    }

    #[test]
    fn test_framing_policy_override() {
        let cfg: Config = serde_yaml::from_str("decoder:\n  framing: discard_partial\n").unwrap();
        assert_eq!(cfg.decoder.framing, FramingPolicy::DiscardPartial);
    }

    #[test]
    fn test_endpoint_missing_pin_still_loads() {
        let yaml = r#"
endpoints:
  - id: half
    kind: boolean_output
    card: 3
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.endpoints[0].pin.is_none());
    }

    #[test]
    fn test_load_toml_by_extension() {
        let toml_text = r#"
topic_namespace = "plant"

[worker]
program = "/usr/local/bin/tbg_client"
term_grace_ms = 250

[[endpoints]]
id = "heater"
kind = "boolean_output"
card = 4
pin = 2
initial_level = 1
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(&path, toml_text).unwrap();

        let cfg = load_and_validate_config(&path).unwrap();
        assert_eq!(cfg.topic_namespace, "plant");
        assert_eq!(cfg.worker.term_grace(), Duration::from_millis(250));
        assert_eq!(cfg.endpoints[0].kind, EndpointKind::BooleanOutput);
        assert_eq!(cfg.endpoints[0].initial_level, Some(serde_json::json!(1)));
    }

    #[test]
    fn test_load_and_validate_duplicate_endpoint_ids() {
        let yaml = r#"
endpoints:
  - id: a
    kind: digital_input
    card: 1
    pin: 1
  - id: a
    kind: digital_input
    card: 1
    pin: 2
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.yaml");
        std::fs::write(&path, yaml).unwrap();

        let result = load_and_validate_config(&path);
        assert!(matches!(result, Err(ConfigFileError::DuplicateEndpointId(id)) if id == "a"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/bridge.yaml");
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }
}
