// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A line-oriented host bus over any async reader and writer.
//!
//! Inbound messages are JSON lines `{"endpoint": id, "topic"?: str, "payload": value}`.
//! Published samples are written as JSON lines `{"endpoint": id, "topic": str, "payload": number}`.

use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::endpoints::Bridge;
use crate::observability::messages::endpoint::{EndpointStatusChanged, UnknownEndpoint};
use crate::observability::messages::StructuredLog;
use crate::traits::{EndpointStatus, FlowContext, InboundMessage, OutboundMessage};

/// A published sample, tagged with the endpoint that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusEnvelope {
    pub endpoint: String,
    pub topic: String,
    pub payload: f64,
}

/// An inbound bus line addressed to one endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundEnvelope {
    pub endpoint: String,
    #[serde(flatten)]
    pub message: InboundMessage,
}

/// Host context for one endpoint: samples go to a shared channel, status
/// and notices go to the log.
pub struct ChannelContext {
    endpoint: String,
    outbound: mpsc::UnboundedSender<BusEnvelope>,
}

impl ChannelContext {
    pub fn new(endpoint: impl Into<String>, outbound: mpsc::UnboundedSender<BusEnvelope>) -> Arc<Self> {
        Arc::new(Self {
            endpoint: endpoint.into(),
            outbound,
        })
    }
}

impl FlowContext for ChannelContext {
    fn send(&self, message: OutboundMessage) {
        // the receiver only goes away during shutdown
        let _ = self.outbound.send(BusEnvelope {
            endpoint: self.endpoint.clone(),
            topic: message.topic,
            payload: message.payload,
        });
    }

    fn set_status(&self, status: EndpointStatus) {
        EndpointStatusChanged {
            endpoint: &self.endpoint,
            status: &status,
        }
        .log();
    }

    fn warn(&self, message: &str) {
        tracing::warn!(endpoint = %self.endpoint, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(endpoint = %self.endpoint, "{}", message);
    }
}

async fn write_envelope<W>(output: &mut W, envelope: &BusEnvelope) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(envelope)?;
    line.push('\n');
    output
        .write_all(line.as_bytes())
        .await
        .context("Failed to write to the bus")?;
    output.flush().await?;
    Ok(())
}

fn route(bridge: &Bridge, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    match serde_json::from_str::<InboundEnvelope>(line) {
        Ok(envelope) => {
            if !bridge.deliver(&envelope.endpoint, envelope.message) {
                UnknownEndpoint {
                    endpoint: &envelope.endpoint,
                }
                .log();
            }
        }
        Err(e) => tracing::warn!(error = %e, "Ignoring malformed bus line"),
    }
}

/// Pump bus traffic until `shutdown` fires or `input` reaches end of file,
/// then close every endpoint and flush the samples they published.
pub async fn serve<R, W>(
    bridge: Bridge,
    input: R,
    mut output: W,
    mut outbound: mpsc::UnboundedReceiver<BusEnvelope>,
    shutdown: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            Some(envelope) = outbound.recv() => write_envelope(&mut output, &envelope).await?,
            line = lines.next_line() => match line.context("Failed to read from the bus")? {
                Some(line) => route(&bridge, &line),
                None => break,
            },
        }
    }

    bridge.close().await;
    while let Ok(envelope) = outbound.try_recv() {
        write_envelope(&mut output, &envelope).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Endpoint;
    use crate::endpoints::{DigitalInput, EndpointHandle, EndpointSettings};
    use crate::boards::CardId;
    use crate::config::{EndpointConfig, EndpointKind};
    use crate::process::ProcessEvent;
    use crate::testing::{registry, RecordingWorker};

    #[test]
    fn test_inbound_envelope() {
        let envelope: InboundEnvelope =
            serde_json::from_str(r#"{"endpoint": "pump", "topic": "pwm", "payload": 0.5}"#).unwrap();
        assert_eq!(envelope.endpoint, "pump");
        assert_eq!(envelope.message, InboundMessage::with_topic("pwm", serde_json::json!(0.5)));
    }

    #[test]
    fn test_outbound_envelope_json() {
        let envelope = BusEnvelope {
            endpoint: "door".to_string(),
            topic: "tbg/3".to_string(),
            payload: 1.0,
        };
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"endpoint":"door","topic":"tbg/3","payload":1.0}"#
        );
    }

    #[tokio::test]
    async fn test_serve_writes_samples_and_stops_at_eof() {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let config = EndpointConfig::new("door", EndpointKind::DigitalInput, Some(CardId::from(171)), Some(3));
        let endpoint = DigitalInput::new(
            &config,
            &registry(),
            &EndpointSettings::default(),
            RecordingWorker::new(),
            ChannelContext::new("door", outbound_tx.clone()),
        );
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        events_tx.send(ProcessEvent::Stdout(b"1\n".to_vec())).unwrap();
        let handle = EndpointHandle::spawn(Box::new(endpoint) as Box<dyn Endpoint>, events_rx);
        let mut bridge = Bridge::new();
        bridge.insert(handle);

        let closer = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            let _ = events_tx.send(ProcessEvent::Exit(Default::default()));
        });

        let mut output = Vec::new();
        let input: &[u8] = b"{\"endpoint\": \"nobody\", \"payload\": 1}\n";
        serve(bridge, input, &mut output, outbound_rx, CancellationToken::new())
            .await
            .unwrap();
        closer.await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "{\"endpoint\":\"door\",\"topic\":\"tbg/3\",\"payload\":1.0}\n");
    }
}
