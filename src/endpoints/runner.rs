// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Drives endpoints on the tokio reactor.
//!
//! Each endpoint runs in its own task, which is the only owner of the
//! endpoint and its worker link. The task multiplexes three sources:
//!
//! * worker events (stdout chunks, stderr, exit, errors),
//! * inbound messages from the host bus,
//! * the host's close request.
//!
//! Worker events are polled first, so every chunk read before a close
//! request is handled in the `Running` state.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::observability::messages::endpoint::EndpointStarted;
use crate::observability::messages::StructuredLog;
use crate::process::ProcessEvent;
use crate::traits::{ClosePhase, Endpoint, EndpointState, InboundMessage};

/// Host-side handle on one running endpoint.
pub struct EndpointHandle {
    id: String,
    inbound: mpsc::UnboundedSender<InboundMessage>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl EndpointHandle {
    /// Move `endpoint` into its own task, fed by its worker's `events`.
    pub fn spawn(
        endpoint: Box<dyn Endpoint>,
        events: mpsc::UnboundedReceiver<ProcessEvent>,
    ) -> Self {
        let id = endpoint.id().to_string();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let span = EndpointStarted {
            endpoint: &id,
            kind: endpoint.kind(),
            command: "",
        }
        .span("endpoint_runner");
        let task = tokio::spawn(
            run_endpoint(endpoint, events, inbound_rx, shutdown.clone()).instrument(span),
        );

        Self {
            id,
            inbound: inbound_tx,
            shutdown,
            task,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queue a bus message for the endpoint. Returns false once the
    /// endpoint task has finished.
    pub fn deliver(&self, message: InboundMessage) -> bool {
        self.inbound.send(message).is_ok()
    }

    /// Close the endpoint and wait until its worker has exited.
    pub async fn close(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(endpoint = %self.id, error = %e, "Endpoint task ended abnormally");
        }
    }
}

async fn run_endpoint(
    mut endpoint: Box<dyn Endpoint>,
    mut events: mpsc::UnboundedReceiver<ProcessEvent>,
    mut inbound: mpsc::UnboundedReceiver<InboundMessage>,
    shutdown: CancellationToken,
) {
    let mut closing = false;
    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                event.dispatch(endpoint.as_mut());
                if closing && endpoint.state() == EndpointState::Closed {
                    break;
                }
            }
            _ = shutdown.cancelled(), if !closing => {
                closing = true;
                if endpoint.begin_close() == ClosePhase::Closed {
                    break;
                }
            }
            Some(message) = inbound.recv(), if !closing => {
                endpoint.on_input(&message);
            }
            else => break,
        }
    }
}

/// Every running endpoint of a session, addressed by endpoint id.
#[derive(Default)]
pub struct Bridge {
    endpoints: HashMap<String, EndpointHandle>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: EndpointHandle) {
        self.endpoints.insert(handle.id().to_string(), handle);
    }

    /// Route a bus message to endpoint `id`. Returns false when no such
    /// endpoint is running.
    pub fn deliver(&self, id: &str, message: InboundMessage) -> bool {
        self.endpoints
            .get(id)
            .map(|handle| handle.deliver(message))
            .unwrap_or(false)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Close every endpoint concurrently and wait for all workers to exit.
    pub async fn close(self) {
        let mut closing = JoinSet::new();
        for (_, handle) in self.endpoints {
            closing.spawn(handle.close());
        }
        while closing.join_next().await.is_some() {}
    }
}
