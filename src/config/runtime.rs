// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{Config, EndpointConfig};
use crate::endpoints::{Bridge, EndpointSettings};
use crate::errors::DiscoveryError;
use crate::session::Session;
use crate::traits::FlowContext;

/// Bridge runtime builder - runs discovery and starts every configured endpoint.
///
/// The `RuntimeBuilder` ties the pieces of a session together: it performs the
/// one discovery call, builds an [`EndpointFactory`](crate::endpoints::EndpointFactory)
/// from its result, and starts each endpoint from the configuration with a host
/// context chosen by the caller.
///
/// Endpoints whose configuration does not bind stay inert inside the bridge;
/// only a discovery failure stops the session from starting.
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Discover boards, then start every endpoint in `cfg`.
    ///
    /// # Arguments
    /// * `cfg` - Worker settings, decoder policy and endpoint list
    /// * `context_for` - Host context for each endpoint
    ///
    /// # Returns
    /// The session (for the board table) and the running bridge
    pub async fn from_config<F>(
        cfg: &Config,
        context_for: F,
    ) -> Result<(Session, Bridge), DiscoveryError>
    where
        F: FnMut(&EndpointConfig) -> Arc<dyn FlowContext>,
    {
        let session = Session::open(&cfg.worker).await?;
        let bridge = Self::start(cfg, &session, context_for);
        Ok((session, bridge))
    }

    /// Start every endpoint in `cfg` against an already discovered session.
    pub fn start<F>(cfg: &Config, session: &Session, mut context_for: F) -> Bridge
    where
        F: FnMut(&EndpointConfig) -> Arc<dyn FlowContext>,
    {
        let factory = session.factory(EndpointSettings::from(cfg));
        let mut bridge = Bridge::new();
        for endpoint in &cfg.endpoints {
            bridge.insert(factory.start(endpoint, context_for(endpoint)));
        }
        bridge
    }
}
