// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod context;
pub mod endpoint;
pub mod worker;

pub use context::{EndpointStatus, FlowContext, InboundMessage, OutboundMessage};
pub use endpoint::{Endpoint, EndpointState};
pub use worker::{ClosePhase, WorkerLink};
