// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;
mod validation;

pub mod consts;

pub use loader::{
    load_and_validate_config, load_config, Config, DecoderConfig, EndpointConfig, EndpointKind,
    WorkerConfig,
};
pub use runtime::RuntimeBuilder;
pub use validation::{resolve_binding, Binding};
