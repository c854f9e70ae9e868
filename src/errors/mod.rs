// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod config_file;
mod discovery;
mod process;

pub use config::ConfigError;
pub use config_file::ConfigFileError;
pub use discovery::DiscoveryError;
pub use process::ProcessError;
