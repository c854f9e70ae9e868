// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod boards;     // discovery + board table
pub mod config;     // config + runtime builder
pub mod endpoints;  // the four endpoint kinds and their runner
pub mod errors;     // error handling
pub mod host;       // line-oriented bus host
pub mod observability;
pub mod process;    // worker supervision
pub mod protocol;   // wire commands and line decoding
pub mod session;
pub mod traits;     // seams between endpoints, workers and the host

#[cfg(test)]
pub mod testing;
