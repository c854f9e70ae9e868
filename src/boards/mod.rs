// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Board address discovery and the board table it produces.

mod descriptor;
mod discovery;
mod ids;
mod registry;

pub use descriptor::{BoardDescriptor, ProductInfo};
pub use discovery::discover;
pub use ids::{BoardAddress, CardId, Scalar};
pub use registry::BoardRegistry;
