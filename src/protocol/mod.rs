// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The line-oriented text protocol spoken with worker processes.

pub mod decoder;
pub mod encoder;
pub mod values;

pub use decoder::{FramingPolicy, LineDecoder};
pub use encoder::Command;
pub use values::{coerce_number, format_value, normalize_bool, pwm_steps, Transform};
