// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Worker process supervision.

mod events;
mod supervisor;

pub use events::{ProcessEvent, ProcessObserver, WorkerExit};
pub use supervisor::{ClientProcessSupervisor, SupervisorState};
