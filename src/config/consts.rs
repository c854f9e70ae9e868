// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Worker executable used when the deployment file names none
pub const DEFAULT_WORKER_PROGRAM: &str = "tbg_client";
/// Prefix of outbound sample topics (`<namespace>/<pin>`)
pub const DEFAULT_TOPIC_NAMESPACE: &str = "tbg";
/// Time a worker gets to exit after SIGTERM before it is killed outright
pub const DEFAULT_TERM_GRACE_MS: u64 = 5_000;
