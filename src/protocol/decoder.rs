// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reassembles a worker's stdout byte stream into numeric samples.
//!
//! Each chunk is split on `\n`. Every complete line is trimmed and parsed;
//! lines that are not numbers are dropped without error. What happens to
//! the unterminated tail of a chunk depends on the [`FramingPolicy`].

use serde::Deserialize;

use super::values::{parse_number, Transform};

const LINE_TERMINATOR: u8 = b'\n';
/// Longest unterminated tail carried into the next chunk. A longer line
/// cannot be a sample, so it is dropped up to its terminator.
pub const MAX_PENDING_BYTES: usize = 1024;

/// What to do with the bytes after the last line terminator of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingPolicy {
    /// Keep the tail and prefix it to the next chunk.
    #[default]
    CarryOver,
    /// Drop the tail. A line split across two chunks is lost.
    DiscardPartial,
}

#[derive(Debug)]
pub struct LineDecoder {
    transform: Transform,
    framing: FramingPolicy,
    pending: Vec<u8>,
    /// Inside an over-long line; bytes are dropped until the next terminator.
    overflowed: bool,
    suppressed: bool,
}

impl LineDecoder {
    pub fn new(transform: Transform, framing: FramingPolicy) -> Self {
        Self {
            transform,
            framing,
            pending: Vec::new(),
            overflowed: false,
            suppressed: false,
        }
    }

    /// Decode one chunk into samples, in line order.
    ///
    /// Once [`suppress`](Self::suppress) has been called this always returns
    /// an empty vector, whatever the chunk holds.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<f64> {
        if self.suppressed {
            return Vec::new();
        }

        let mut buffer = std::mem::take(&mut self.pending);
        buffer.extend_from_slice(chunk);

        let mut segments: Vec<&[u8]> = buffer.split(|b| *b == LINE_TERMINATOR).collect();
        // split always yields at least one segment; the last is never terminated
        let tail = segments.pop().unwrap_or_default();

        let mut lines = segments.into_iter();
        if self.overflowed && lines.len() > 0 {
            // remainder of the over-long line
            lines.next();
            self.overflowed = false;
        }

        let transform = self.transform;
        let samples = lines
            .filter_map(|line| parse_number(&String::from_utf8_lossy(line)))
            .map(|value| transform.apply(value))
            .collect();

        if self.framing == FramingPolicy::CarryOver {
            if self.overflowed || tail.len() > MAX_PENDING_BYTES {
                self.overflowed = true;
            } else {
                self.pending = tail.to_vec();
            }
        }

        samples
    }

    /// Stop emitting samples for good and drop any buffered partial line.
    pub fn suppress(&mut self) {
        self.suppressed = true;
        self.overflowed = false;
        self.pending.clear();
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Bytes currently held back waiting for a line terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
