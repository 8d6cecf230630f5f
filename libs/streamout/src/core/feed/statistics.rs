// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::Serialize;

use crate::core::pipeline::{PipelineState, StreamKind};

/// Point-in-time snapshot of one feed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedStatistics {
    pub kind: StreamKind,
    pub state: PipelineState,
    /// Bytes buffered and not yet delivered.
    pub available: usize,
    pub free: usize,
    pub capacity: usize,
    pub chunks_delivered: u64,
    pub bytes_delivered: u64,
}

impl FeedStatistics {
    pub fn available_kb(&self) -> usize {
        self.available / 1024
    }

    pub fn capacity_kb(&self) -> usize {
        self.capacity / 1024
    }
}

impl std::fmt::Display for FeedStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}, Buffer: {}/{} KB",
            self.kind,
            self.state,
            self.available_kb(),
            self.capacity_kb()
        )
    }
}
