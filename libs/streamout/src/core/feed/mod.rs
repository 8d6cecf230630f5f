// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Bounded byte feeds between an irregular producer and a demand-driven
//! pipeline source.

mod feed_buffer;
mod pull_adapter;
mod statistics;

pub use feed_buffer::{FeedBuffer, FeedLevels};
pub use pull_adapter::PullAdapter;
pub use statistics::FeedStatistics;
