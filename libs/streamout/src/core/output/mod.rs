// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod engine;
mod housekeeping;
mod stream_output;

pub use engine::{OutputEngine, OutputStatistics};
pub use stream_output::StreamOutput;
