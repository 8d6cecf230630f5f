// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod config;
pub mod error;
pub mod feed;
pub mod frames;
pub mod osd;
pub mod output;
pub mod pipeline;

pub use error::*;
