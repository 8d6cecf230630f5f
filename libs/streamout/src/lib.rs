// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Demand-driven audio/video feeds and a composited true-color OSD for
//! streaming media pipelines.

#![allow(clippy::too_many_arguments)] // Raster calls mirror the OSD drawing API
#![allow(clippy::type_complexity)]

pub mod core;

pub use core::config::OutputConfig;
pub use core::feed::{FeedBuffer, FeedStatistics, PullAdapter};
pub use core::frames::{FrameLayout, VideoFrameMut};
pub use core::osd::{OsdCompositor, OsdSurface};
pub use core::output::{OutputEngine, OutputStatistics, StreamOutput};
pub use core::{Result, StreamError};
