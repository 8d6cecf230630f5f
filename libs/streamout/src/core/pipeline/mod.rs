// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Boundary to the external media pipeline.
//!
//! The feed and overlay code only sees two capabilities: pushing a chunk
//! downstream ([`ChunkSink`]) and being handed frames for overlay
//! ([`MediaPipeline::connect_frame_hook`]). Which stages exist is decided
//! by a [`PipelineDescription`] and realised by a [`PipelineBuilder`].

mod bus;
mod channel_pipeline;
mod description;

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::core::frames::VideoFrameMut;

pub use bus::{PipelineMessage, log_pipeline_message};
pub use channel_pipeline::{ChannelPipeline, ChannelPipelineBuilder, PipelineTap};
pub use description::{PipelineDescription, SOURCE_STAGE};

/// Which elementary stream a path carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    Audio,
    Video,
}

impl StreamKind {
    pub fn label(&self) -> &'static str {
        match self {
            StreamKind::Audio => "Audio",
            StreamKind::Video => "Video",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Run state of an external pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineState {
    #[default]
    Null,
    Ready,
    Paused,
    Playing,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Null => "NULL",
            PipelineState::Ready => "READY",
            PipelineState::Paused => "PAUSED",
            PipelineState::Playing => "PLAYING",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Demand signal: the pipeline wants roughly `hint` more bytes.
pub type NeedDataFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Called once per delivered video frame, in place.
pub type FrameHookFn = Arc<dyn Fn(&mut VideoFrameMut<'_>) + Send + Sync>;

/// Accepts one discrete chunk of stream bytes.
pub trait ChunkSink: Send + Sync {
    fn push_chunk(&self, chunk: Bytes) -> Result<()>;
}

pub trait MediaPipeline: ChunkSink {
    fn description(&self) -> &PipelineDescription;

    fn set_state(&self, state: PipelineState) -> Result<()>;

    fn state(&self) -> PipelineState;

    /// Register the demand callback, replacing any previous one.
    fn connect_need_data(&self, callback: NeedDataFn);

    /// Register the per-frame overlay hook. Audio pipelines ignore it.
    fn connect_frame_hook(&self, _hook: FrameHookFn) {}

    /// Receiver for asynchronous pipeline messages, if the pipeline has a bus.
    fn bus(&self) -> Option<crossbeam_channel::Receiver<PipelineMessage>> {
        None
    }
}

pub trait PipelineBuilder: Send + Sync {
    fn build(&self, description: &PipelineDescription) -> Result<Arc<dyn MediaPipeline>>;
}
