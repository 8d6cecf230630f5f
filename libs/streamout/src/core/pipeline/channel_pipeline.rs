// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! In-process pipeline backed by crossbeam channels.
//!
//! Chunks pushed by the pull adapter land in a channel whose receiving
//! end is a [`PipelineTap`]. The tap plays the part of the downstream
//! stages: it raises the demand signal, takes chunks, and hands video
//! frames to the registered overlay hook.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use super::{
    ChunkSink, FrameHookFn, MediaPipeline, NeedDataFn, PipelineBuilder, PipelineDescription,
    PipelineMessage, PipelineState, StreamKind,
};
use crate::core::frames::VideoFrameMut;
use crate::core::{Result, StreamError};

const BUS_CAPACITY: usize = 64;

pub struct ChannelPipeline {
    description: PipelineDescription,
    state: Mutex<PipelineState>,
    need_data: Mutex<Option<NeedDataFn>>,
    frame_hook: Mutex<Option<FrameHookFn>>,
    chunk_tx: Sender<Bytes>,
    bus_tx: Sender<PipelineMessage>,
    bus_rx: Receiver<PipelineMessage>,
}

impl ChannelPipeline {
    pub fn new(description: PipelineDescription) -> (Arc<Self>, PipelineTap) {
        let (chunk_tx, chunk_rx) = crossbeam_channel::unbounded();
        let (bus_tx, bus_rx) = crossbeam_channel::bounded(BUS_CAPACITY);

        let pipeline = Arc::new(Self {
            description,
            state: Mutex::new(PipelineState::Null),
            need_data: Mutex::new(None),
            frame_hook: Mutex::new(None),
            chunk_tx,
            bus_tx,
            bus_rx,
        });

        let tap = PipelineTap {
            pipeline: Arc::clone(&pipeline),
            chunk_rx,
        };

        (pipeline, tap)
    }

    /// Post a message on the bus. Dropped if nobody drains the bus.
    pub fn post_message(&self, message: PipelineMessage) {
        if let Err(TrySendError::Full(message)) = self.bus_tx.try_send(message) {
            tracing::trace!(stream = %self.description.kind, ?message, "Bus full, dropping message");
        }
    }
}

impl ChunkSink for ChannelPipeline {
    fn push_chunk(&self, chunk: Bytes) -> Result<()> {
        let state = *self.state.lock();
        if state != PipelineState::Playing {
            return Err(StreamError::Pipeline(format!(
                "{} source refused chunk in state {}",
                self.description.kind, state
            )));
        }

        self.chunk_tx
            .send(chunk)
            .map_err(|_| StreamError::Pipeline("downstream receiver dropped".into()))
    }
}

impl MediaPipeline for ChannelPipeline {
    fn description(&self) -> &PipelineDescription {
        &self.description
    }

    fn set_state(&self, state: PipelineState) -> Result<()> {
        let old = std::mem::replace(&mut *self.state.lock(), state);
        if old != state {
            self.post_message(PipelineMessage::StateChanged { old, new: state });
        }
        Ok(())
    }

    fn state(&self) -> PipelineState {
        *self.state.lock()
    }

    fn connect_need_data(&self, callback: NeedDataFn) {
        *self.need_data.lock() = Some(callback);
    }

    fn connect_frame_hook(&self, hook: FrameHookFn) {
        if self.description.kind == StreamKind::Video {
            *self.frame_hook.lock() = Some(hook);
        }
    }

    fn bus(&self) -> Option<Receiver<PipelineMessage>> {
        Some(self.bus_rx.clone())
    }
}

/// Downstream end of a [`ChannelPipeline`].
#[derive(Clone)]
pub struct PipelineTap {
    pipeline: Arc<ChannelPipeline>,
    chunk_rx: Receiver<Bytes>,
}

impl PipelineTap {
    pub fn pipeline(&self) -> &Arc<ChannelPipeline> {
        &self.pipeline
    }

    /// Raise one demand signal and take the next chunk, if any.
    ///
    /// Does nothing while the pipeline is not playing.
    pub fn request(&self, hint: usize) -> Option<Bytes> {
        if self.pipeline.state() != PipelineState::Playing {
            return None;
        }

        let callback = self.pipeline.need_data.lock().clone();
        if let Some(callback) = callback {
            callback(hint);
        }

        self.chunk_rx.try_recv().ok()
    }

    /// Chunks already pushed but not yet taken.
    pub fn drain(&self) -> Vec<Bytes> {
        self.chunk_rx.try_iter().collect()
    }

    /// Hand one frame to the overlay hook. Returns false if none is registered.
    pub fn deliver_frame(&self, frame: &mut VideoFrameMut<'_>) -> bool {
        let hook = self.pipeline.frame_hook.lock().clone();
        match hook {
            Some(hook) => {
                hook(frame);
                true
            }
            None => false,
        }
    }
}

/// Builds [`ChannelPipeline`]s and keeps their taps for the caller.
#[derive(Default)]
pub struct ChannelPipelineBuilder {
    taps: Mutex<HashMap<StreamKind, PipelineTap>>,
    unavailable: Vec<String>,
}

impl ChannelPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `stage` cannot be instantiated (e.g. no hardware decoder).
    pub fn with_unavailable_stage(mut self, stage: impl Into<String>) -> Self {
        self.unavailable.push(stage.into());
        self
    }

    pub fn tap(&self, kind: StreamKind) -> Option<PipelineTap> {
        self.taps.lock().get(&kind).cloned()
    }
}

impl PipelineBuilder for ChannelPipelineBuilder {
    fn build(&self, description: &PipelineDescription) -> Result<Arc<dyn MediaPipeline>> {
        if let Some(stage) = description
            .stages
            .iter()
            .find(|s| self.unavailable.contains(s))
        {
            return Err(StreamError::Pipeline(format!(
                "Failed to create {} stage '{}'",
                description.kind, stage
            )));
        }

        let (pipeline, tap) = ChannelPipeline::new(description.clone());
        self.taps.lock().insert(description.kind, tap);

        Ok(pipeline)
    }
}
