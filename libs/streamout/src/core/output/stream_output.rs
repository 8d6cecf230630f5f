// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use bytes::Bytes;

use crate::core::Result;
use crate::core::config::OutputConfig;
use crate::core::feed::{FeedBuffer, FeedStatistics, PullAdapter};
use crate::core::pipeline::{
    ChunkSink, MediaPipeline, PipelineBuilder, PipelineDescription, PipelineState, StreamKind,
};

/// Forwards pull-adapter chunks into the pipeline's source stage.
struct PipelineSource(Arc<dyn MediaPipeline>);

impl ChunkSink for PipelineSource {
    fn push_chunk(&self, chunk: Bytes) -> Result<()> {
        self.0.push_chunk(chunk)
    }
}

/// One audio or video path: feed buffer, pull adapter and pipeline.
pub struct StreamOutput {
    kind: StreamKind,
    feed: Arc<FeedBuffer>,
    adapter: Arc<PullAdapter>,
    pipeline: Arc<dyn MediaPipeline>,
}

impl StreamOutput {
    pub fn initialize(
        kind: StreamKind,
        config: &OutputConfig,
        builder: &dyn PipelineBuilder,
    ) -> Result<Self> {
        let capacity = match kind {
            StreamKind::Audio => config.audio_buffer_bytes()?,
            StreamKind::Video => config.video_buffer_bytes()?,
        };
        let feed = Arc::new(FeedBuffer::new(kind.label(), capacity).inspect_err(|e| {
            tracing::error!(stream = %kind, capacity, "Failed to allocate feed buffer: {}", e);
        })?);

        let description = PipelineDescription::for_kind(kind, config);
        let pipeline = match builder.build(&description) {
            Ok(pipeline) => pipeline,
            Err(e) if description.uses_hardware_decoder() => {
                tracing::warn!(
                    stream = %kind,
                    "Hardware decoder unavailable ({}), falling back to software decoding",
                    e
                );
                builder.build(&description.with_software_decoder())?
            }
            Err(e) => {
                tracing::error!(stream = %kind, "Failed to create pipeline: {}", e);
                return Err(e);
            }
        };

        let sink: Arc<dyn ChunkSink> = Arc::new(PipelineSource(Arc::clone(&pipeline)));
        let adapter = Arc::new(PullAdapter::new(
            Arc::clone(&feed),
            sink,
            config.max_chunk_bytes,
        ));
        pipeline.connect_need_data(adapter.need_data_callback());

        tracing::info!(stream = %kind, pipeline = %pipeline.description(), "Pipeline created");

        Ok(Self {
            kind,
            feed,
            adapter,
            pipeline,
        })
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn feed(&self) -> &Arc<FeedBuffer> {
        &self.feed
    }

    pub fn adapter(&self) -> &Arc<PullAdapter> {
        &self.adapter
    }

    pub fn pipeline(&self) -> &Arc<dyn MediaPipeline> {
        &self.pipeline
    }

    pub fn start(&self) -> Result<()> {
        self.pipeline.set_state(PipelineState::Playing)?;
        self.feed.set_accepting(true);
        tracing::info!(stream = %self.kind, "Pipeline started");
        Ok(())
    }

    /// Safe to call when never started or already stopped.
    pub fn stop(&self) -> Result<()> {
        self.feed.set_accepting(false);
        if self.pipeline.state() != PipelineState::Null {
            self.pipeline.set_state(PipelineState::Null)?;
            tracing::info!(stream = %self.kind, "Pipeline stopped");
        }
        Ok(())
    }

    /// Drop buffered data and cycle the pipeline. A stream that was not
    /// started stays stopped.
    pub fn reset(&self) -> Result<()> {
        let was_started = self.feed.is_accepting();
        self.feed.set_accepting(false);
        self.pipeline.set_state(PipelineState::Null)?;
        self.feed.clear();

        if was_started {
            self.pipeline.set_state(PipelineState::Playing)?;
            self.feed.set_accepting(true);
        }
        tracing::info!(stream = %self.kind, restarted = was_started, "Pipeline reset");
        Ok(())
    }

    /// Queue `data` in full or reject it.
    pub fn play(&self, data: &[u8]) -> Result<()> {
        self.feed.put(data)
    }

    pub fn clear(&self) {
        self.feed.clear();
    }

    pub fn statistics(&self) -> FeedStatistics {
        let levels = self.feed.levels();
        FeedStatistics {
            kind: self.kind,
            state: self.pipeline.state(),
            available: levels.available,
            free: levels.free,
            capacity: levels.capacity,
            chunks_delivered: self.adapter.chunks_delivered(),
            bytes_delivered: self.adapter.bytes_delivered(),
        }
    }
}

impl std::fmt::Debug for StreamOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamOutput")
            .field("kind", &self.kind)
            .field("pipeline", self.pipeline.description())
            .field("state", &self.pipeline.state())
            .finish()
    }
}
