// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use super::StreamOutput;
use super::housekeeping::Housekeeping;
use crate::core::Result;
use crate::core::config::OutputConfig;
use crate::core::feed::FeedStatistics;
use crate::core::osd::{OsdCompositor, OsdSurface};
use crate::core::pipeline::{PipelineBuilder, StreamKind};

/// Snapshot of both feed paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputStatistics {
    pub audio: FeedStatistics,
    pub video: FeedStatistics,
}

impl std::fmt::Display for OutputStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.audio, self.video)
    }
}

/// Composition root: both stream paths, the OSD compositor and the
/// housekeeping thread.
pub struct OutputEngine {
    config: OutputConfig,
    audio: Arc<StreamOutput>,
    video: Arc<StreamOutput>,
    compositor: Arc<OsdCompositor>,
    housekeeping: Mutex<Option<Housekeeping>>,
}

impl OutputEngine {
    pub fn initialize(config: &OutputConfig, builder: &dyn PipelineBuilder) -> Result<Self> {
        config.validate()?;

        let audio = Arc::new(StreamOutput::initialize(StreamKind::Audio, config, builder)?);
        let video = Arc::new(StreamOutput::initialize(StreamKind::Video, config, builder)?);

        let compositor = Arc::new(OsdCompositor::new(config.osd_destination_alpha));
        if config.osd_blending {
            video.pipeline().connect_frame_hook(compositor.frame_hook());
        }

        tracing::info!(
            audio_buffer_kb = config.audio_buffer_kb,
            video_buffer_kb = config.video_buffer_kb,
            osd_blending = config.osd_blending,
            "Output engine initialized"
        );

        Ok(Self {
            config: config.clone(),
            audio,
            video,
            compositor,
            housekeeping: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn audio(&self) -> &Arc<StreamOutput> {
        &self.audio
    }

    pub fn video(&self) -> &Arc<StreamOutput> {
        &self.video
    }

    /// OSD provider shared with the video pipeline's overlay hook.
    pub fn compositor(&self) -> &Arc<OsdCompositor> {
        &self.compositor
    }

    pub fn create_osd(&self, left: i32, top: i32, level: u32) -> Result<OsdSurface> {
        self.compositor.create_osd(left, top, level)
    }

    pub fn start(&self) -> Result<()> {
        self.audio.start()?;
        self.video.start()?;

        let mut housekeeping = self.housekeeping.lock();
        if housekeeping.is_none() {
            *housekeeping = Some(Housekeeping::spawn(
                Arc::clone(&self.audio),
                Arc::clone(&self.video),
                Duration::from_millis(self.config.housekeeping_interval_ms.max(1)),
                Duration::from_millis(self.config.stop_timeout_ms),
            )?);
        }
        Ok(())
    }

    /// Stop both paths. Idempotent; both paths are stopped even if the
    /// first one fails.
    pub fn stop(&self) -> Result<()> {
        let housekeeping = self.housekeeping.lock().take();
        if let Some(housekeeping) = housekeeping {
            housekeeping.stop();
        }

        let audio = self.audio.stop();
        let video = self.video.stop();
        audio.and(video)
    }

    /// Reset both paths; the video path is reset even if audio fails.
    pub fn reset(&self) -> Result<()> {
        let audio = self.audio.reset();
        let video = self.video.reset();
        audio.and(video)
    }

    pub fn play_audio(&self, data: &[u8]) -> Result<()> {
        self.audio.play(data)
    }

    pub fn play_video(&self, data: &[u8]) -> Result<()> {
        self.video.play(data)
    }

    pub fn clear(&self) {
        self.audio.clear();
        self.video.clear();
    }

    pub fn statistics(&self) -> OutputStatistics {
        OutputStatistics {
            audio: self.audio.statistics(),
            video: self.video.statistics(),
        }
    }
}

impl Drop for OutputEngine {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("Error stopping output engine: {}", e);
        }
    }
}
