// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use super::StreamKind;
use crate::core::config::OutputConfig;

/// Push-source stage that the pull adapter feeds.
pub const SOURCE_STAGE: &str = "appsrc";

const SOFTWARE_DECODER: &str = "decodebin";
const HARDWARE_DECODER: &str = "vaapidecodebin";

/// Ordered stage list for one stream path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDescription {
    pub kind: StreamKind,
    pub stages: Vec<String>,
}

impl PipelineDescription {
    pub fn audio(config: &OutputConfig) -> Self {
        Self {
            kind: StreamKind::Audio,
            stages: vec![
                SOURCE_STAGE.to_string(),
                SOFTWARE_DECODER.to_string(),
                "audioconvert".to_string(),
                "audioresample".to_string(),
                config.audio_sink.clone(),
            ],
        }
    }

    pub fn video(config: &OutputConfig) -> Self {
        let decoder = if config.use_hardware_decoding {
            HARDWARE_DECODER
        } else {
            SOFTWARE_DECODER
        };

        let mut stages = vec![SOURCE_STAGE.to_string(), decoder.to_string()];
        if config.deinterlace {
            stages.push("deinterlace".to_string());
        }
        stages.extend([
            "videoconvert".to_string(),
            "videoscale".to_string(),
            config.video_sink.clone(),
        ]);

        Self {
            kind: StreamKind::Video,
            stages,
        }
    }

    pub fn for_kind(kind: StreamKind, config: &OutputConfig) -> Self {
        match kind {
            StreamKind::Audio => Self::audio(config),
            StreamKind::Video => Self::video(config),
        }
    }

    pub fn uses_hardware_decoder(&self) -> bool {
        self.stages.iter().any(|s| s == HARDWARE_DECODER)
    }

    /// Same pipeline with the hardware decoder swapped for the software one.
    pub fn with_software_decoder(&self) -> Self {
        let stages = self
            .stages
            .iter()
            .map(|s| {
                if s == HARDWARE_DECODER {
                    SOFTWARE_DECODER.to_string()
                } else {
                    s.clone()
                }
            })
            .collect();

        Self {
            kind: self.kind,
            stages,
        }
    }

    pub fn sink(&self) -> Option<&str> {
        self.stages.last().map(String::as_str)
    }
}

impl std::fmt::Display for PipelineDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stages.join(" ! "))
    }
}
