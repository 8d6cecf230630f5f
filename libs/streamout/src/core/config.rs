// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Output configuration.
//!
//! One [`OutputConfig`] is built at startup (defaults, a TOML file, or
//! setup-store key/value pairs) and passed by reference into
//! [`OutputEngine::initialize`](crate::core::output::OutputEngine::initialize).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::osd::DestinationAlpha;
use crate::core::{Result, StreamError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Audio device index handed to the sink stage.
    pub audio_device: i32,
    /// Video device index handed to the sink stage.
    pub video_device: i32,
    /// Prefer the hardware decoder stage, falling back to software.
    pub use_hardware_decoding: bool,
    /// Insert a deinterlace stage into the video pipeline.
    pub deinterlace: bool,
    /// Audio feed buffer capacity in kilobytes.
    pub audio_buffer_kb: usize,
    /// Video feed buffer capacity in kilobytes.
    pub video_buffer_kb: usize,
    pub audio_sink: String,
    pub video_sink: String,
    /// Blend the published OSD onto every delivered video frame.
    pub osd_blending: bool,
    /// What the overlay does to the destination frame's alpha byte.
    pub osd_destination_alpha: DestinationAlpha,
    /// Upper bound for a single chunk forwarded on one demand signal.
    pub max_chunk_bytes: usize,
    pub housekeeping_interval_ms: u64,
    /// How long `stop` waits for the housekeeping thread.
    pub stop_timeout_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            audio_device: 0,
            video_device: 0,
            use_hardware_decoding: true,
            deinterlace: true,
            audio_buffer_kb: 200,
            video_buffer_kb: 200,
            audio_sink: "autoaudiosink".to_string(),
            video_sink: "autovideosink".to_string(),
            osd_blending: true,
            osd_destination_alpha: DestinationAlpha::Preserve,
            max_chunk_bytes: 64 * 1024,
            housekeeping_interval_ms: 100,
            stop_timeout_ms: 3000,
        }
    }
}

/// Setup-store keys understood by [`OutputConfig::apply_setup`].
pub const SETUP_KEYS: [&str; 9] = [
    "AudioDevice",
    "VideoDevice",
    "UseHardwareDecoding",
    "Deinterlace",
    "AudioBufferSize",
    "VideoBufferSize",
    "AudioSink",
    "VideoSink",
    "OsdBlending",
];

impl OutputConfig {
    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StreamError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_toml_str(&content).map_err(|e| {
            StreamError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::info!("Loaded output config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| StreamError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StreamError::Configuration(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.audio_buffer_kb == 0 {
            return Err(StreamError::Configuration(
                "audio_buffer_kb must be greater than zero".into(),
            ));
        }
        if self.video_buffer_kb == 0 {
            return Err(StreamError::Configuration(
                "video_buffer_kb must be greater than zero".into(),
            ));
        }
        if self.max_chunk_bytes == 0 {
            return Err(StreamError::Configuration(
                "max_chunk_bytes must be greater than zero".into(),
            ));
        }
        if self.audio_sink.trim().is_empty() || self.video_sink.trim().is_empty() {
            return Err(StreamError::Configuration("sink names must not be empty".into()));
        }
        self.audio_buffer_bytes()?;
        self.video_buffer_bytes()?;
        Ok(())
    }

    pub fn audio_buffer_bytes(&self) -> Result<usize> {
        kb_to_bytes("audio_buffer_kb", self.audio_buffer_kb)
    }

    pub fn video_buffer_bytes(&self) -> Result<usize> {
        kb_to_bytes("video_buffer_kb", self.video_buffer_kb)
    }

    /// Apply one setup-store entry. Key matching is case-insensitive.
    pub fn apply_setup(&mut self, name: &str, value: &str) -> Result<()> {
        let key = SETUP_KEYS
            .iter()
            .find(|k| k.eq_ignore_ascii_case(name))
            .ok_or_else(|| StreamError::UnknownSetupKey(name.to_string()))?;

        match *key {
            "AudioDevice" => self.audio_device = parse_int(name, value)?,
            "VideoDevice" => self.video_device = parse_int(name, value)?,
            "UseHardwareDecoding" => self.use_hardware_decoding = parse_bool(name, value)?,
            "Deinterlace" => self.deinterlace = parse_bool(name, value)?,
            "AudioBufferSize" => self.audio_buffer_kb = parse_size(name, value)?,
            "VideoBufferSize" => self.video_buffer_kb = parse_size(name, value)?,
            "AudioSink" => self.audio_sink = value.trim().to_string(),
            "VideoSink" => self.video_sink = value.trim().to_string(),
            "OsdBlending" => self.osd_blending = parse_bool(name, value)?,
            _ => return Err(StreamError::UnknownSetupKey(name.to_string())),
        }

        tracing::debug!(key = *key, value, "Applied setup entry");
        Ok(())
    }

    /// Current values in setup-store form, in [`SETUP_KEYS`] order.
    pub fn setup_entries(&self) -> Vec<(&'static str, String)> {
        let flag = |b: bool| if b { "1" } else { "0" }.to_string();
        vec![
            ("AudioDevice", self.audio_device.to_string()),
            ("VideoDevice", self.video_device.to_string()),
            ("UseHardwareDecoding", flag(self.use_hardware_decoding)),
            ("Deinterlace", flag(self.deinterlace)),
            ("AudioBufferSize", self.audio_buffer_kb.to_string()),
            ("VideoBufferSize", self.video_buffer_kb.to_string()),
            ("AudioSink", self.audio_sink.clone()),
            ("VideoSink", self.video_sink.clone()),
            ("OsdBlending", flag(self.osd_blending)),
        ]
    }
}

fn kb_to_bytes(name: &str, kb: usize) -> Result<usize> {
    kb.checked_mul(1024).ok_or_else(|| {
        StreamError::Configuration(format!("{name} = {kb} does not fit in memory"))
    })
}

fn parse_int(name: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| StreamError::Configuration(format!("{name}: expected integer, got {value:?}")))
}

fn parse_size(name: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        StreamError::Configuration(format!("{name}: expected non-negative integer, got {value:?}"))
    })
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(StreamError::Configuration(format!(
            "{name}: expected boolean, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OutputConfig::default();
        assert_eq!(config.audio_buffer_bytes().unwrap(), 200 * 1024);
        assert_eq!(config.video_sink, "autovideosink");
        assert!(config.use_hardware_decoding);
        assert!(config.osd_blending);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = OutputConfig::from_toml_str(
            r#"
            audio_buffer_kb = 64
            video_sink = "fakesink"
            osd_destination_alpha = "opaque"
            "#,
        )
        .unwrap();

        assert_eq!(config.audio_buffer_kb, 64);
        assert_eq!(config.video_buffer_kb, 200);
        assert_eq!(config.video_sink, "fakesink");
        assert_eq!(config.osd_destination_alpha, DestinationAlpha::Opaque);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = OutputConfig::from_toml_str("video_buffer_kb = 0").unwrap_err();
        assert!(matches!(err, StreamError::Configuration(_)));
    }

    #[test]
    fn test_oversized_buffer_rejected() {
        let mut config = OutputConfig::default();
        config.audio_buffer_kb = usize::MAX / 512;
        assert!(matches!(
            config.validate(),
            Err(StreamError::Configuration(_))
        ));
        assert!(config.audio_buffer_bytes().is_err());

        config.audio_buffer_kb = 200;
        config.video_buffer_kb = usize::MAX;
        assert!(config.validate().is_err());
        assert!(config.video_buffer_bytes().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = OutputConfig::default();
        config.deinterlace = false;
        config.max_chunk_bytes = 4096;

        let text = config.to_toml_string().unwrap();
        assert_eq!(OutputConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("streamout.toml");
        std::fs::write(&path, "use_hardware_decoding = false\n").unwrap();

        let config = OutputConfig::load(&path).unwrap();
        assert!(!config.use_hardware_decoding);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = OutputConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(StreamError::Configuration(_))));
    }

    #[test]
    fn test_apply_setup_case_insensitive() {
        let mut config = OutputConfig::default();
        config.apply_setup("audiobuffersize", "512").unwrap();
        config.apply_setup("VIDEOSINK", "xvimagesink").unwrap();
        config.apply_setup("UseHardwareDecoding", "0").unwrap();
        config.apply_setup("OsdBlending", "false").unwrap();

        assert_eq!(config.audio_buffer_kb, 512);
        assert_eq!(config.video_sink, "xvimagesink");
        assert!(!config.use_hardware_decoding);
        assert!(!config.osd_blending);
    }

    #[test]
    fn test_apply_setup_errors() {
        let mut config = OutputConfig::default();
        assert!(matches!(
            config.apply_setup("Volume", "3"),
            Err(StreamError::UnknownSetupKey(_))
        ));
        assert!(matches!(
            config.apply_setup("AudioDevice", "left"),
            Err(StreamError::Configuration(_))
        ));
        assert_eq!(config, OutputConfig::default());
    }

    #[test]
    fn test_setup_entries_reapply() {
        let mut source = OutputConfig::default();
        source.video_device = 2;
        source.deinterlace = false;

        let mut target = OutputConfig::default();
        for (key, value) in source.setup_entries() {
            target.apply_setup(key, &value).unwrap();
        }
        assert_eq!(target, source);
    }
}
