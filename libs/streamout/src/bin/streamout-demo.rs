// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Drives the output engine against the in-process channel pipeline:
//! feeds a few packets, draws an OSD, pulls chunks as the pipeline would
//! and blends the OSD onto a synthetic frame.
//!
//! ```bash
//! RUST_LOG=debug streamout-demo --config output.toml --packets 8
//! ```

use std::path::PathBuf;

use clap::Parser;
use streamout::core::osd::{Alignment, BitmapFont, EllipseShape, Glyph, Rect, color};
use streamout::core::pipeline::{ChannelPipelineBuilder, StreamKind};
use streamout::{FrameLayout, OutputConfig, OutputEngine, VideoFrameMut};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "streamout-demo")]
#[command(about = "Feed and overlay demo on the in-process pipeline")]
#[command(version)]
struct Args {
    /// TOML output configuration (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of audio and video packets to feed
    #[arg(long, default_value = "8")]
    packets: usize,

    /// Packet size in bytes
    #[arg(long, default_value = "1316")]
    packet_size: usize,
}

fn demo_font() -> BitmapFont {
    BitmapFont::new(5)
        .with_glyph('O', Glyph::from_pattern(&["###", "#.#", "#.#", "#.#", "###"]))
        .with_glyph('K', Glyph::from_pattern(&["#.#", "##.", "#..", "##.", "#.#"]))
        .with_glyph(' ', Glyph::from_pattern(&["..", "..", "..", "..", ".."]))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => OutputConfig::load(path)?,
        None => OutputConfig::default(),
    };

    let builder = ChannelPipelineBuilder::new();
    let engine = OutputEngine::initialize(&config, &builder)?;
    let audio_tap = builder
        .tap(StreamKind::Audio)
        .ok_or_else(|| anyhow::anyhow!("audio pipeline was not built"))?;
    let video_tap = builder
        .tap(StreamKind::Video)
        .ok_or_else(|| anyhow::anyhow!("video pipeline was not built"))?;

    engine.start()?;

    let osd = engine.create_osd(0, 0, 0)?;
    osd.set_areas(&[Rect::new(0, 0, 32, 16)])?;
    osd.draw_rectangle(0, 0, 31, 15, color::argb(0x80, 0, 0, 0x40));
    osd.draw_ellipse(20, 2, 29, 11, color::RED, EllipseShape::Full);
    osd.draw_text(
        2,
        2,
        "OK",
        color::WHITE,
        color::TRANSPARENT,
        &demo_font(),
        16,
        12,
        Alignment::LEFT | Alignment::BORDER,
    );
    osd.flush()?;

    for i in 0..args.packets {
        let packet = vec![i as u8; args.packet_size];
        if let Err(e) = engine.play_audio(&packet) {
            tracing::warn!(packet = i, "Audio packet rejected: {}", e);
        }
        if let Err(e) = engine.play_video(&packet) {
            tracing::warn!(packet = i, "Video packet rejected: {}", e);
        }
    }
    tracing::info!("{}", engine.statistics());

    let mut pulled = 0usize;
    while let Some(chunk) = audio_tap.request(4096) {
        pulled += chunk.len();
    }
    while let Some(chunk) = video_tap.request(4096) {
        pulled += chunk.len();
    }
    tracing::info!(bytes = pulled, "Drained both feeds");

    let layout = FrameLayout::packed(64, 36);
    let mut pixels = vec![0xFFu8; layout.stride * layout.height as usize];
    let mut frame = VideoFrameMut::new(&mut pixels, layout);
    video_tap.deliver_frame(&mut frame);
    let touched = pixels
        .chunks_exact(4)
        .filter(|px| px[1..] != [0xFF, 0xFF, 0xFF])
        .count();
    tracing::info!(pixels = touched, "OSD blended onto frame");

    tracing::info!("{}", engine.statistics());
    drop(osd);
    engine.stop()?;
    Ok(())
}
