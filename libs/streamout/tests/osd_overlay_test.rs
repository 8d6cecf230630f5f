// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! OSD drawing, publishing and blending onto frames delivered by the
//! video pipeline.

use std::sync::Arc;
use std::thread;

use streamout::core::osd::{DestinationAlpha, EllipseShape, Rect, color};
use streamout::core::pipeline::{ChannelPipelineBuilder, StreamKind};
use streamout::{FrameLayout, OsdCompositor, OutputConfig, OutputEngine, StreamError, VideoFrameMut};

fn gray_frame(width: u32, height: u32) -> Vec<u8> {
    [0xFFu8, 100, 100, 100].repeat((width * height) as usize)
}

#[test]
fn test_engine_blends_osd_onto_delivered_frames() {
    let builder = ChannelPipelineBuilder::new();
    let engine = OutputEngine::initialize(&OutputConfig::default(), &builder).unwrap();
    let video = builder.tap(StreamKind::Video).unwrap();

    let osd = engine.create_osd(0, 0, 0).unwrap();
    osd.set_areas(&[Rect::new(0, 0, 2, 1)]).unwrap();
    osd.draw_pixel(0, 0, color::argb(0xFF, 200, 0, 50));
    osd.draw_pixel(1, 0, color::argb(0x80, 200, 0, 50));
    osd.flush().unwrap();

    let mut pixels = gray_frame(3, 1);
    let mut frame = VideoFrameMut::new(&mut pixels, FrameLayout::packed(3, 1));
    assert!(video.deliver_frame(&mut frame));

    assert_eq!(&pixels[0..4], &[0xFF, 200, 0, 50]);
    // (200*128 + 100*127)/255 = 150, (0 + 100*127)/255 = 49, (50*128 + 100*127)/255 = 74
    assert_eq!(&pixels[4..8], &[0xFF, 150, 49, 74]);
    assert_eq!(&pixels[8..12], &[0xFF, 100, 100, 100]);
}

#[test]
fn test_blending_disabled_leaves_frames_alone() {
    let builder = ChannelPipelineBuilder::new();
    let config = OutputConfig {
        osd_blending: false,
        ..OutputConfig::default()
    };
    let engine = OutputEngine::initialize(&config, &builder).unwrap();
    let video = builder.tap(StreamKind::Video).unwrap();

    let osd = engine.create_osd(0, 0, 0).unwrap();
    osd.set_areas(&[Rect::new(0, 0, 1, 1)]).unwrap();
    osd.draw_pixel(0, 0, color::WHITE);
    osd.flush().unwrap();

    let mut pixels = gray_frame(1, 1);
    let mut frame = VideoFrameMut::new(&mut pixels, FrameLayout::packed(1, 1));
    assert!(!video.deliver_frame(&mut frame));
    assert_eq!(pixels, gray_frame(1, 1));
}

#[test]
fn test_destroying_osd_stops_blending() {
    let builder = ChannelPipelineBuilder::new();
    let engine = OutputEngine::initialize(&OutputConfig::default(), &builder).unwrap();
    let video = builder.tap(StreamKind::Video).unwrap();

    let osd = engine.create_osd(0, 0, 0).unwrap();
    assert!(matches!(
        engine.create_osd(0, 0, 1),
        Err(StreamError::OsdAlreadyExists)
    ));
    osd.set_areas(&[Rect::new(0, 0, 4, 4)]).unwrap();
    osd.draw_ellipse(0, 0, 3, 3, color::RED, EllipseShape::Full);
    osd.flush().unwrap();
    assert!(engine.compositor().is_active());

    drop(osd);
    assert!(!engine.compositor().is_active());

    let mut pixels = gray_frame(4, 4);
    let mut frame = VideoFrameMut::new(&mut pixels, FrameLayout::packed(4, 4));
    video.deliver_frame(&mut frame);
    assert_eq!(pixels, gray_frame(4, 4));

    let _again = engine.create_osd(0, 0, 0).unwrap();
    assert!(!engine.compositor().is_active());
}

#[test]
fn test_flat_fallback_on_unstructured_frame() {
    let compositor = Arc::new(OsdCompositor::new(DestinationAlpha::Opaque));
    let osd = compositor.create_osd(0, 0, 0).unwrap();
    osd.set_areas(&[Rect::new(0, 0, 2, 2)]).unwrap();
    osd.draw_rectangle(0, 0, 1, 1, color::BLUE);
    osd.flush().unwrap();

    let mut pixels = vec![0u8; 3 * 4];
    let mut frame = VideoFrameMut::unstructured(&mut pixels);
    assert_eq!(compositor.apply_overlay(&mut frame), 3);
    assert_eq!(pixels, [0xFFu8, 0, 0, 0xFF].repeat(3));
}

#[test]
fn test_overlay_never_sees_partial_buffer() {
    let compositor = Arc::new(OsdCompositor::new(DestinationAlpha::Preserve));
    let osd = Arc::new(compositor.create_osd(0, 0, 0).unwrap());
    osd.set_areas(&[Rect::new(0, 0, 64, 64)]).unwrap();

    const ROUNDS: u8 = 100;
    let drawer = {
        let osd = Arc::clone(&osd);
        thread::spawn(move || {
            for i in 1..=ROUNDS {
                osd.draw_rectangle(0, 0, 63, 63, color::argb(0xFF, i, i, i));
                osd.flush().unwrap();
            }
        })
    };

    for _ in 0..200 {
        let mut pixels = vec![0u8; 64 * 64 * 4];
        let mut frame = VideoFrameMut::new(&mut pixels, FrameLayout::packed(64, 64));
        if compositor.apply_overlay(&mut frame) == 0 {
            continue;
        }
        let first = pixels[1];
        assert!(pixels.chunks_exact(4).all(|px| px[1..] == [first, first, first]));
    }
    drawer.join().unwrap();
}
