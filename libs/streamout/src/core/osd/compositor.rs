// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Holds the one published OSD buffer and blends it onto video frames.
//!
//! Publishing runs on the application thread, overlay on the pipeline's
//! frame-delivery thread. Both go through the same lock, and the new
//! buffer is copied before the lock is taken, so an overlay only ever
//! sees a complete buffer.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::surface::OsdSurface;
use crate::core::frames::{BYTES_PER_PIXEL, VideoFrameMut};
use crate::core::pipeline::FrameHookFn;
use crate::core::{Result, StreamError};

/// What the overlay writes into the destination frame's alpha byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationAlpha {
    /// Leave the frame's alpha untouched.
    #[default]
    Preserve,
    /// Force blended pixels fully opaque.
    Opaque,
    /// Keep the larger of frame and OSD alpha.
    Max,
}

/// Packed ARGB pixels of one published OSD.
#[derive(Clone, PartialEq, Eq)]
pub struct OsdBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
}

impl OsdBuffer {
    pub(crate) fn from_parts(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            stride: width as usize * BYTES_PER_PIXEL,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `[a, r, g, b]` at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        let px = self.data.get(offset..offset + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl std::fmt::Debug for OsdBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsdBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}

#[derive(Default)]
struct CompositorState {
    buffer: Option<OsdBuffer>,
    surface_open: bool,
    /// Generation of the newest surface rendering installed so far.
    surface_generation: u64,
}

pub struct OsdCompositor {
    state: Mutex<CompositorState>,
    destination_alpha: DestinationAlpha,
}

impl OsdCompositor {
    pub fn new(destination_alpha: DestinationAlpha) -> Self {
        Self {
            state: Mutex::new(CompositorState::default()),
            destination_alpha,
        }
    }

    pub fn destination_alpha(&self) -> DestinationAlpha {
        self.destination_alpha
    }

    /// Create the single OSD surface. Fails while another one is alive.
    pub fn create_osd(self: &Arc<Self>, left: i32, top: i32, level: u32) -> Result<OsdSurface> {
        {
            let mut state = self.state.lock();
            if state.surface_open {
                tracing::error!(left, top, level, "OSD already exists");
                return Err(StreamError::OsdAlreadyExists);
            }
            state.surface_open = true;
        }

        tracing::info!(left, top, level, "OSD created");
        Ok(OsdSurface::new(left, top, level, Arc::clone(self)))
    }

    /// Surface going away: forget it and drop whatever it published.
    pub(crate) fn release_surface(&self) {
        let mut state = self.state.lock();
        state.surface_open = false;
        state.buffer = None;
        state.surface_generation = 0;
        tracing::debug!("OSD released");
    }

    pub fn has_osd(&self) -> bool {
        self.state.lock().surface_open
    }

    /// Replace the published buffer with a copy of `data`.
    ///
    /// On any failure the previously published buffer stays active.
    pub fn publish_buffer(&self, data: &[u8], width: u32, height: u32, stride: usize) -> Result<()> {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        if width == 0 || height == 0 {
            return Err(StreamError::InvalidBuffer(format!("empty {width}x{height} OSD")));
        }
        if stride != row_bytes {
            return Err(StreamError::InvalidBuffer(format!(
                "stride {stride} does not match width {width}"
            )));
        }
        let len = row_bytes
            .checked_mul(height as usize)
            .ok_or_else(|| StreamError::InvalidBuffer(format!("{width}x{height} OSD overflows")))?;
        if data.len() < len {
            return Err(StreamError::InvalidBuffer(format!(
                "{} bytes for {width}x{height} OSD, expected {len}",
                data.len()
            )));
        }

        let mut copy = Vec::new();
        if let Err(e) = copy.try_reserve_exact(len) {
            tracing::error!(width, height, error = %e, "failed to allocate OSD buffer");
            return Err(StreamError::Allocation(format!("{width}x{height} OSD buffer: {e}")));
        }
        copy.extend_from_slice(&data[..len]);

        self.state.lock().buffer = Some(OsdBuffer {
            data: copy,
            width,
            height,
            stride,
        });
        tracing::debug!(width, height, "OSD buffer updated");
        Ok(())
    }

    /// Install a rendering of the open surface. Renderings older than the
    /// one already installed are dropped, so concurrent flushes can never
    /// leave a stale image active. Returns whether `buffer` was installed.
    pub(crate) fn publish_rendering(&self, buffer: OsdBuffer, generation: u64) -> bool {
        let (width, height) = (buffer.width, buffer.height);
        {
            let mut state = self.state.lock();
            if generation <= state.surface_generation {
                return false;
            }
            state.surface_generation = generation;
            state.buffer = Some(buffer);
        }
        tracing::debug!(width, height, generation, "OSD buffer updated");
        true
    }

    pub fn clear(&self) {
        self.state.lock().buffer = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().buffer.is_some()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.state
            .lock()
            .buffer
            .as_ref()
            .map(|b| (b.width, b.height))
    }

    /// Copy of the active buffer.
    pub fn current_buffer(&self) -> Option<OsdBuffer> {
        self.state.lock().buffer.clone()
    }

    /// Blend the active OSD onto `frame` in place. Returns the number of
    /// frame pixels written.
    pub fn apply_overlay(&self, frame: &mut VideoFrameMut<'_>) -> usize {
        let state = self.state.lock();
        let Some(osd) = state.buffer.as_ref() else {
            return 0;
        };

        match frame.layout() {
            Some(layout) => {
                let width = osd.width.min(layout.width) as usize;
                let height = osd.height.min(layout.height) as usize;
                let row_bytes = width * BYTES_PER_PIXEL;
                let data = frame.data_mut();
                let mut blended = 0;

                for y in 0..height {
                    let dst_start = y * layout.stride;
                    let Some(dst) = data.get_mut(dst_start..dst_start + row_bytes) else {
                        break;
                    };
                    let src_start = y * osd.stride;
                    let src = &osd.data[src_start..src_start + row_bytes];
                    blended += blend_row(dst, src, self.destination_alpha);
                }
                blended
            }
            None => {
                let pixels = osd.data.len().min(frame.len()) / BYTES_PER_PIXEL;
                let bytes = pixels * BYTES_PER_PIXEL;
                blend_row(
                    &mut frame.data_mut()[..bytes],
                    &osd.data[..bytes],
                    self.destination_alpha,
                )
            }
        }
    }

    /// Overlay as a pipeline frame hook.
    pub fn frame_hook(self: &Arc<Self>) -> FrameHookFn {
        let compositor = Arc::clone(self);
        Arc::new(move |frame: &mut VideoFrameMut<'_>| {
            compositor.apply_overlay(frame);
        })
    }
}

fn blend_row(dst: &mut [u8], src: &[u8], destination_alpha: DestinationAlpha) -> usize {
    let mut blended = 0;
    for (d, s) in dst
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(src.chunks_exact(BYTES_PER_PIXEL))
    {
        let alpha = s[0];
        if alpha == 0 {
            continue;
        }
        d[1] = blend_channel(s[1], d[1], alpha);
        d[2] = blend_channel(s[2], d[2], alpha);
        d[3] = blend_channel(s[3], d[3], alpha);
        match destination_alpha {
            DestinationAlpha::Preserve => {}
            DestinationAlpha::Opaque => d[0] = 0xFF,
            DestinationAlpha::Max => d[0] = d[0].max(alpha),
        }
        blended += 1;
    }
    blended
}

/// `osd * a/255 + frame * (1 - a/255)`, truncated.
#[inline]
pub fn blend_channel(osd: u8, frame: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((osd as u32 * a + frame as u32 * (255 - a)) / 255) as u8
}
