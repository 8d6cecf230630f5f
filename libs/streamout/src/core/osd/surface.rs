// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use parking_lot::Mutex;

use super::canvas::{Alignment, Canvas, EllipseShape, Rect, SlopeType};
use super::color::Color;
use super::compositor::{OsdBuffer, OsdCompositor};
use super::font::Font;
use crate::core::Result;

struct SurfaceState {
    canvas: Option<Canvas>,
    dirty: bool,
    /// Bumped on every rendering handed to the compositor.
    generation: u64,
}

/// Drawing surface of the single OSD instance.
///
/// Draw calls only touch the local canvas; [`OsdSurface::flush`] hands a
/// packed-ARGB copy to the compositor. Every draw call before the first
/// [`OsdSurface::set_areas`] is a no-op.
pub struct OsdSurface {
    left: i32,
    top: i32,
    level: u32,
    state: Mutex<SurfaceState>,
    compositor: Arc<OsdCompositor>,
}

impl OsdSurface {
    pub(crate) fn new(left: i32, top: i32, level: u32, compositor: Arc<OsdCompositor>) -> Self {
        Self {
            left,
            top,
            level,
            state: Mutex::new(SurfaceState {
                canvas: None,
                dirty: false,
                generation: 0,
            }),
            compositor,
        }
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Any area layout is accepted; the canvas is always true-color.
    pub fn can_handle_areas(&self, _areas: &[Rect]) -> bool {
        true
    }

    /// Reallocate a cleared canvas covering the bounding box of `areas`.
    /// An empty list keeps the current canvas.
    pub fn set_areas(&self, areas: &[Rect]) -> Result<()> {
        if areas.is_empty() {
            return Ok(());
        }

        let (width, height) = Rect::bounding_size(areas);
        let canvas = Canvas::new(width, height).inspect_err(|e| {
            tracing::error!(width, height, error = %e, "failed to allocate OSD canvas");
        })?;

        let mut state = self.state.lock();
        state.canvas = Some(canvas);
        state.dirty = true;
        tracing::debug!(width, height, areas = areas.len(), "OSD areas set");
        Ok(())
    }

    fn draw(&self, op: impl FnOnce(&mut Canvas)) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if let Some(canvas) = state.canvas.as_mut() {
            op(canvas);
            state.dirty = true;
        }
    }

    pub fn draw_pixel(&self, x: i32, y: i32, color: Color) {
        self.draw(|c| c.draw_pixel(x, y, color));
    }

    pub fn draw_bitmap(
        &self,
        x: i32,
        y: i32,
        bitmap: &Canvas,
        colors: Option<(Color, Color)>,
        overlay: bool,
    ) {
        self.draw(|c| c.draw_bitmap(x, y, bitmap, colors, overlay));
    }

    pub fn draw_text(
        &self,
        x: i32,
        y: i32,
        text: &str,
        fg: Color,
        bg: Color,
        font: &dyn Font,
        width: i32,
        height: i32,
        alignment: Alignment,
    ) {
        self.draw(|c| c.draw_text(x, y, text, fg, bg, font, width, height, alignment));
    }

    pub fn draw_rectangle(&self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        self.draw(|c| c.draw_rectangle(x1, y1, x2, y2, color));
    }

    pub fn draw_ellipse(&self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color, shape: EllipseShape) {
        self.draw(|c| c.draw_ellipse(x1, y1, x2, y2, color, shape));
    }

    pub fn draw_slope(&self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color, slope: SlopeType) {
        self.draw(|c| c.draw_slope(x1, y1, x2, y2, color, slope));
    }

    /// Region stack is not supported.
    pub fn save_region(&self, x1: i32, y1: i32, x2: i32, y2: i32) {
        tracing::trace!(x1, y1, x2, y2, "save_region ignored");
    }

    pub fn restore_region(&self) {
        tracing::trace!("restore_region ignored");
    }

    /// True-color canvas; palettes have no effect.
    pub fn set_palette(&self, _palette: &[Color]) {}

    /// Publish pending changes to the compositor. No-op when clean.
    ///
    /// Rendering happens under the surface lock, publishing after it is
    /// released. Each rendering carries a generation so that a slower
    /// concurrent flush cannot replace a newer image.
    pub fn flush(&self) -> Result<()> {
        let (buffer, generation) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if !state.dirty {
                return Ok(());
            }
            let Some(canvas) = state.canvas.as_ref() else {
                return Ok(());
            };
            if canvas.width() == 0 || canvas.height() == 0 {
                state.dirty = false;
                return Ok(());
            }

            let data = canvas.to_argb_bytes().inspect_err(|e| {
                tracing::error!(error = %e, "failed to render OSD");
            })?;
            let buffer = OsdBuffer::from_parts(data, canvas.width(), canvas.height());
            state.dirty = false;
            state.generation += 1;
            (buffer, state.generation)
        };

        if !self.compositor.publish_rendering(buffer, generation) {
            tracing::trace!(generation, "Newer OSD rendering already published");
        }
        Ok(())
    }

    /// Rendering of unpublished changes, for consumers that pull.
    pub fn snapshot(&self) -> Option<OsdBuffer> {
        let state = self.state.lock();
        if !state.dirty {
            return None;
        }
        let canvas = state.canvas.as_ref()?;
        match canvas.to_argb_bytes() {
            Ok(data) => Some(OsdBuffer::from_parts(data, canvas.width(), canvas.height())),
            Err(e) => {
                tracing::warn!(error = %e, "OSD snapshot failed");
                None
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let state = self.state.lock();
        state.canvas.as_ref().map(|c| (c.width(), c.height()))
    }

    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        let state = self.state.lock();
        state.canvas.as_ref().and_then(|c| c.get_pixel(x, y))
    }
}

impl Drop for OsdSurface {
    fn drop(&mut self) {
        self.compositor.release_surface();
        tracing::info!(left = self.left, top = self.top, "OSD destroyed");
    }
}

impl std::fmt::Debug for OsdSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsdSurface")
            .field("left", &self.left)
            .field("top", &self.top)
            .field("level", &self.level)
            .field("canvas", &self.canvas_size())
            .finish()
    }
}
