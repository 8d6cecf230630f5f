// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

/// Packed ARGB: alpha, red, green, blue.
pub const BYTES_PER_PIXEL: usize = 4;

/// Geometry of a delivered frame's pixel memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, at least `width * 4`.
    pub stride: usize,
}

impl FrameLayout {
    /// Tightly packed layout (`stride = width * 4`).
    pub fn packed(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stride: width as usize * BYTES_PER_PIXEL,
        }
    }
}

/// Write access to one video frame handed out by the pipeline for overlay.
///
/// The layout is optional because some delivery paths only expose the
/// mapped bytes; overlay then falls back to treating the frame as a flat
/// pixel array.
pub struct VideoFrameMut<'a> {
    data: &'a mut [u8],
    layout: Option<FrameLayout>,
}

impl<'a> VideoFrameMut<'a> {
    pub fn new(data: &'a mut [u8], layout: FrameLayout) -> Self {
        Self {
            data,
            layout: Some(layout),
        }
    }

    /// Frame with unknown geometry.
    pub fn unstructured(data: &'a mut [u8]) -> Self {
        Self { data, layout: None }
    }

    pub fn layout(&self) -> Option<FrameLayout> {
        self.layout
    }

    pub fn data(&self) -> &[u8] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for VideoFrameMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFrameMut")
            .field("len", &self.data.len())
            .field("layout", &self.layout)
            .finish()
    }
}
