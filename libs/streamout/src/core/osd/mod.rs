// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! On-screen display: a true-color drawing surface and the compositor
//! that blends its published rendering onto video frames.

mod canvas;
pub mod color;
mod compositor;
mod font;
mod surface;

pub use canvas::{Alignment, Canvas, EllipseShape, Quadrant, Rect, Side, SlopeType};
pub use color::Color;
pub use compositor::{DestinationAlpha, OsdBuffer, OsdCompositor, blend_channel};
pub use font::{BitmapFont, Font, Glyph, MAX_GLYPH_WIDTH};
pub use surface::OsdSurface;
