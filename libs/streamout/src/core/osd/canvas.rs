// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! True-color raster canvas behind an OSD surface.
//!
//! All drawing is clipped to the canvas; coordinates outside it are
//! silently ignored. Rectangles are inclusive of both corners.

use bitflags::bitflags;

use super::color::{self, Color, TRANSPARENT};
use super::font::Font;
use crate::core::{Result, StreamError};

/// Divisor of the font height giving the text border inset.
const TEXT_ALIGN_BORDER: i32 = 10;

/// Position and size of one OSD area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Smallest canvas size covering every area, anchored at the origin.
    pub fn bounding_size(areas: &[Rect]) -> (u32, u32) {
        let width = areas.iter().map(Rect::right).max().unwrap_or(0).max(0);
        let height = areas.iter().map(Rect::bottom).max().unwrap_or(0).max(0);
        (width as u32, height as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Top,
    Left,
    Bottom,
}

/// Which part of the ellipse inscribed in a rectangle gets filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EllipseShape {
    #[default]
    Full,
    /// Quarter ellipse whose centre is the opposite corner of the rectangle.
    Quadrant(Quadrant),
    /// The part of the rectangle outside the given quarter ellipse.
    InvertedQuadrant(Quadrant),
    /// Half ellipse whose flat side lies on the opposite edge.
    Half(Side),
}

impl TryFrom<i32> for EllipseShape {
    type Error = StreamError;

    /// Legacy discriminators: 0 full, 1..4 quadrants, -1..-4 inverted
    /// quadrants, 5..8 right/top/left/bottom halves.
    fn try_from(value: i32) -> Result<Self> {
        let quadrant = |n: i32| match n {
            1 => Some(Quadrant::TopRight),
            2 => Some(Quadrant::TopLeft),
            3 => Some(Quadrant::BottomLeft),
            4 => Some(Quadrant::BottomRight),
            _ => None,
        };

        let shape = match value {
            0 => Some(EllipseShape::Full),
            1..=4 => quadrant(value).map(EllipseShape::Quadrant),
            -4..=-1 => quadrant(-value).map(EllipseShape::InvertedQuadrant),
            5 => Some(EllipseShape::Half(Side::Right)),
            6 => Some(EllipseShape::Half(Side::Top)),
            7 => Some(EllipseShape::Half(Side::Left)),
            8 => Some(EllipseShape::Half(Side::Bottom)),
            _ => None,
        };

        shape.ok_or_else(|| StreamError::Configuration(format!("invalid ellipse quadrants {value}")))
    }
}

/// Cosine slope filling one side of a curve across a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlopeType {
    /// Fill above (or, when vertical, left of) the curve.
    pub upper: bool,
    pub falling: bool,
    /// Curve runs top to bottom instead of left to right.
    pub vertical: bool,
}

impl SlopeType {
    /// Legacy bit layout: 1 upper, 2 falling, 4 vertical.
    pub const fn from_bits(bits: i32) -> Self {
        Self {
            upper: bits & 0x01 != 0,
            falling: bits & 0x02 != 0,
            vertical: bits & 0x04 != 0,
        }
    }
}

bitflags! {
    /// Text placement inside a box. No horizontal (vertical) flag means
    /// horizontally (vertically) centred.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Alignment: u32 {
        const LEFT = 0x01;
        const RIGHT = 0x02;
        const TOP = 0x04;
        const BOTTOM = 0x08;
        /// Inset left/right aligned text by a tenth of the font height.
        const BORDER = 0x10;
    }
}

impl Alignment {
    pub const CENTER: Self = Self::empty();
    pub const DEFAULT: Self = Self::from_bits_retain(0x04 | 0x01);
}

#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Fully transparent canvas. Fails cleanly if storage cannot be reserved.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| StreamError::Allocation(format!("{width}x{height} canvas overflows")))?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| StreamError::Allocation(format!("{width}x{height} canvas: {e}")))?;
        pixels.resize(len, TRANSPARENT);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row of the packed ARGB rendering.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub fn clean(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn intersects(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        x1 < self.width as i32 && y1 < self.height as i32 && x2 >= 0 && y2 >= 0
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn draw_rectangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x1 = x1.max(0);
        let y1 = y1.max(0);
        let x2 = x2.min(self.width as i32 - 1);
        let y2 = y2.min(self.height as i32 - 1);
        if x1 > x2 || y1 > y2 {
            return;
        }

        let w = self.width as usize;
        for y in y1 as usize..=y2 as usize {
            self.pixels[y * w + x1 as usize..=y * w + x2 as usize].fill(color);
        }
    }

    /// Fill the rectangle after clamping it to the canvas. Takes `i64` so
    /// callers can pass unclipped shape coordinates.
    fn fill_clipped(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, color: Color) {
        let x1 = x1.max(0);
        let y1 = y1.max(0);
        let x2 = x2.min(self.width as i64 - 1);
        let y2 = y2.min(self.height as i64 - 1);
        if x1 > x2 || y1 > y2 {
            return;
        }
        self.draw_rectangle(x1 as i32, y1 as i32, x2 as i32, y2 as i32, color);
    }

    /// Filled ellipse inscribed in the rectangle, or the part selected by
    /// `shape`, drawn as one horizontal span per canvas row.
    pub fn draw_ellipse(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        shape: EllipseShape,
    ) {
        if x2 < x1 || y2 < y1 || !self.intersects(x1, y1, x2, y2) {
            return;
        }

        let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
        let mid_x = (x1 + x2) / 2;
        let mid_y = (y1 + y2) / 2;
        let (rx, ry, cx, cy) = match shape {
            EllipseShape::Full => ((x2 - x1) / 2, (y2 - y1) / 2, mid_x, mid_y),
            EllipseShape::Quadrant(q) | EllipseShape::InvertedQuadrant(q) => {
                let (cx, cy) = match q {
                    Quadrant::TopRight => (x1, y2),
                    Quadrant::TopLeft => (x2, y2),
                    Quadrant::BottomLeft => (x2, y1),
                    Quadrant::BottomRight => (x1, y1),
                };
                (x2 - x1, y2 - y1, cx, cy)
            }
            EllipseShape::Half(Side::Right) => (x2 - x1, (y2 - y1) / 2, x1, mid_y),
            EllipseShape::Half(Side::Top) => ((x2 - x1) / 2, y2 - y1, mid_x, y2),
            EllipseShape::Half(Side::Left) => (x2 - x1, (y2 - y1) / 2, x2, mid_y),
            EllipseShape::Half(Side::Bottom) => ((x2 - x1) / 2, y2 - y1, mid_x, y1),
        };

        let (above, below) = ellipse_rows(shape);
        let first = (if above { cy - ry } else { cy }).max(0);
        let last = (if below { cy + ry } else { cy }).min(self.height as i64 - 1);

        for row in first..=last {
            let half = ellipse_half_width(rx, ry, (row - cy).abs());
            let (from, to) = ellipse_span(shape, (x1, x2), cx, half);
            self.fill_clipped(from, row, to, row, color);
        }
    }

    pub fn draw_slope(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color, slope: SlopeType) {
        if x2 < x1 || y2 < y1 || !self.intersects(x1, y1, x2, y2) {
            return;
        }

        let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
        let phase = |pos: i64, start: i64, end: i64| {
            let c = ((pos - start) as f64 * std::f64::consts::PI / (end - start + 1) as f64).cos();
            if slope.falling { -c } else { c }
        };

        if slope.vertical {
            let last = y2.min(self.height as i64 - 1);
            for y in y1.max(0)..=last {
                let x = ((x2 - x1 + 1) as f64 * phase(y, y1, y2) / 2.0) as i64;
                let edge = (x1 + x2) / 2 + x;
                if slope.upper != slope.falling {
                    self.fill_clipped(x1, y, edge, y, color);
                } else {
                    self.fill_clipped(edge, y, x2, y, color);
                }
            }
        } else {
            let last = x2.min(self.width as i64 - 1);
            for x in x1.max(0)..=last {
                let y = ((y2 - y1 + 1) as f64 * phase(x, x1, x2) / 2.0) as i64;
                let edge = (y1 + y2) / 2 + y;
                if slope.upper {
                    self.fill_clipped(x, y1, x, edge, color);
                } else {
                    self.fill_clipped(x, edge, x, y2, color);
                }
            }
        }
    }

    /// Copy `bitmap` with its top-left corner at (x, y).
    ///
    /// With `colors = Some((fg, bg))` the source acts as a two-color mask:
    /// opaque pixels become `fg`, transparent ones `bg`. With `overlay`,
    /// transparent source pixels leave the destination untouched.
    pub fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &Canvas,
        colors: Option<(Color, Color)>,
        overlay: bool,
    ) {
        let (w, h) = (bitmap.width as i32, bitmap.height as i32);
        if w <= 0 || h <= 0 || !self.intersects(x, y, x.saturating_add(w - 1), y.saturating_add(h - 1)) {
            return;
        }

        for sy in 0..h {
            for sx in 0..w {
                let source = bitmap.pixels[sy as usize * bitmap.width as usize + sx as usize];
                let transparent = color::alpha(source) == 0;
                if overlay && transparent {
                    continue;
                }
                let pixel = match colors {
                    Some((fg, bg)) => {
                        if transparent {
                            bg
                        } else {
                            fg
                        }
                    }
                    None => source,
                };
                self.draw_pixel(x.saturating_add(sx), y.saturating_add(sy), pixel);
            }
        }
    }

    /// Draw `text` at (x, y), optionally inside a `width` x `height` box
    /// (zero means "size of the text"). Glyphs that would cross the right
    /// edge of the box are not drawn.
    pub fn draw_text(
        &mut self,
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
        let text_width = font.width(text);
        let text_height = font.height();
        let box_width = if width > 0 { width } else { text_width };
        let box_height = if height > 0 { height } else { text_height };
        let right = x.saturating_add(box_width.saturating_sub(1));
        let bottom = y.saturating_add(box_height.saturating_sub(1));
        if !self.intersects(x, y, right, bottom) {
            return;
        }

        if bg != TRANSPARENT {
            self.draw_rectangle(x, y, right, bottom, bg);
        }

        let (mut x, mut y) = (x, y);
        let mut limit = None;
        if width > 0 || height > 0 {
            limit = Some(x.saturating_add(box_width));
            let border = (text_height / TEXT_ALIGN_BORDER).max(1);
            if width > 0 {
                if alignment.contains(Alignment::LEFT) {
                    if alignment.contains(Alignment::BORDER) {
                        x = x.saturating_add(border);
                    }
                } else if alignment.contains(Alignment::RIGHT) {
                    if text_width < width {
                        x = x.saturating_add(width - text_width);
                    }
                    if alignment.contains(Alignment::BORDER) {
                        x = x.saturating_sub(border);
                    }
                } else if text_width < width {
                    x = x.saturating_add((width - text_width) / 2);
                }
            }
            if height > 0 && !alignment.contains(Alignment::TOP) {
                if alignment.contains(Alignment::BOTTOM) {
                    if text_height < height {
                        y = y.saturating_add(height - text_height);
                    }
                } else if text_height < height {
                    y = y.saturating_add((height - text_height) / 2);
                }
            }
        }

        let mut pen = x;
        for ch in text.chars() {
            let Some(glyph) = font.glyph(ch) else {
                continue;
            };
            let advance = glyph.width() as i32;
            let next = pen.saturating_add(advance);
            if limit.is_some_and(|limit| next > limit) {
                break;
            }
            if pen >= self.width as i32 {
                break;
            }
            for row in 0..text_height.max(0) {
                for col in 0..advance {
                    let (px, py) = (pen.saturating_add(col), y.saturating_add(row));
                    if glyph.is_set(col as u32, row as usize) {
                        self.draw_pixel(px, py, fg);
                    } else if bg != TRANSPARENT {
                        self.draw_pixel(px, py, bg);
                    }
                }
            }
            pen = next;
        }
    }

    /// Packed ARGB rendering, `stride = width * 4`, no row padding.
    pub fn to_argb_bytes(&self) -> Result<Vec<u8>> {
        let len = self.pixels.len() * 4;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            StreamError::Allocation(format!("{}x{} ARGB buffer: {e}", self.width, self.height))
        })?;

        for &pixel in &self.pixels {
            data.extend_from_slice(&color::to_argb_bytes(pixel));
        }
        Ok(data)
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Whether a shape extends above and below its centre row.
fn ellipse_rows(shape: EllipseShape) -> (bool, bool) {
    match shape {
        EllipseShape::Full | EllipseShape::Half(Side::Right) | EllipseShape::Half(Side::Left) => {
            (true, true)
        }
        EllipseShape::Quadrant(q) | EllipseShape::InvertedQuadrant(q) => match q {
            Quadrant::TopRight | Quadrant::TopLeft => (true, false),
            Quadrant::BottomLeft | Quadrant::BottomRight => (false, true),
        },
        EllipseShape::Half(Side::Top) => (true, false),
        EllipseShape::Half(Side::Bottom) => (false, true),
    }
}

/// Half-width of the ellipse `dy` rows away from its centre.
fn ellipse_half_width(rx: i64, ry: i64, dy: i64) -> i64 {
    if ry == 0 {
        return rx;
    }
    let t = dy as f64 / ry as f64;
    (rx as f64 * (1.0 - t * t).max(0.0).sqrt()).round() as i64
}

/// Columns `(from, to)` filled on a row whose ellipse half-width is `x`.
fn ellipse_span(shape: EllipseShape, (x1, x2): (i64, i64), cx: i64, x: i64) -> (i64, i64) {
    match shape {
        EllipseShape::Full | EllipseShape::Half(Side::Top) | EllipseShape::Half(Side::Bottom) => {
            (cx - x, cx + x)
        }
        EllipseShape::Quadrant(Quadrant::TopRight | Quadrant::BottomRight)
        | EllipseShape::Half(Side::Right) => (cx, cx + x),
        EllipseShape::Quadrant(Quadrant::TopLeft | Quadrant::BottomLeft)
        | EllipseShape::Half(Side::Left) => (cx - x, cx),
        EllipseShape::InvertedQuadrant(Quadrant::TopRight | Quadrant::BottomRight) => (cx + x, x2),
        EllipseShape::InvertedQuadrant(Quadrant::TopLeft | Quadrant::BottomLeft) => (x1, cx - x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::osd::color::{BLUE, GREEN, RED, WHITE};
    use crate::core::osd::font::{BitmapFont, Glyph};

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(w, h).unwrap()
    }

    fn test_font() -> BitmapFont {
        BitmapFont::new(2)
            .with_glyph('I', Glyph::from_pattern(&["#", "#"]))
            .with_glyph('L', Glyph::from_pattern(&["#.", "##"]))
    }

    #[test]
    fn test_bounding_size() {
        let areas = [Rect::new(0, 0, 10, 20), Rect::new(5, 5, 30, 10)];
        assert_eq!(Rect::bounding_size(&areas), (35, 20));
        assert_eq!(Rect::bounding_size(&[]), (0, 0));
    }

    #[test]
    fn test_new_canvas_is_transparent() {
        let c = canvas(3, 2);
        assert_eq!(c.stride(), 12);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(c.get_pixel(x, y), Some(TRANSPARENT));
            }
        }
        assert_eq!(c.get_pixel(3, 0), None);
        assert_eq!(c.get_pixel(-1, 0), None);
    }

    #[test]
    fn test_huge_canvas_fails_cleanly() {
        assert!(matches!(
            Canvas::new(u32::MAX, u32::MAX),
            Err(StreamError::Allocation(_))
        ));
    }

    #[test]
    fn test_draw_pixel_clipped() {
        let mut c = canvas(2, 2);
        c.draw_pixel(1, 1, RED);
        c.draw_pixel(5, 5, RED);
        c.draw_pixel(-1, 0, RED);
        assert_eq!(c.get_pixel(1, 1), Some(RED));
        assert_eq!(c.pixels.iter().filter(|&&p| p == RED).count(), 1);
    }

    #[test]
    fn test_rectangle_inclusive_and_clipped() {
        let mut c = canvas(4, 4);
        c.draw_rectangle(1, 1, 2, 2, GREEN);
        assert_eq!(c.get_pixel(1, 1), Some(GREEN));
        assert_eq!(c.get_pixel(2, 2), Some(GREEN));
        assert_eq!(c.get_pixel(3, 3), Some(TRANSPARENT));

        c.draw_rectangle(-5, 3, 10, 10, BLUE);
        assert_eq!(c.get_pixel(0, 3), Some(BLUE));
        assert_eq!(c.get_pixel(3, 3), Some(BLUE));

        c.draw_rectangle(3, 0, 1, 0, RED);
        assert_eq!(c.get_pixel(2, 0), Some(TRANSPARENT));
    }

    #[test]
    fn test_full_ellipse() {
        let mut c = canvas(11, 11);
        c.draw_ellipse(0, 0, 10, 10, RED, EllipseShape::Full);
        assert_eq!(c.get_pixel(5, 5), Some(RED));
        assert_eq!(c.get_pixel(5, 0), Some(RED));
        assert_eq!(c.get_pixel(0, 5), Some(RED));
        assert_eq!(c.get_pixel(10, 5), Some(RED));
        assert_eq!(c.get_pixel(5, 10), Some(RED));
        assert_eq!(c.get_pixel(0, 0), Some(TRANSPARENT));
        assert_eq!(c.get_pixel(10, 10), Some(TRANSPARENT));
    }

    #[test]
    fn test_quadrant_and_inverse_are_complementary() {
        let mut quarter = canvas(11, 11);
        quarter.draw_ellipse(0, 0, 10, 10, RED, EllipseShape::Quadrant(Quadrant::TopRight));
        assert_eq!(quarter.get_pixel(1, 9), Some(RED));
        assert_eq!(quarter.get_pixel(10, 0), Some(TRANSPARENT));

        let mut inverse = canvas(11, 11);
        inverse.draw_ellipse(
            0,
            0,
            10,
            10,
            RED,
            EllipseShape::InvertedQuadrant(Quadrant::TopRight),
        );
        assert_eq!(inverse.get_pixel(10, 0), Some(RED));
        assert_eq!(inverse.get_pixel(1, 9), Some(TRANSPARENT));
    }

    #[test]
    fn test_half_ellipse_stays_on_its_side() {
        let mut c = canvas(11, 11);
        c.draw_ellipse(0, 0, 10, 10, RED, EllipseShape::Half(Side::Top));
        assert_eq!(c.get_pixel(5, 10), Some(RED));
        assert_eq!(c.get_pixel(5, 0), Some(RED));
        assert_eq!(c.get_pixel(0, 0), Some(TRANSPARENT));
    }

    #[test]
    fn test_ellipse_legacy_discriminators() {
        assert_eq!(EllipseShape::try_from(0).unwrap(), EllipseShape::Full);
        assert_eq!(
            EllipseShape::try_from(-3).unwrap(),
            EllipseShape::InvertedQuadrant(Quadrant::BottomLeft)
        );
        assert_eq!(EllipseShape::try_from(8).unwrap(), EllipseShape::Half(Side::Bottom));
        assert!(EllipseShape::try_from(9).is_err());
        assert!(EllipseShape::try_from(-5).is_err());
    }

    #[test]
    fn test_rising_slope_fills_below_curve() {
        let mut c = canvas(10, 10);
        c.draw_slope(0, 0, 9, 9, WHITE, SlopeType::from_bits(0));
        assert_eq!(c.get_pixel(9, 0), Some(WHITE));
        assert_eq!(c.get_pixel(0, 9), Some(WHITE));
        assert_eq!(c.get_pixel(0, 0), Some(TRANSPARENT));
    }

    #[test]
    fn test_upper_slope_fills_above_curve() {
        let mut c = canvas(10, 10);
        c.draw_slope(0, 0, 9, 9, WHITE, SlopeType::from_bits(1));
        assert_eq!(c.get_pixel(0, 0), Some(WHITE));
        assert_eq!(c.get_pixel(9, 9), Some(TRANSPARENT));
    }

    #[test]
    fn test_slope_bits() {
        let slope = SlopeType::from_bits(0x06);
        assert!(!slope.upper);
        assert!(slope.falling);
        assert!(slope.vertical);
    }

    #[test]
    fn test_far_off_canvas_coordinates_are_clipped() {
        let mut c = canvas(10, 10);
        c.draw_slope(-2_000_000_000, 0, 2_000_000_000, 9, RED, SlopeType::default());
        c.draw_slope(i32::MIN, i32::MIN, i32::MAX, i32::MAX, RED, SlopeType::from_bits(7));

        c.draw_ellipse(
            -2_000_000_000,
            -2_000_000_000,
            2_000_000_000,
            2_000_000_000,
            BLUE,
            EllipseShape::Full,
        );
        assert_eq!(c.get_pixel(0, 0), Some(BLUE));
        assert_eq!(c.get_pixel(9, 9), Some(BLUE));

        // Quarter centred at (MAX, MIN): its inverse never reaches the canvas
        c.draw_ellipse(
            i32::MIN,
            i32::MIN,
            i32::MAX,
            i32::MAX,
            GREEN,
            EllipseShape::InvertedQuadrant(Quadrant::BottomLeft),
        );
        assert!(c.pixels.iter().all(|&p| p == BLUE));

        c.draw_bitmap(i32::MAX, i32::MAX, &canvas(2, 2), None, false);
        c.draw_text(i32::MAX - 1, 0, "LI", WHITE, RED, &test_font(), 0, 0, Alignment::DEFAULT);
        c.draw_text(-1, i32::MAX, "LI", WHITE, RED, &test_font(), 4, 4, Alignment::CENTER);
        assert!(c.pixels.iter().all(|&p| p == BLUE));
    }

    #[test]
    fn test_draw_bitmap_modes() {
        let mut src = canvas(2, 1);
        src.draw_pixel(0, 0, RED);

        let mut copy = canvas(3, 1);
        copy.clean();
        copy.draw_pixel(2, 0, BLUE);
        copy.draw_bitmap(1, 0, &src, None, false);
        assert_eq!(copy.get_pixel(1, 0), Some(RED));
        assert_eq!(copy.get_pixel(2, 0), Some(TRANSPARENT));

        let mut overlay = canvas(3, 1);
        overlay.draw_pixel(2, 0, BLUE);
        overlay.draw_bitmap(1, 0, &src, None, true);
        assert_eq!(overlay.get_pixel(2, 0), Some(BLUE));

        let mut mask = canvas(2, 1);
        mask.draw_bitmap(0, 0, &src, Some((WHITE, GREEN)), false);
        assert_eq!(mask.get_pixel(0, 0), Some(WHITE));
        assert_eq!(mask.get_pixel(1, 0), Some(GREEN));
    }

    #[test]
    fn test_text_glyph_pixels() {
        let mut c = canvas(4, 2);
        c.draw_text(0, 0, "LI", WHITE, TRANSPARENT, &test_font(), 0, 0, Alignment::DEFAULT);
        // L: "#." / "##", then I: "#" / "#"
        assert_eq!(c.get_pixel(0, 0), Some(WHITE));
        assert_eq!(c.get_pixel(1, 0), Some(TRANSPARENT));
        assert_eq!(c.get_pixel(1, 1), Some(WHITE));
        assert_eq!(c.get_pixel(2, 0), Some(WHITE));
        assert_eq!(c.get_pixel(3, 0), Some(TRANSPARENT));
    }

    #[test]
    fn test_text_background_fills_box() {
        let mut c = canvas(6, 4);
        c.draw_text(0, 0, "I", WHITE, BLUE, &test_font(), 6, 4, Alignment::RIGHT | Alignment::BOTTOM);
        assert_eq!(c.get_pixel(0, 0), Some(BLUE));
        assert_eq!(c.get_pixel(5, 3), Some(WHITE));
        assert_eq!(c.get_pixel(5, 2), Some(WHITE));
        assert_eq!(c.get_pixel(5, 1), Some(BLUE));
    }

    #[test]
    fn test_text_centered() {
        let mut c = canvas(5, 4);
        c.draw_text(0, 0, "I", WHITE, TRANSPARENT, &test_font(), 5, 4, Alignment::CENTER);
        assert_eq!(c.get_pixel(2, 1), Some(WHITE));
        assert_eq!(c.get_pixel(2, 2), Some(WHITE));
        assert_eq!(c.get_pixel(2, 0), Some(TRANSPARENT));
    }

    #[test]
    fn test_text_never_draws_partial_glyph() {
        let mut c = canvas(8, 2);
        c.draw_text(0, 0, "LLL", WHITE, TRANSPARENT, &test_font(), 5, 0, Alignment::LEFT);
        assert_eq!(c.get_pixel(2, 0), Some(WHITE));
        assert_eq!(c.get_pixel(4, 0), Some(TRANSPARENT));
        assert_eq!(c.get_pixel(4, 1), Some(TRANSPARENT));
    }

    #[test]
    fn test_argb_bytes() {
        let mut c = canvas(2, 1);
        c.draw_pixel(1, 0, color::argb(0x80, 1, 2, 3));
        assert_eq!(c.to_argb_bytes().unwrap(), vec![0, 0, 0, 0, 0x80, 1, 2, 3]);
    }
}
