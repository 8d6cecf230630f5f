// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::HashMap;

/// Maximum glyph width; each row is one `u64` bit mask.
pub const MAX_GLYPH_WIDTH: u32 = 64;

/// One-bit glyph. Bit `width - 1 - col` of a row is set where ink is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    width: u32,
    rows: Vec<u64>,
}

impl Glyph {
    pub fn new(width: u32, rows: Vec<u64>) -> Self {
        Self {
            width: width.min(MAX_GLYPH_WIDTH),
            rows,
        }
    }

    /// Build from text rows where `#` marks ink, e.g. `["#.#", ".#."]`.
    pub fn from_pattern(pattern: &[&str]) -> Self {
        let width = pattern
            .iter()
            .map(|row| row.chars().count() as u32)
            .max()
            .unwrap_or(0)
            .min(MAX_GLYPH_WIDTH);

        let rows = pattern
            .iter()
            .map(|row| {
                row.chars()
                    .take(width as usize)
                    .enumerate()
                    .filter(|(_, c)| *c == '#')
                    .fold(0u64, |bits, (col, _)| bits | (1 << (width as usize - 1 - col)))
            })
            .collect();

        Self { width, rows }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_set(&self, col: u32, row: usize) -> bool {
        if col >= self.width {
            return false;
        }
        let bits = self.rows.get(row).copied().unwrap_or(0);
        bits & (1 << (self.width - 1 - col)) != 0
    }
}

/// Glyph provider used by text drawing.
pub trait Font: Send + Sync {
    /// Line height in pixels.
    fn height(&self) -> i32;

    fn glyph(&self, ch: char) -> Option<&Glyph>;

    /// Advance of `text` in pixels; characters without a glyph take no space.
    fn width(&self, text: &str) -> i32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|g| g.width() as i32)
            .sum()
    }
}

/// Fixed-height font backed by a glyph table.
#[derive(Debug, Clone, Default)]
pub struct BitmapFont {
    height: i32,
    glyphs: HashMap<char, Glyph>,
    fallback: Option<char>,
}

impl BitmapFont {
    pub fn new(height: i32) -> Self {
        Self {
            height: height.max(0),
            ..Default::default()
        }
    }

    pub fn with_glyph(mut self, ch: char, glyph: Glyph) -> Self {
        self.glyphs.insert(ch, glyph);
        self
    }

    /// Glyph drawn for characters missing from the table.
    pub fn with_fallback(mut self, ch: char) -> Self {
        self.fallback = Some(ch);
        self
    }
}

impl Font for BitmapFont {
    fn height(&self) -> i32 {
        self.height
    }

    fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.fallback.and_then(|f| self.glyphs.get(&f)))
    }
}
