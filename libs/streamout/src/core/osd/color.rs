// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! 32-bit ARGB colors (alpha in the high byte).

pub type Color = u32;

pub const TRANSPARENT: Color = 0x0000_0000;
pub const BLACK: Color = 0xFF00_0000;
pub const WHITE: Color = 0xFFFF_FFFF;
pub const RED: Color = 0xFFFF_0000;
pub const GREEN: Color = 0xFF00_FF00;
pub const BLUE: Color = 0xFF00_00FF;

#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Color {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn alpha(color: Color) -> u8 {
    (color >> 24) as u8
}

/// Packed byte order: alpha, red, green, blue.
#[inline]
pub const fn to_argb_bytes(color: Color) -> [u8; 4] {
    color.to_be_bytes()
}
