//! RGB565 color packing
//!
//! Packing truncates (no rounding): 5 bits of red, 6 of green, 5 of blue.
//! Red sits in the high bits, matching the controller's RGB order with
//! the BGR bit of the address mode cleared.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dither::DitherTable;

/// Packed 16-bit RGB565 pixel
pub type Color = u16;

const RED_SHIFT: u16 = 11;
const GREEN_SHIFT: u16 = 5;
const RED_MASK: u16 = 0x1F;
const GREEN_MASK: u16 = 0x3F;
const BLUE_MASK: u16 = 0x1F;

/// Channels at or above these values get no dither noise
const RED_CLAMP: u8 = 249;
const GREEN_CLAMP: u8 = 253;
const BLUE_CLAMP: u8 = 249;

/// 8-bit-per-channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Expand a packed pixel
    pub const fn from_color(color: Color) -> Self {
        let (r, g, b) = unpack(color);
        Self { r, g, b }
    }

    /// Pack to RGB565
    pub const fn to_color(self) -> Color {
        pack(self.r, self.g, self.b)
    }
}

/// Pack 8-bit channels into RGB565 by truncation
pub const fn pack(r: u8, g: u8, b: u8) -> Color {
    ((r as u16 >> 3) << RED_SHIFT) | ((g as u16 >> 2) << GREEN_SHIFT) | (b as u16 >> 3)
}

/// Expand RGB565 back to 8-bit channels; the dropped low bits read as zero
pub const fn unpack(color: Color) -> (u8, u8, u8) {
    let r = ((color >> RED_SHIFT) & RED_MASK) as u8;
    let g = ((color >> GREEN_SHIFT) & GREEN_MASK) as u8;
    let b = (color & BLUE_MASK) as u8;
    (r << 3, g << 2, b << 3)
}

/// Pack with position-keyed noise added below the truncation point
///
/// Noise is only added to a channel far enough from saturation that the
/// sum cannot overflow.
pub fn pack_dithered(table: &DitherTable, r: u8, g: u8, b: u8, x: usize, y: usize) -> Color {
    let noise = table.noise(x, y);
    let r = if r < RED_CLAMP { r + noise.r } else { r };
    let g = if g < GREEN_CLAMP { g + noise.g } else { g };
    let b = if b < BLUE_CLAMP { b + noise.b } else { b };
    pack(r, g, b)
}
