//! 2-bit grayscale glyph compositing
//!
//! Glyphs are antialiased masks with four coverage levels packed four
//! pixels per byte, LSB pair first, rows contiguous:
//!
//! ```text
//!  byte n:  [p3 p3 | p2 p2 | p1 p1 | p0 p0]   (pixel 4n+i at bits 2i..2i+1)
//! ```
//!
//! | level | result                       |
//! |-------|------------------------------|
//! | 0     | target untouched             |
//! | 1     | dst/2 + fg/2                 |
//! | 2     | dst/4 + 3*(fg/4)             |
//! | 3     | fg                           |
//!
//! Placement is clipped against all four target edges; offsets may be
//! negative.

use crate::color::{pack, pack_dithered, unpack, Color, Rgb};
use crate::dither::DitherTable;

/// 2bpp glyph mask
#[derive(Debug, Clone, Copy)]
pub struct Gray2Bitmap<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Gray2Bitmap<'a> {
    pub const fn new(data: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Coverage level of the pixel at linear index `pos`
    ///
    /// Pixels beyond the end of `data` read as transparent.
    pub fn level(&self, pos: usize) -> u8 {
        match self.data.get(pos >> 2) {
            Some(byte) => (byte >> ((pos & 3) << 1)) & 0x03,
            None => 0,
        }
    }
}

/// Blend one channel for a coverage level
fn blend(level: u8, dst: u8, fg: u8) -> u8 {
    match level {
        1 => (dst >> 1) + (fg >> 1),
        2 => (dst >> 2) + 3 * (fg >> 2),
        _ => fg,
    }
}

/// Composite `src` onto `target` at `(x, y)` with exact RGB565 packing
pub fn composite_gray2(
    src: &Gray2Bitmap<'_>,
    target: &mut [Color],
    target_w: usize,
    target_h: usize,
    fg: Rgb,
    x: i32,
    y: i32,
) {
    composite_with(src, target, target_w, target_h, fg, x, y, |r, g, b, _, _| {
        pack(r, g, b)
    });
}

/// Composite `src` onto `target` at `(x, y)`, dithering keyed by target
/// coordinates
#[allow(clippy::too_many_arguments)]
pub fn composite_gray2_dithered(
    src: &Gray2Bitmap<'_>,
    target: &mut [Color],
    target_w: usize,
    target_h: usize,
    fg: Rgb,
    x: i32,
    y: i32,
    table: &DitherTable,
) {
    composite_with(src, target, target_w, target_h, fg, x, y, |r, g, b, tx, ty| {
        pack_dithered(table, r, g, b, tx, ty)
    });
}

#[allow(clippy::too_many_arguments)]
fn composite_with<F>(
    src: &Gray2Bitmap<'_>,
    target: &mut [Color],
    target_w: usize,
    target_h: usize,
    fg: Rgb,
    x: i32,
    y: i32,
    quantize: F,
) where
    F: Fn(u8, u8, u8, usize, usize) -> Color,
{
    let (sw, sh) = (src.width as i64, src.height as i64);
    let (tw, th) = (target_w as i64, target_h as i64);
    let (x, y) = (x as i64, y as i64);

    // Entirely outside
    if sw == 0 || sh == 0 || x >= tw || y >= th || x + sw <= 0 || y + sh <= 0 {
        return;
    }

    // Visible rectangle in target coordinates
    let tx0 = x.max(0);
    let ty0 = y.max(0);
    let tx1 = (x + sw).min(tw);
    let ty1 = (y + sh).min(th);

    for ty in ty0..ty1 {
        let sy = ty - y;
        for tx in tx0..tx1 {
            let sx = tx - x;
            let level = src.level((sy * sw + sx) as usize);
            if level == 0 {
                continue;
            }

            let (tx, ty) = (tx as usize, ty as usize);
            let Some(dst) = target.get_mut(ty * target_w + tx) else {
                return;
            };

            *dst = if level == 3 {
                quantize(fg.r, fg.g, fg.b, tx, ty)
            } else {
                let (dr, dg, db) = unpack(*dst);
                quantize(
                    blend(level, dr, fg.r),
                    blend(level, dg, fg.g),
                    blend(level, db, fg.b),
                    tx,
                    ty,
                )
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TW: usize = 8;
    const TH: usize = 6;
    const BG: Color = 0x1234;

    /// 4x2 glyph: row 0 = levels 0,1,2,3; row 1 = all 3
    const GLYPH: [u8; 2] = [0b11_10_01_00, 0b11_11_11_11];

    fn target() -> [Color; TW * TH] {
        [BG; TW * TH]
    }

    fn glyph() -> Gray2Bitmap<'static> {
        Gray2Bitmap::new(&GLYPH, 4, 2)
    }

    #[test]
    fn test_levels_decode() {
        let g = glyph();
        assert_eq!([g.level(0), g.level(1), g.level(2), g.level(3)], [0, 1, 2, 3]);
        assert_eq!(g.level(4), 3);
        // past the end of the data is transparent
        assert_eq!(g.level(100), 0);
    }

    #[test]
    fn test_interior_blend_levels() {
        let mut t = target();
        let fg = Rgb::new(0xF8, 0xFC, 0xF8);
        composite_gray2(&glyph(), &mut t, TW, TH, fg, 2, 1);

        let (dr, dg, db) = unpack(BG);
        // level 0 untouched
        assert_eq!(t[TW + 2], BG);
        // level 1
        assert_eq!(
            t[TW + 3],
            pack((dr >> 1) + (fg.r >> 1), (dg >> 1) + (fg.g >> 1), (db >> 1) + (fg.b >> 1))
        );
        // level 2
        assert_eq!(
            t[TW + 4],
            pack(
                (dr >> 2) + 3 * (fg.r >> 2),
                (dg >> 2) + 3 * (fg.g >> 2),
                (db >> 2) + 3 * (fg.b >> 2)
            )
        );
        // level 3 is the exact packed foreground
        assert_eq!(t[TW + 5], fg.to_color());
        assert_eq!(&t[2 * TW + 2..2 * TW + 6], &[fg.to_color(); 4]);
        // nothing outside the glyph rectangle changed
        assert!(t[..TW].iter().all(|&c| c == BG));
        assert!(t[3 * TW..].iter().all(|&c| c == BG));
    }

    #[test]
    fn test_all_transparent_is_noop() {
        let mut t = target();
        let clear = [0u8; 4];
        composite_gray2(&Gray2Bitmap::new(&clear, 4, 4), &mut t, TW, TH, Rgb::WHITE, 1, 1);
        assert_eq!(t, target());
    }

    #[test]
    fn test_fully_outside_is_noop() {
        let mut t = target();
        for (x, y) in [(-4, 0), (0, -2), (TW as i32, 0), (0, TH as i32), (-10, -10), (100, 3)] {
            composite_gray2(&glyph(), &mut t, TW, TH, Rgb::WHITE, x, y);
        }
        assert_eq!(t, target());
    }

    #[test]
    fn test_clip_negative_offsets() {
        let mut t = target();
        // shifted up one row and left two columns: only row 1, columns 2..4 visible
        composite_gray2(&glyph(), &mut t, TW, TH, Rgb::WHITE, -2, -1);
        assert_eq!(&t[0..2], &[0xFFFF, 0xFFFF]);
        assert!(t[2..].iter().all(|&c| c == BG));
    }

    #[test]
    fn test_clip_right_and_bottom_edges() {
        let mut t = target();
        // columns 6,7 visible (levels 0,1 on row 0), row 5 only
        composite_gray2(&glyph(), &mut t, TW, TH, Rgb::WHITE, 6, 5);
        let row = &t[5 * TW..];
        assert_eq!(row[6], BG);
        assert_ne!(row[7], BG);
        assert!(t[..5 * TW].iter().all(|&c| c == BG));
        assert!(row[..6].iter().all(|&c| c == BG));
    }

    #[test]
    fn test_dithered_zero_table_matches_plain() {
        let mut plain = target();
        let mut dithered = target();
        let fg = Rgb::new(0x37, 0x99, 0xC1);
        composite_gray2(&glyph(), &mut plain, TW, TH, fg, 1, 2);
        composite_gray2_dithered(&glyph(), &mut dithered, TW, TH, fg, 1, 2, &DitherTable::zeroed());
        assert_eq!(plain, dithered);
    }

    #[test]
    fn test_dithered_never_darker() {
        let mut plain = target();
        let mut dithered = target();
        let fg = Rgb::new(0x37, 0x99, 0xC1);
        let table = DitherTable::from_seed(9);
        composite_gray2(&glyph(), &mut plain, TW, TH, fg, 0, 0);
        composite_gray2_dithered(&glyph(), &mut dithered, TW, TH, fg, 0, 0, &table);
        for (p, d) in plain.iter().zip(dithered.iter()) {
            let (pr, pg, pb) = unpack(*p);
            let (dr, dg, db) = unpack(*d);
            assert!(dr >= pr && dg >= pg && db >= pb);
        }
    }
}
