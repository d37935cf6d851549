//! Ordered-dither noise table
//!
//! 256 pseudorandom 16-bit words indexed by pixel position. The row stride
//! of 264 (not a multiple of 256) shifts the pattern by 8 entries per row so
//! vertically adjacent pixels see different noise.
//!
//! Only the low byte of each word is used:
//!
//! ```text
//!  bit  7 6 5 | 4 3 | 2 1 0
//!       blue  | grn | red
//! ```

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of noise entries
pub const DITHER_TABLE_LEN: usize = 256;

/// Virtual row stride used for indexing
pub const DITHER_ROW_STRIDE: usize = 264;

/// Per-channel noise for one pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Noise {
    /// 0..=7
    pub r: u8,
    /// 0..=3
    pub g: u8,
    /// 0..=7
    pub b: u8,
}

/// Table of dither noise
///
/// Owned by whoever composes pixels and passed by reference; regenerate it
/// with [`DitherTable::reseed`] at any time.
#[derive(Clone)]
pub struct DitherTable {
    words: [u16; DITHER_TABLE_LEN],
}

impl DitherTable {
    /// Table with all noise zero (dithering disabled)
    pub const fn zeroed() -> Self {
        Self {
            words: [0; DITHER_TABLE_LEN],
        }
    }

    /// Deterministic table from a seed
    pub fn from_seed(seed: u64) -> Self {
        let mut table = Self::zeroed();
        table.reseed(seed);
        table
    }

    /// Regenerate from a seed
    pub fn reseed(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.randomize(&mut rng);
    }

    /// Regenerate from any random source
    pub fn randomize<R: RngCore>(&mut self, rng: &mut R) {
        for word in self.words.iter_mut() {
            *word = (rng.next_u32() & 0xFFFF) as u16;
        }
    }

    /// Table index for a pixel position
    pub const fn index(x: usize, y: usize) -> usize {
        (y.wrapping_mul(DITHER_ROW_STRIDE).wrapping_add(x)) % DITHER_TABLE_LEN
    }

    /// Raw noise word for a pixel position
    pub fn word(&self, x: usize, y: usize) -> u16 {
        self.words[Self::index(x, y)]
    }

    /// Per-channel noise for a pixel position
    pub fn noise(&self, x: usize, y: usize) -> Noise {
        let word = self.word(x, y);
        Noise {
            r: (word & 0x07) as u8,
            g: ((word >> 3) & 0x03) as u8,
            b: ((word >> 5) & 0x07) as u8,
        }
    }

    pub fn words(&self) -> &[u16; DITHER_TABLE_LEN] {
        &self.words
    }
}

impl Default for DitherTable {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_index_row_offset() {
        assert_eq!(DitherTable::index(0, 0), 0);
        assert_eq!(DitherTable::index(5, 0), 5);
        // each row shifts by 8
        assert_eq!(DitherTable::index(0, 1), 8);
        assert_eq!(DitherTable::index(250, 1), 2);
        assert_eq!(DitherTable::index(0, 32), 0);
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = DitherTable::from_seed(42);
        let b = DitherTable::from_seed(42);
        assert_eq!(a.words(), b.words());
    }

    #[test]
    fn test_reseed_changes_noise() {
        let mut table = DitherTable::from_seed(1);
        let before = *table.words();
        table.reseed(2);
        assert_ne!(&before, table.words());
        assert_eq!(table.words().len(), DITHER_TABLE_LEN);
    }

    #[test]
    fn test_noise_bit_split() {
        let mut table = DitherTable::zeroed();
        table.words[DitherTable::index(3, 0)] = 0b1111_0110_1011_0101;
        // low byte 1011_0101: blue 101, green 10, red 101
        assert_eq!(table.noise(3, 0), Noise { r: 5, g: 2, b: 5 });
    }

    proptest! {
        #[test]
        fn prop_index_periodic(x in 0usize..10_000, y in 0usize..10_000) {
            let i = DitherTable::index(x, y);
            prop_assert!(i < DITHER_TABLE_LEN);
            prop_assert_eq!(i, DitherTable::index(x + DITHER_TABLE_LEN, y));
            prop_assert_eq!(i, DitherTable::index(x, y + 32));
        }

        #[test]
        fn prop_noise_in_range(seed: u64, x in 0usize..320, y in 0usize..480) {
            let n = DitherTable::from_seed(seed).noise(x, y);
            prop_assert!(n.r <= 7 && n.g <= 3 && n.b <= 7);
        }
    }
}
