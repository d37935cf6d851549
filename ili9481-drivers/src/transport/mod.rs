//! Pixel transports
//!
//! A transport is a [`Bus`] that can also take whole runs of pixels and
//! report their completion later. The streaming engine only talks to this
//! trait, so the bit-banged bus and a DMA peripheral are interchangeable.

mod dma;

pub use dma::{DmaTransport, DmaTransportError};

use ili9481_core::color::{unpack, Color};
use ili9481_core::config::{ByteOrder, PixelFormat};

use crate::bus::Bus;

/// How a [`Color`] is laid out on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelEncoding {
    pub format: PixelFormat,
    pub order: ByteOrder,
}

impl PixelEncoding {
    pub const fn new(format: PixelFormat, order: ByteOrder) -> Self {
        Self { format, order }
    }

    /// Bus bytes for one pixel; only the first `format.bytes_per_pixel()`
    /// entries are meaningful
    pub fn encode(&self, color: Color) -> [u8; 3] {
        match (self.format, self.order) {
            (PixelFormat::Rgb565, ByteOrder::MsbFirst) => {
                let [hi, lo] = color.to_be_bytes();
                [hi, lo, 0]
            }
            (PixelFormat::Rgb565, ByteOrder::LsbFirst) => {
                let [lo, hi] = color.to_le_bytes();
                [lo, hi, 0]
            }
            (PixelFormat::Rgb666, ByteOrder::MsbFirst) => {
                let (r, g, b) = unpack(color);
                [r, g, b]
            }
            (PixelFormat::Rgb666, ByteOrder::LsbFirst) => {
                let (r, g, b) = unpack(color);
                [b, g, r]
            }
        }
    }
}

/// Asynchronous pixel sink
///
/// Submissions complete in order. The caller must not modify a submitted
/// slice until the matching completion has been observed through
/// [`Transport::poll_complete`].
pub trait Transport: Bus {
    /// Transport-specific error
    type Error;

    /// Start sending `pixels`; may return before they are on the wire
    fn submit(&mut self, pixels: &[Color], encoding: PixelEncoding) -> Result<(), Self::Error>;

    /// Retire the oldest outstanding submission if it has completed
    fn poll_complete(&mut self) -> Result<bool, Self::Error>;

    /// Forget all outstanding submissions (after a timeout)
    fn abandon(&mut self);

    /// Whether pixels can be carried in this encoding
    fn supports(&self, _encoding: PixelEncoding) -> bool {
        true
    }

    /// Submissions that may be outstanding at once
    fn max_outstanding(&self) -> usize {
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ili9481_core::color::pack;

    #[test]
    fn test_rgb565_byte_orders() {
        let color = 0xF81F;
        let msb = PixelEncoding::new(PixelFormat::Rgb565, ByteOrder::MsbFirst);
        let lsb = PixelEncoding::new(PixelFormat::Rgb565, ByteOrder::LsbFirst);
        assert_eq!(&msb.encode(color)[..2], &[0xF8, 0x1F]);
        assert_eq!(&lsb.encode(color)[..2], &[0x1F, 0xF8]);
    }

    #[test]
    fn test_rgb666_channels() {
        let color = pack(0xFC, 0x80, 0x08);
        let msb = PixelEncoding::new(PixelFormat::Rgb666, ByteOrder::MsbFirst);
        let lsb = PixelEncoding::new(PixelFormat::Rgb666, ByteOrder::LsbFirst);
        assert_eq!(msb.encode(color), [0xF8, 0x80, 0x08]);
        assert_eq!(lsb.encode(color), [0x08, 0x80, 0xF8]);
    }
}
