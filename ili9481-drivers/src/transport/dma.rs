//! DMA-backed transport
//!
//! Commands and register reads go through the wrapped bus; pixel runs are
//! handed to a [`DmaChannel`] that clocks them out in the background. The
//! bus is held in the data phase from the first submission until the last
//! one completes.

use ili9481_core::color::Color;
use ili9481_core::config::{ByteOrder, PixelFormat};
use ili9481_hal::DmaChannel;

use super::{PixelEncoding, Transport};
use crate::bus::Bus;

/// Errors from [`DmaTransport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaTransportError<E> {
    /// Channel words are 16 bits; 18-bit pixels cannot be sent
    UnsupportedFormat,
    /// Channel reported an error
    Channel(E),
}

/// Transport that streams pixels through a DMA channel
pub struct DmaTransport<B, C> {
    bus: B,
    channel: C,
    outstanding: usize,
}

impl<B: Bus, C: DmaChannel> DmaTransport<B, C> {
    pub fn new(bus: B, channel: C) -> Self {
        Self {
            bus,
            channel,
            outstanding: 0,
        }
    }

    /// Submissions started and not yet retired
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn release(self) -> (B, C) {
        (self.bus, self.channel)
    }
}

impl<B: Bus, C: DmaChannel> Bus for DmaTransport<B, C> {
    fn write_command(&mut self, opcode: u8) {
        self.bus.write_command(opcode);
    }

    fn write_data(&mut self, byte: u8) {
        self.bus.write_data(byte);
    }

    fn write_data_burst(&mut self, bytes: &[u8]) {
        self.bus.write_data_burst(bytes);
    }

    fn read_data(&mut self) -> u8 {
        self.bus.read_data()
    }

    fn set_reset(&mut self, active: bool) {
        self.bus.set_reset(active);
    }

    fn begin_burst(&mut self) {
        self.bus.begin_burst();
    }

    fn end_burst(&mut self) {
        self.bus.end_burst();
    }
}

impl<B: Bus, C: DmaChannel> Transport for DmaTransport<B, C> {
    type Error = DmaTransportError<C::Error>;

    fn submit(&mut self, pixels: &[Color], encoding: PixelEncoding) -> Result<(), Self::Error> {
        if !self.supports(encoding) {
            return Err(DmaTransportError::UnsupportedFormat);
        }
        if self.outstanding == 0 {
            self.bus.begin_burst();
        }
        // The channel sends each word low byte first
        let byte_swap = encoding.order == ByteOrder::MsbFirst;
        if let Err(err) = self.channel.start(pixels, byte_swap) {
            if self.outstanding == 0 {
                self.bus.end_burst();
            }
            return Err(DmaTransportError::Channel(err));
        }
        self.outstanding += 1;
        Ok(())
    }

    fn poll_complete(&mut self) -> Result<bool, Self::Error> {
        if self.outstanding == 0 {
            return Ok(false);
        }
        if !self.channel.poll_done().map_err(DmaTransportError::Channel)? {
            return Ok(false);
        }
        self.outstanding -= 1;
        if self.outstanding == 0 {
            self.bus.end_burst();
        }
        Ok(true)
    }

    fn abandon(&mut self) {
        if self.outstanding > 0 {
            self.outstanding = 0;
            self.bus.end_burst();
        }
    }

    fn supports(&self, encoding: PixelEncoding) -> bool {
        encoding.format == PixelFormat::Rgb565
    }

    fn max_outstanding(&self) -> usize {
        self.channel.depth()
    }
}
