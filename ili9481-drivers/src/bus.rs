//! Bus transaction layer
//!
//! Drives the 8080-style parallel interface: eight data lines plus
//! active-low CS, WR, RD and RST and a DC line (low = command).
//!
//! # Write cycle
//!
//! ```text
//! CS  ‾‾‾\________________________/‾‾‾
//! DC  ‾‾‾‾‾\__cmd___/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾   (stays high for data)
//! D   ====X=====byte=====X============
//! WR  ‾‾‾‾‾‾‾‾‾\______/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾   (controller latches on rising edge)
//! ```
//!
//! Between calls CS is released and DC rests high, so every call starts
//! from the same idle state.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use ili9481_core::color::Color;
use ili9481_hal::{DataPort, OutputPin, PortDirection};

use crate::transport::{PixelEncoding, Transport};

/// Byte-level access to the controller
///
/// Writes cannot fail; a missing or unpowered panel simply ignores them.
pub trait Bus {
    /// Write one byte with DC low
    fn write_command(&mut self, opcode: u8);

    /// Write one byte with DC high
    fn write_data(&mut self, byte: u8);

    /// Write consecutive data bytes
    fn write_data_burst(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_data(byte);
        }
    }

    /// Read one data byte
    fn read_data(&mut self) -> u8;

    /// Drive the reset line (`true` = reset asserted)
    fn set_reset(&mut self, active: bool);

    /// Hold the bus in the data phase for an externally clocked burst
    fn begin_burst(&mut self);

    /// Return to idle after [`Bus::begin_burst`]
    fn end_burst(&mut self);
}

/// Control lines of the bus
pub struct ControlPins<P> {
    pub cs: P,
    pub dc: P,
    pub wr: P,
    pub rd: P,
    pub rst: P,
}

/// Bit-banged bus over GPIOs
pub struct GpioBus<D, P, T> {
    port: D,
    pins: ControlPins<P>,
    delay: T,
    wr_pulse_ns: u32,
    /// Completed pixel submissions not yet retired
    completed: usize,
}

impl<D, P, T> GpioBus<D, P, T>
where
    D: DataPort,
    P: OutputPin,
    T: DelayNs,
{
    /// Take ownership of the lines and park them idle
    ///
    /// `wr_pulse_ns` is the minimum WR/RD low time; 0 toggles as fast as the
    /// GPIOs allow.
    pub fn new(port: D, pins: ControlPins<P>, delay: T, wr_pulse_ns: u32) -> Self {
        let mut bus = Self {
            port,
            pins,
            delay,
            wr_pulse_ns,
            completed: 0,
        };
        bus.port.set_direction(PortDirection::Output);
        bus.pins.rst.set_high();
        bus.pins.rd.set_high();
        bus.pins.wr.set_high();
        bus.pins.dc.set_high();
        bus.pins.cs.set_high();
        bus
    }

    /// Give the lines back
    pub fn release(self) -> (D, ControlPins<P>, T) {
        (self.port, self.pins, self.delay)
    }

    fn hold(&mut self) {
        if self.wr_pulse_ns > 0 {
            self.delay.delay_ns(self.wr_pulse_ns);
        }
    }

    /// Present a byte and latch it; CS and DC must already be set
    fn strobe(&mut self, byte: u8) {
        self.port.write(byte);
        self.pins.wr.set_low();
        self.hold();
        self.pins.wr.set_high();
    }
}

impl<D, P, T> Bus for GpioBus<D, P, T>
where
    D: DataPort,
    P: OutputPin,
    T: DelayNs,
{
    fn write_command(&mut self, opcode: u8) {
        self.pins.cs.set_low();
        self.pins.dc.set_low();
        self.strobe(opcode);
        self.pins.dc.set_high();
        self.pins.cs.set_high();
    }

    fn write_data(&mut self, byte: u8) {
        self.pins.cs.set_low();
        self.strobe(byte);
        self.pins.cs.set_high();
    }

    fn write_data_burst(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.pins.cs.set_low();
        for &byte in bytes {
            self.strobe(byte);
        }
        self.pins.cs.set_high();
    }

    fn read_data(&mut self) -> u8 {
        self.port.set_direction(PortDirection::Input);
        self.pins.cs.set_low();
        self.pins.rd.set_low();
        self.hold();
        let byte = self.port.read();
        self.pins.rd.set_high();
        self.pins.cs.set_high();
        self.port.set_direction(PortDirection::Output);
        byte
    }

    fn set_reset(&mut self, active: bool) {
        self.pins.rst.set_state(!active);
    }

    fn begin_burst(&mut self) {
        self.pins.dc.set_high();
        self.pins.cs.set_low();
    }

    fn end_burst(&mut self) {
        self.pins.cs.set_high();
    }
}

/// Pixels go out synchronously; every submission is complete on return
impl<D, P, T> Transport for GpioBus<D, P, T>
where
    D: DataPort,
    P: OutputPin,
    T: DelayNs,
{
    type Error = Infallible;

    fn submit(&mut self, pixels: &[Color], encoding: PixelEncoding) -> Result<(), Self::Error> {
        let width = encoding.format.bytes_per_pixel();
        self.pins.cs.set_low();
        for &pixel in pixels {
            let bytes = encoding.encode(pixel);
            for &byte in &bytes[..width] {
                self.strobe(byte);
            }
        }
        self.pins.cs.set_high();
        self.completed += 1;
        Ok(())
    }

    fn poll_complete(&mut self) -> Result<bool, Self::Error> {
        if self.completed == 0 {
            return Ok(false);
        }
        self.completed -= 1;
        Ok(true)
    }

    fn abandon(&mut self) {
        self.completed = 0;
    }
}
