//! `embedded-hal` adapters
//!
//! Most chip HALs expose `embedded_hal::digital::OutputPin`; wrapping one
//! in [`EhOutputPin`] makes it usable as a bus control line.

use embedded_hal::digital::OutputPin as EhOutput;
use ili9481_hal::OutputPin;

/// Control line backed by an `embedded-hal` output pin
///
/// Pin errors are dropped: the bus has no way to report them and GPIO
/// writes are infallible on every HAL this is used with.
pub struct EhOutputPin<P> {
    pin: P,
    high: bool,
}

impl<P: EhOutput> EhOutputPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, high: false }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: EhOutput> OutputPin for EhOutputPin<P> {
    fn set_high(&mut self) {
        if self.pin.set_high().is_ok() {
            self.high = true;
        }
    }

    fn set_low(&mut self) {
        if self.pin.set_low().is_ok() {
            self.high = false;
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
