//! ILI9481 driver implementations
//!
//! Built on the traits in `ili9481-hal` and the pure logic in
//! `ili9481-core`:
//!
//! - Bus transaction layer (bit-banged 8080 bus)
//! - Transports (bus-backed, DMA-backed)
//! - Double-buffered streaming engine with bounded transfer queue
//! - Command sequencer (reset, init, reconfiguration, register reads)
//! - [`Ili9481`] panel facade

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// Must come first so the logging macros are visible to later modules
#[macro_use]
mod fmt;

pub mod bus;
pub mod eh;
pub mod error;
pub mod panel;
pub mod sequencer;
pub mod stream;
pub mod transport;

#[cfg(test)]
mod mock;

pub use bus::{Bus, ControlPins, GpioBus};
pub use eh::EhOutputPin;
pub use error::DriverError;
pub use panel::Ili9481;
pub use stream::{BufferId, BufferState, StreamingEngine};
pub use transport::{DmaTransport, DmaTransportError, PixelEncoding, Transport};
