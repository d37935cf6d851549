//! Board-agnostic core logic for the ILI9481 driver
//!
//! Nothing in this crate touches hardware:
//!
//! - RGB565 color packing and ordered dithering
//! - 2-bit grayscale glyph compositing
//! - Command descriptors and panel init/reconfiguration sequences
//! - Addressing windows
//! - Configuration type definitions and validation

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod color;
pub mod command;
pub mod composite;
pub mod config;
pub mod dither;
pub mod window;

pub use color::{pack, pack_dithered, unpack, Color, Rgb};
pub use command::{Command, OwnedCommand, SEQUENCE_END};
pub use composite::{composite_gray2, composite_gray2_dithered, Gray2Bitmap};
pub use config::{ConfigError, DriverConfig};
pub use dither::DitherTable;
pub use window::Window;
