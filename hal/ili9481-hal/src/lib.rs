//! ILI9481 Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the panel driver is written
//! against. Chip-specific crates (or board bring-up code) implement them
//! for their GPIO and DMA peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (UI, image loader, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ili9481-drivers (bus, stream, panel)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ili9481-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  GPIO pins /  │       │  DMA / LCD    │
//! │  port regs    │       │  peripheral   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::FlexPin`] - Digital I/O
//! - [`port::DataPort`] - 8-bit parallel data lines
//! - [`dma::DmaChannel`] - Background pixel transfers

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod gpio;
pub mod port;

// Re-export key traits at crate root for convenience
pub use dma::DmaChannel;
pub use gpio::{FlexPin, InputPin, OutputPin};
pub use port::{DataPort, PinPort, PortDirection};
