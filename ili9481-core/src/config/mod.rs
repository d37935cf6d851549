//! Configuration types
//!
//! Driver configuration is a plain value checked once with
//! [`DriverConfig::validate`]; every error here is fatal at construction.

pub mod panel;
pub mod pins;

pub use panel::*;
pub use pins::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest supported transaction queue
pub const MAX_QUEUE_DEPTH: usize = 8;

/// Panel size in the controller's native orientation
pub const PANEL_WIDTH: u16 = 320;
pub const PANEL_HEIGHT: u16 = 480;

/// Invalid configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Same GPIO assigned to two bus lines
    DuplicatePin(u8),
    /// GPIO number the platform cannot address
    PinOutOfRange(u8),
    /// Width or height is zero
    ZeroSizedPanel,
    /// Window with no pixels
    EmptyWindow,
    /// Window extends past the panel edge
    WindowOutOfBounds,
    /// Queue depth is zero or above [`MAX_QUEUE_DEPTH`]
    InvalidQueueDepth,
    /// Chunk size is zero or larger than a frame buffer
    InvalidChunkSize,
    /// Transfer timeout is zero
    InvalidTimeout,
    /// Raw gamma curve is not 12 or 14 bytes
    InvalidGammaLength,
    /// Command parameters exceed the descriptor capacity
    PayloadTooLong,
    /// Built sequence exceeds its capacity
    SequenceTooLong,
    /// Transport cannot carry the configured pixel format
    UnsupportedPixelFormat,
}

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverConfig {
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Bus wiring
    pub pins: PinAssignment,
    /// Pixels per streamed transaction (at most the frame buffer length)
    pub chunk_pixels: usize,
    /// Outstanding transactions before enqueue blocks
    pub queue_depth: usize,
    /// Byte order of multi-byte pixels
    pub byte_order: ByteOrder,
    /// A transfer not completing within this is fatal
    pub transfer_timeout_ms: u32,
    /// Minimum WR low time in nanoseconds (0 = as fast as the GPIOs go)
    pub wr_pulse_ns: u32,
    /// Registers programmed at init
    pub panel: PanelSettings,
}

impl DriverConfig {
    /// Check everything that does not depend on the buffer size
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSizedPanel);
        }
        if self.queue_depth == 0 || self.queue_depth > MAX_QUEUE_DEPTH {
            return Err(ConfigError::InvalidQueueDepth);
        }
        if self.chunk_pixels == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.transfer_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.pins.validate()?;
        self.panel.validate()
    }

    /// Check the chunk size against a frame buffer of `buffer_len` pixels
    pub fn validate_for_buffer(&self, buffer_len: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if self.chunk_pixels > buffer_len {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
            pins: PinAssignment::default(),
            chunk_pixels: PANEL_WIDTH as usize * 16,
            queue_depth: 2,
            byte_order: ByteOrder::MsbFirst,
            transfer_timeout_ms: 1000,
            wr_pulse_ns: 0,
            panel: PanelSettings::default(),
        }
    }
}
