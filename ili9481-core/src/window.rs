//! Addressing windows
//!
//! The controller writes pixels row-major into an inclusive rectangle set
//! with column/page address commands. A window must be non-empty and lie
//! inside the panel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Inclusive pixel rectangle `(x0, y0)-(x1, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// Window from inclusive corners, checked against the panel size
    pub fn new(x0: u16, y0: u16, x1: u16, y1: u16, width: u16, height: u16) -> Result<Self, ConfigError> {
        if x1 < x0 || y1 < y0 {
            return Err(ConfigError::EmptyWindow);
        }
        if x1 >= width || y1 >= height {
            return Err(ConfigError::WindowOutOfBounds);
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Window from origin and size, checked against the panel size
    pub fn from_area(x: u16, y: u16, w: u16, h: u16, width: u16, height: u16) -> Result<Self, ConfigError> {
        if w == 0 || h == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        let x1 = x.checked_add(w - 1).ok_or(ConfigError::WindowOutOfBounds)?;
        let y1 = y.checked_add(h - 1).ok_or(ConfigError::WindowOutOfBounds)?;
        Self::new(x, y, x1, y1, width, height)
    }

    /// The whole panel
    pub const fn full(width: u16, height: u16) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width.saturating_sub(1),
            y1: height.saturating_sub(1),
        }
    }

    pub const fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    pub const fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Pixel count
    pub const fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}
