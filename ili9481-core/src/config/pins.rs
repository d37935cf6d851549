//! Bus pin assignment
//!
//! Board wiring is described by GPIO numbers and checked before any pin
//! is claimed, so a miswired table fails at startup instead of producing
//! a blank panel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Highest usable GPIO number plus one
pub const MAX_GPIO: u8 = 64;

/// GPIO numbers of the 13 bus lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinAssignment {
    /// Reset (active low)
    pub rst: u8,
    /// Read strobe (active low)
    pub rd: u8,
    /// Write strobe (active low)
    pub wr: u8,
    /// Chip select (active low)
    pub cs: u8,
    /// Data/command select (low = command)
    pub dc: u8,
    /// D0..D7
    pub data: [u8; 8],
}

impl PinAssignment {
    /// All pins, control lines first
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        [self.rst, self.rd, self.wr, self.cs, self.dc]
            .into_iter()
            .chain(self.data.iter().copied())
    }

    /// Bit mask of all assigned pins
    pub fn mask(&self) -> u64 {
        self.iter()
            .filter(|&pin| pin < MAX_GPIO)
            .fold(0, |mask, pin| mask | (1u64 << pin))
    }

    /// Bit mask of the data lines only
    pub fn data_mask(&self) -> u64 {
        self.data
            .iter()
            .filter(|&&pin| pin < MAX_GPIO)
            .fold(0, |mask, &pin| mask | (1u64 << pin))
    }

    /// Check every pin is in range and used once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = 0u64;
        for pin in self.iter() {
            if pin >= MAX_GPIO {
                return Err(ConfigError::PinOutOfRange(pin));
            }
            let bit = 1u64 << pin;
            if seen & bit != 0 {
                return Err(ConfigError::DuplicatePin(pin));
            }
            seen |= bit;
        }
        Ok(())
    }
}

impl Default for PinAssignment {
    /// Reference wiring of the ESP32 development board
    fn default() -> Self {
        Self {
            rst: 23,
            rd: 32,
            wr: 5,
            cs: 18,
            dc: 19,
            data: [21, 25, 26, 27, 14, 12, 13, 15],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let pins = PinAssignment::default();
        assert_eq!(pins.validate(), Ok(()));
        assert_eq!(pins.mask().count_ones(), 13);
        assert_eq!(pins.data_mask().count_ones(), 8);
    }

    #[test]
    fn test_duplicate_rejected() {
        let pins = PinAssignment {
            dc: 21,
            ..PinAssignment::default()
        };
        assert_eq!(pins.validate(), Err(ConfigError::DuplicatePin(21)));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut pins = PinAssignment::default();
        pins.data[7] = 64;
        assert_eq!(pins.validate(), Err(ConfigError::PinOutOfRange(64)));
    }
}
