//! GPIO pin abstractions
//!
//! Control lines (CS, DC, WR, RD, RST) only ever drive, so they need
//! [`OutputPin`]. Data lines are turned around for register reads and
//! need [`FlexPin`].

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose direction can be switched at runtime
///
/// Used for the bidirectional data lines. A freshly constructed pin is
/// expected to be an output.
pub trait FlexPin: OutputPin + InputPin {
    /// Release the line and sample it
    fn set_as_input(&mut self);

    /// Drive the line again with the last written level
    fn set_as_output(&mut self);
}
