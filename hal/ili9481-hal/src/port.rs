//! 8-bit parallel data port
//!
//! The bus layer writes a whole byte at a time. Chips that can update
//! several GPIOs with one set/clear register write implement [`DataPort`]
//! directly; everything else can use [`PinPort`] over eight [`FlexPin`]s.

use crate::gpio::FlexPin;

/// Direction of the data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortDirection {
    /// Lines are driven by the MCU
    Output,
    /// Lines are driven by the panel
    Input,
}

/// Eight data lines D0..D7
pub trait DataPort {
    /// Present `byte` on the lines (D0 = bit 0)
    fn write(&mut self, byte: u8);

    /// Sample the lines (D0 = bit 0)
    fn read(&mut self) -> u8;

    /// Turn the lines around
    fn set_direction(&mut self, direction: PortDirection);
}

/// [`DataPort`] made from eight individual pins
pub struct PinPort<P> {
    pins: [P; 8],
    direction: PortDirection,
}

impl<P: FlexPin> PinPort<P> {
    /// Build a port from pins ordered D0..D7
    pub fn new(pins: [P; 8]) -> Self {
        Self {
            pins,
            direction: PortDirection::Output,
        }
    }

    /// Give the pins back
    pub fn release(self) -> [P; 8] {
        self.pins
    }

    /// Current line direction
    pub fn direction(&self) -> PortDirection {
        self.direction
    }
}

impl<P: FlexPin> DataPort for PinPort<P> {
    fn write(&mut self, byte: u8) {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            pin.set_state(byte & (1 << bit) != 0);
        }
    }

    fn read(&mut self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, pin)| acc | ((pin.is_high() as u8) << bit))
    }

    fn set_direction(&mut self, direction: PortDirection) {
        if direction == self.direction {
            return;
        }
        for pin in self.pins.iter_mut() {
            match direction {
                PortDirection::Input => pin.set_as_input(),
                PortDirection::Output => pin.set_as_output(),
            }
        }
        self.direction = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::{InputPin, OutputPin};

    /// Mock data line; `external` is what the panel drives in input mode
    struct MockPin {
        high: bool,
        external: bool,
        input: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                external: false,
                input: false,
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            if self.input {
                self.external
            } else {
                self.high
            }
        }
    }

    impl FlexPin for MockPin {
        fn set_as_input(&mut self) {
            self.input = true;
        }

        fn set_as_output(&mut self) {
            self.input = false;
        }
    }

    fn port() -> PinPort<MockPin> {
        PinPort::new(core::array::from_fn(|_| MockPin::new()))
    }

    #[test]
    fn test_write_sets_bits_lsb_first() {
        let mut port = port();
        port.write(0b1010_0101);

        let levels: [bool; 8] = core::array::from_fn(|i| port.pins[i].is_set_high());
        assert_eq!(
            levels,
            [true, false, true, false, false, true, false, true]
        );
    }

    #[test]
    fn test_read_samples_external_levels() {
        let mut port = port();
        port.set_direction(PortDirection::Input);
        for (i, pin) in port.pins.iter_mut().enumerate() {
            pin.external = i % 3 == 0;
        }

        assert_eq!(port.read(), 0b0100_1001);
    }

    #[test]
    fn test_direction_switch() {
        let mut port = port();
        assert_eq!(port.direction(), PortDirection::Output);

        port.set_direction(PortDirection::Input);
        assert!(port.pins.iter().all(|p| p.input));

        port.set_direction(PortDirection::Output);
        assert!(port.pins.iter().all(|p| !p.input));
    }
}
