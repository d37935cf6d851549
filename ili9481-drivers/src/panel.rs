//! ILI9481 panel
//!
//! Ties the streaming engine and the command sequencer together behind
//! the small API applications use: initialize, arm windows, fill, stream
//! frame buffers, retune registers at runtime.

use embedded_hal::delay::DelayNs;
use ili9481_core::color::Color;
use ili9481_core::command::{self, opcode, Command};
use ili9481_core::config::{DriverConfig, PanelSettings};
use ili9481_core::{ConfigError, Window};

use crate::error::DriverError;
use crate::sequencer::{self, DEVICE_CODE_LEN};
use crate::stream::StreamingEngine;
use crate::transport::Transport;

type Result<T, E> = core::result::Result<T, DriverError<E>>;

/// ILI9481 on transport `T` with frame buffers of `N` pixels
pub struct Ili9481<T, D, const N: usize> {
    engine: StreamingEngine<T, D, N>,
    config: DriverConfig,
}

impl<T, D, const N: usize> Ili9481<T, D, N>
where
    T: Transport,
    D: DelayNs,
{
    /// Validate `config` and take the transport; the panel is untouched
    /// until [`Ili9481::init`]
    pub fn new(transport: T, delay: D, config: DriverConfig) -> core::result::Result<Self, ConfigError> {
        let engine = StreamingEngine::new(transport, delay, &config)?;
        Ok(Self { engine, config })
    }

    /// Reset the controller, program every register and arm the full
    /// screen
    ///
    /// Also the recovery path after a transfer timeout.
    pub fn init(&mut self) -> Result<(), T::Error> {
        info!("ili9481: init {}x{}", self.config.width, self.config.height);
        let seq = command::init_sequence(&self.config.panel)?;
        let full = self.full_window();

        self.engine.recover();
        self.engine.with_bus(|bus, delay| {
            sequencer::hard_reset(bus, delay);
            sequencer::run_owned(bus, delay, &seq);
        })?;
        self.engine.set_window(full)?;

        info!("ili9481: ready");
        Ok(())
    }

    /// Replay a caller-supplied sequence, then re-arm the window
    pub fn run_sequence(&mut self, sequence: &[Command<'_>]) -> Result<usize, T::Error> {
        self.engine.run_sequence(sequence)
    }

    /// Arm the inclusive window `(x0, y0)-(x1, y1)`
    pub fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), T::Error> {
        let window = Window::new(x0, y0, x1, y1, self.config.width, self.config.height)?;
        self.engine.set_window(window)
    }

    /// Fill a rectangle with one color
    pub fn fill_area(&mut self, color: Color, x: u16, y: u16, w: u16, h: u16) -> Result<(), T::Error> {
        self.engine.fill_area(color, x, y, w, h)
    }

    /// Fill the whole screen and leave the full window armed
    pub fn clear(&mut self, color: Color) -> Result<(), T::Error> {
        self.engine
            .fill_area(color, 0, 0, self.config.width, self.config.height)
    }

    /// Writable frame buffer
    pub fn buffer_mut(&mut self) -> Result<&mut [Color; N], T::Error> {
        self.engine.buffer_mut()
    }

    /// Stream the first `len` pixels of the writable buffer and flip
    pub fn write_pixels(&mut self, len: usize) -> Result<(), T::Error> {
        self.engine.write_pixels(len)
    }

    /// Stream the writable buffer and flip
    pub fn swap_buffers(&mut self) -> Result<(), T::Error> {
        self.engine.swap_buffers()
    }

    /// Wait for all streamed pixels
    pub fn flush(&mut self) -> Result<(), T::Error> {
        self.engine.drain()
    }

    /// Reprogram power, VCOM and gamma without a reset
    ///
    /// Other fields of `settings` are stored but take effect at the next
    /// [`Ili9481::init`]. The previously armed window (or the full screen)
    /// is re-armed afterwards.
    pub fn reconfigure(&mut self, settings: PanelSettings) -> Result<(), T::Error> {
        settings.validate()?;
        let seq = command::reconfigure_sequence(&settings)?;
        let unarmed = self.engine.window().is_none();

        self.engine.with_bus(|bus, delay| {
            sequencer::run_owned(bus, delay, &seq);
        })?;
        self.config.panel = settings;
        debug!("ili9481: reconfigured");

        if unarmed {
            self.engine.set_window(self.full_window())?;
        }
        Ok(())
    }

    /// Turn display inversion on or off
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), T::Error> {
        let op = if inverted {
            opcode::ENTER_INVERT
        } else {
            opcode::EXIT_INVERT
        };
        self.engine.with_bus(|bus, _| bus.write_command(op))?;
        self.config.panel.inverted = inverted;
        Ok(())
    }

    /// Read the controller's device code
    pub fn device_code(&mut self) -> Result<[u8; DEVICE_CODE_LEN], T::Error> {
        let code = self.engine.with_bus(|bus, _| sequencer::device_code(bus))?;
        info!("ili9481: device code {:02x}", code);
        Ok(code)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn engine(&self) -> &StreamingEngine<T, D, N> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut StreamingEngine<T, D, N> {
        &mut self.engine
    }

    pub fn release(self) -> (T, D) {
        self.engine.release()
    }

    fn full_window(&self) -> Window {
        Window::full(self.config.width, self.config.height)
    }
}
