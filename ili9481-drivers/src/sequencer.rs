//! Command sequencer
//!
//! Replays descriptor lists on a [`Bus`]: opcode with DC low, parameters
//! with DC high, then the descriptor's wait. Callers hold `&mut` on the bus
//! for the whole replay, so nothing can interleave with a sequence.

use embedded_hal::delay::DelayNs;
use ili9481_core::command::{self, opcode, Command, OwnedCommand};
use ili9481_core::{ConfigError, Window};

use crate::bus::Bus;

/// Hold time for each phase of the reset pulse
pub const RESET_HOLD_MS: u32 = 100;

/// Bytes returned by the device code read after the dummy byte
pub const DEVICE_CODE_LEN: usize = 5;

fn execute<B: Bus, D: DelayNs>(bus: &mut B, delay: &mut D, cmd: &Command<'_>) {
    bus.write_command(cmd.opcode);
    bus.write_data_burst(cmd.payload);
    if cmd.wait_ms > 0 {
        delay.delay_ms(cmd.wait_ms as u32);
    }
}

/// Replay `sequence` up to its end or the first terminator
///
/// Returns the number of descriptors executed.
pub fn run<B: Bus, D: DelayNs>(bus: &mut B, delay: &mut D, sequence: &[Command<'_>]) -> usize {
    let mut count = 0;
    for cmd in sequence.iter().take_while(|cmd| !cmd.is_end()) {
        execute(bus, delay, cmd);
        count += 1;
    }
    count
}

/// Replay a runtime-built sequence
pub fn run_owned<B: Bus, D: DelayNs>(bus: &mut B, delay: &mut D, sequence: &[OwnedCommand]) -> usize {
    let mut count = 0;
    for cmd in sequence.iter().map(OwnedCommand::as_command).take_while(|cmd| !cmd.is_end()) {
        execute(bus, delay, &cmd);
        count += 1;
    }
    count
}

/// Pulse the reset line: released, asserted, released, each held
/// [`RESET_HOLD_MS`]
pub fn hard_reset<B: Bus, D: DelayNs>(bus: &mut B, delay: &mut D) {
    bus.set_reset(false);
    delay.delay_ms(RESET_HOLD_MS);
    bus.set_reset(true);
    delay.delay_ms(RESET_HOLD_MS);
    bus.set_reset(false);
    delay.delay_ms(RESET_HOLD_MS);
}

/// Arm an addressing window and start a memory write
pub fn set_window<B: Bus, D: DelayNs>(bus: &mut B, delay: &mut D, window: &Window) -> Result<(), ConfigError> {
    trace!("window {} {} {} {}", window.x0, window.y0, window.x1, window.y1);
    let seq = command::window_sequence(window)?;
    run_owned(bus, delay, &seq);
    Ok(())
}

/// Issue `opcode` and read `buf.len()` parameter bytes
///
/// The controller drives one dummy byte before the first parameter; it is
/// read and discarded.
pub fn read_register<B: Bus>(bus: &mut B, opcode: u8, buf: &mut [u8]) {
    bus.write_command(opcode);
    let _dummy = bus.read_data();
    for byte in buf.iter_mut() {
        *byte = bus.read_data();
    }
}

/// Read the controller's device code (`02 04 94 81 FF` on an ILI9481)
pub fn device_code<B: Bus>(bus: &mut B) -> [u8; DEVICE_CODE_LEN] {
    let mut code = [0; DEVICE_CODE_LEN];
    read_register(bus, opcode::DEVICE_CODE_READ, &mut code);
    code
}
