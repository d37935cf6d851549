//! Command descriptors and panel sequences
//!
//! A descriptor is one opcode, its parameter bytes, and a delay to hold
//! after the last byte. Sequences are replayed in order; a descriptor with
//! the [`SEQUENCE_END`] opcode stops replay, so static tables may be
//! terminated C-style or simply end with the slice.
//!
//! # Init order
//!
//! ```text
//! (reset pulse) → 11 exit sleep → B0 access protect → D0 power
//!   → D1 VCOM → D2 normal power → C1 normal timing → C0 panel driving
//!   → C5 frame rate → C8 gamma → 3A pixel format → 36 address mode
//!   → 29 display on
//! ```

use heapless::Vec;

use crate::config::panel::PanelSettings;
use crate::config::ConfigError;
use crate::window::Window;

/// Controller opcodes (DCS plus manufacturer commands)
pub mod opcode {
    pub const NOP: u8 = 0x00;
    pub const SOFT_RESET: u8 = 0x01;
    pub const ENTER_SLEEP: u8 = 0x10;
    pub const EXIT_SLEEP: u8 = 0x11;
    pub const EXIT_INVERT: u8 = 0x20;
    pub const ENTER_INVERT: u8 = 0x21;
    pub const DISPLAY_OFF: u8 = 0x28;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const SET_COLUMN_ADDRESS: u8 = 0x2A;
    pub const SET_PAGE_ADDRESS: u8 = 0x2B;
    pub const WRITE_MEMORY_START: u8 = 0x2C;
    pub const READ_MEMORY_START: u8 = 0x2E;
    pub const SET_TEAR_OFF: u8 = 0x34;
    pub const SET_TEAR_ON: u8 = 0x35;
    pub const SET_ADDRESS_MODE: u8 = 0x36;
    pub const SET_PIXEL_FORMAT: u8 = 0x3A;
    pub const WRITE_MEMORY_CONTINUE: u8 = 0x3C;
    pub const COMMAND_ACCESS_PROTECT: u8 = 0xB0;
    pub const DEVICE_CODE_READ: u8 = 0xBF;
    pub const PANEL_DRIVING: u8 = 0xC0;
    pub const DISPLAY_TIMING_NORMAL: u8 = 0xC1;
    pub const DISPLAY_TIMING_PARTIAL: u8 = 0xC2;
    pub const FRAME_RATE: u8 = 0xC5;
    pub const INTERFACE_CONTROL: u8 = 0xC6;
    pub const GAMMA_SETTING: u8 = 0xC8;
    pub const POWER_SETTING: u8 = 0xD0;
    pub const VCOM_CONTROL: u8 = 0xD1;
    pub const POWER_SETTING_NORMAL: u8 = 0xD2;
    pub const POWER_SETTING_PARTIAL: u8 = 0xD3;
}

/// Opcode that terminates a sequence
pub const SEQUENCE_END: u8 = 0xFF;

/// Longest parameter list of any descriptor
pub const MAX_PAYLOAD: usize = 16;

/// Longest sequence the builders produce
pub const MAX_SEQUENCE: usize = 16;

/// Delay after leaving sleep before the next command
pub const EXIT_SLEEP_WAIT_MS: u16 = 120;

/// Delay after switching the display on
pub const DISPLAY_ON_WAIT_MS: u16 = 20;

/// Borrowed command descriptor, usable in `static` tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command<'a> {
    pub opcode: u8,
    pub payload: &'a [u8],
    pub wait_ms: u16,
}

impl<'a> Command<'a> {
    pub const fn new(opcode: u8, payload: &'a [u8]) -> Self {
        Self {
            opcode,
            payload,
            wait_ms: 0,
        }
    }

    /// Hold the bus idle for `ms` after this command
    pub const fn with_wait(mut self, ms: u16) -> Self {
        self.wait_ms = ms;
        self
    }

    /// Sequence terminator
    pub const fn end() -> Command<'static> {
        Command {
            opcode: SEQUENCE_END,
            payload: &[],
            wait_ms: 0,
        }
    }

    pub const fn is_end(&self) -> bool {
        self.opcode == SEQUENCE_END
    }
}

/// Command descriptor built at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OwnedCommand {
    pub opcode: u8,
    pub payload: Vec<u8, MAX_PAYLOAD>,
    pub wait_ms: u16,
}

impl OwnedCommand {
    /// Copy `payload` into a new descriptor; fails if it is too long
    pub fn new(opcode: u8, payload: &[u8]) -> Result<Self, ConfigError> {
        Ok(Self {
            opcode,
            payload: Vec::from_slice(payload).map_err(|_| ConfigError::PayloadTooLong)?,
            wait_ms: 0,
        })
    }

    pub fn with_wait(mut self, ms: u16) -> Self {
        self.wait_ms = ms;
        self
    }

    pub fn as_command(&self) -> Command<'_> {
        Command {
            opcode: self.opcode,
            payload: &self.payload,
            wait_ms: self.wait_ms,
        }
    }
}

/// Built sequence
pub type Sequence = Vec<OwnedCommand, MAX_SEQUENCE>;

fn push(seq: &mut Sequence, cmd: OwnedCommand) -> Result<(), ConfigError> {
    seq.push(cmd).map_err(|_| ConfigError::SequenceTooLong)
}

/// Full power-on sequence, from exit-sleep through display-on
///
/// The reset pulse is not part of the sequence; it is driven on its own
/// line before replay.
pub fn init_sequence(settings: &PanelSettings) -> Result<Sequence, ConfigError> {
    let mut seq = Sequence::new();

    push(&mut seq, OwnedCommand::new(opcode::EXIT_SLEEP, &[])?.with_wait(EXIT_SLEEP_WAIT_MS))?;
    push(&mut seq, OwnedCommand::new(opcode::COMMAND_ACCESS_PROTECT, &[0x00])?)?;
    push(&mut seq, OwnedCommand::new(opcode::POWER_SETTING, &settings.power.payload())?)?;
    push(&mut seq, OwnedCommand::new(opcode::VCOM_CONTROL, &settings.vcom.payload())?)?;
    push(
        &mut seq,
        OwnedCommand::new(opcode::POWER_SETTING_NORMAL, &settings.normal_power.payload())?,
    )?;
    push(
        &mut seq,
        OwnedCommand::new(opcode::DISPLAY_TIMING_NORMAL, &settings.timing.payload())?,
    )?;
    push(&mut seq, OwnedCommand::new(opcode::PANEL_DRIVING, &settings.driving.payload())?)?;
    push(&mut seq, OwnedCommand::new(opcode::FRAME_RATE, &[settings.frame_rate & 0x07])?)?;
    push(&mut seq, OwnedCommand::new(opcode::GAMMA_SETTING, settings.gamma.payload()?.as_slice())?)?;
    push(
        &mut seq,
        OwnedCommand::new(opcode::SET_PIXEL_FORMAT, &[settings.pixel_format.colmod()])?,
    )?;
    push(&mut seq, OwnedCommand::new(opcode::SET_ADDRESS_MODE, &[settings.address_mode.bits()])?)?;
    if settings.inverted {
        push(&mut seq, OwnedCommand::new(opcode::ENTER_INVERT, &[])?)?;
    }
    push(&mut seq, OwnedCommand::new(opcode::DISPLAY_ON, &[])?.with_wait(DISPLAY_ON_WAIT_MS))?;

    Ok(seq)
}

/// Power, VCOM and gamma only; safe to replay while the panel is running
pub fn reconfigure_sequence(settings: &PanelSettings) -> Result<Sequence, ConfigError> {
    let mut seq = Sequence::new();
    push(&mut seq, OwnedCommand::new(opcode::POWER_SETTING, &settings.power.payload())?)?;
    push(&mut seq, OwnedCommand::new(opcode::VCOM_CONTROL, &settings.vcom.payload())?)?;
    push(&mut seq, OwnedCommand::new(opcode::GAMMA_SETTING, settings.gamma.payload()?.as_slice())?)?;
    Ok(seq)
}

/// Column/page address set followed by memory write start
pub fn window_sequence(window: &Window) -> Result<Sequence, ConfigError> {
    let [x0h, x0l] = window.x0.to_be_bytes();
    let [x1h, x1l] = window.x1.to_be_bytes();
    let [y0h, y0l] = window.y0.to_be_bytes();
    let [y1h, y1l] = window.y1.to_be_bytes();

    let mut seq = Sequence::new();
    push(&mut seq, OwnedCommand::new(opcode::SET_COLUMN_ADDRESS, &[x0h, x0l, x1h, x1l])?)?;
    push(&mut seq, OwnedCommand::new(opcode::SET_PAGE_ADDRESS, &[y0h, y0l, y1h, y1l])?)?;
    push(&mut seq, OwnedCommand::new(opcode::WRITE_MEMORY_START, &[])?)?;
    Ok(seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::panel::{Gamma, PixelFormat};

    #[test]
    fn test_default_init_sequence_bytes() {
        let seq = init_sequence(&PanelSettings::default()).unwrap();
        let expected: &[(u8, &[u8], u16)] = &[
            (0x11, &[], 120),
            (0xB0, &[0x00], 0),
            (0xD0, &[0x07, 0x41, 0x1D], 0),
            (0xD1, &[0x00, 0x2B, 0x1F], 0),
            (0xD2, &[0x01, 0x11], 0),
            (0xC1, &[0x10, 0x10, 0x88], 0),
            (0xC0, &[0x00, 0x3B, 0x00, 0x02, 0x11], 0),
            (0xC5, &[0x00], 0),
            (
                0xC8,
                &[0x00, 0x14, 0x33, 0x10, 0x00, 0x16, 0x44, 0x36, 0x77, 0x00, 0x0F, 0x00],
                0,
            ),
            (0x3A, &[0x66], 0),
            (0x36, &[0x40], 0),
            (0x29, &[], 20),
        ];

        assert_eq!(seq.len(), expected.len());
        for (cmd, &(op, payload, wait)) in seq.iter().zip(expected.iter()) {
            assert_eq!(cmd.opcode, op);
            assert_eq!(cmd.payload.as_slice(), payload);
            assert_eq!(cmd.wait_ms, wait);
        }
    }

    #[test]
    fn test_init_sequence_options() {
        let settings = PanelSettings {
            pixel_format: PixelFormat::Rgb565,
            inverted: true,
            ..PanelSettings::default()
        };
        let seq = init_sequence(&settings).unwrap();
        let ops: Vec<u8, MAX_SEQUENCE> = seq.iter().map(|c| c.opcode).collect();

        assert_eq!(seq[9].payload.as_slice(), &[0x55]);
        assert_eq!(&ops[ops.len() - 2..], &[opcode::ENTER_INVERT, opcode::DISPLAY_ON]);
    }

    #[test]
    fn test_reconfigure_subset() {
        let seq = reconfigure_sequence(&PanelSettings::default()).unwrap();
        let ops: Vec<u8, MAX_SEQUENCE> = seq.iter().map(|c| c.opcode).collect();
        assert_eq!(ops.as_slice(), &[0xD0, 0xD1, 0xC8]);
    }

    #[test]
    fn test_raw_gamma_passthrough() {
        let raw = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];
        let settings = PanelSettings {
            gamma: Gamma::Raw(Vec::from_slice(&raw).unwrap()),
            ..PanelSettings::default()
        };
        let seq = reconfigure_sequence(&settings).unwrap();
        assert_eq!(seq[2].payload.as_slice(), &raw);

        let bad = PanelSettings {
            gamma: Gamma::Raw(Vec::from_slice(&raw[..5]).unwrap()),
            ..PanelSettings::default()
        };
        assert_eq!(reconfigure_sequence(&bad), Err(ConfigError::InvalidGammaLength));
    }

    #[test]
    fn test_window_sequence_big_endian() {
        let w = Window::new(0x012, 0x100, 0x13F, 0x1DF, 320, 480).unwrap();
        let seq = window_sequence(&w).unwrap();
        assert_eq!(seq[0].opcode, opcode::SET_COLUMN_ADDRESS);
        assert_eq!(seq[0].payload.as_slice(), &[0x00, 0x12, 0x01, 0x3F]);
        assert_eq!(seq[1].opcode, opcode::SET_PAGE_ADDRESS);
        assert_eq!(seq[1].payload.as_slice(), &[0x01, 0x00, 0x01, 0xDF]);
        assert_eq!(seq[2].opcode, opcode::WRITE_MEMORY_START);
        assert!(seq[2].payload.is_empty());
    }

    #[test]
    fn test_static_table_terminator() {
        const TABLE: &[Command<'static>] = &[
            Command::new(opcode::SET_TEAR_ON, &[0x00]),
            Command::new(opcode::DISPLAY_ON, &[]).with_wait(20),
            Command::end(),
        ];
        assert!(!TABLE[1].is_end());
        assert!(TABLE[2].is_end());
        assert_eq!(TABLE[1].wait_ms, 20);
    }

    #[test]
    fn test_payload_too_long() {
        assert_eq!(
            OwnedCommand::new(opcode::NOP, &[0u8; MAX_PAYLOAD + 1]),
            Err(ConfigError::PayloadTooLong)
        );
        let cmd = OwnedCommand::new(opcode::SET_TEAR_ON, &[0]).unwrap();
        assert_eq!(cmd.as_command(), Command::new(opcode::SET_TEAR_ON, &[0]));
    }
}
