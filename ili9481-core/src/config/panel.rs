//! Panel register settings
//!
//! Typed views of the power, VCOM, timing and gamma registers. Each field
//! is masked to its register width when encoded, so out-of-range values
//! wrap instead of spilling into neighbouring bit fields.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Gamma payload length: 12 coefficient bytes, or 14 on revisions that
/// take two trailing adjustment bytes
pub const GAMMA_LEN: usize = 12;
pub const GAMMA_LEN_EXTENDED: usize = 14;

/// Pixel format on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelFormat {
    /// 16 bits per pixel, two bus writes
    Rgb565,
    /// 18 bits per pixel, three bus writes (one per channel, top 6 bits)
    #[default]
    Rgb666,
}

impl PixelFormat {
    /// Value for the set-pixel-format command
    pub const fn colmod(self) -> u8 {
        match self {
            PixelFormat::Rgb565 => 0x55,
            PixelFormat::Rgb666 => 0x66,
        }
    }

    /// Bus writes per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb666 => 3,
        }
    }
}

/// Order of the bytes of one pixel on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ByteOrder {
    /// High byte (red) first
    #[default]
    MsbFirst,
    /// Low byte (blue) first
    LsbFirst,
}

/// Memory access control (set-address-mode) bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AddressMode(u8);

impl AddressMode {
    pub const VERTICAL_FLIP: u8 = 0x01;
    pub const HORIZONTAL_FLIP: u8 = 0x02;
    pub const BGR: u8 = 0x08;
    pub const LINE_ORDER: u8 = 0x10;
    pub const EXCHANGE: u8 = 0x20;
    pub const COLUMN_ORDER: u8 = 0x40;
    pub const PAGE_ORDER: u8 = 0x80;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with(self, flag: u8) -> Self {
        Self(self.0 | flag)
    }

    pub const fn without(self, flag: u8) -> Self {
        Self(self.0 & !flag)
    }
}

impl Default for AddressMode {
    fn default() -> Self {
        Self(Self::COLUMN_ORDER)
    }
}

/// Power setting (D0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerSetting {
    /// Reference voltage ratio, 3 bits
    pub vc: u8,
    /// Step-up factor, 3 bits
    pub bt: u8,
    /// VREG1OUT amplification, 4 bits
    pub vrh: u8,
}

impl PowerSetting {
    pub fn payload(&self) -> [u8; 3] {
        [self.vc & 0x07, 0x40 | (self.bt & 0x07), 0x10 | (self.vrh & 0x0F)]
    }
}

impl Default for PowerSetting {
    fn default() -> Self {
        Self {
            vc: 0x07,
            bt: 0x01,
            vrh: 0x0D,
        }
    }
}

/// VCOM control (D1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VcomSetting {
    /// VCOMH voltage, 6 bits
    pub vcm: u8,
    /// VCOM alternating amplitude, 5 bits
    pub vdv: u8,
}

impl VcomSetting {
    pub fn payload(&self) -> [u8; 3] {
        [0x00, self.vcm & 0x3F, self.vdv & 0x1F]
    }
}

impl Default for VcomSetting {
    fn default() -> Self {
        Self {
            vcm: 0x2B,
            vdv: 0x1F,
        }
    }
}

/// Power setting for normal mode (D2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalPowerSetting {
    /// Op-amp current, 3 bits
    pub ap: u8,
    /// Step-up circuit 1 frequency, 3 bits
    pub dc0: u8,
    /// Step-up circuit 2 frequency, 3 bits
    pub dc1: u8,
}

impl NormalPowerSetting {
    pub fn payload(&self) -> [u8; 2] {
        [self.ap & 0x07, (self.dc1 & 0x07) | ((self.dc0 & 0x07) << 4)]
    }
}

impl Default for NormalPowerSetting {
    fn default() -> Self {
        Self {
            ap: 0x01,
            dc0: 0x01,
            dc1: 0x01,
        }
    }
}

/// Display timing for normal mode (C1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingSetting {
    /// Line inversion (1) or frame inversion (0)
    pub bc: u8,
    /// Internal clock division, 2 bits
    pub div: u8,
    /// Clocks per line, 5 bits
    pub rtn: u8,
    /// Front porch lines, 4 bits
    pub fp: u8,
    /// Back porch lines, 4 bits
    pub bp: u8,
}

impl TimingSetting {
    pub fn payload(&self) -> [u8; 3] {
        [
            (self.div & 0x03) | ((self.bc & 0x01) << 4),
            self.rtn & 0x1F,
            (self.bp & 0x0F) | ((self.fp & 0x0F) << 4),
        ]
    }
}

impl Default for TimingSetting {
    fn default() -> Self {
        Self {
            bc: 1,
            div: 0,
            rtn: 0x10,
            fp: 8,
            bp: 8,
        }
    }
}

/// Panel driving setting (C0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelDriving {
    /// Gate scan/grayscale inversion flags (REV, SM, GS)
    pub scan_flags: u8,
    /// Driven lines, multiple of 8
    pub lines: u16,
    /// First scanned gate line
    pub scan_start: u8,
    /// Source output level in non-display area (NDL, PTS)
    pub non_display: u8,
    /// Gate interval in non-display area (PTG, ISC)
    pub gate_interval: u8,
}

impl PanelDriving {
    pub fn payload(&self) -> [u8; 5] {
        let nl = (self.lines / 8).saturating_sub(1) as u8 & 0x3F;
        [
            self.scan_flags & 0x17,
            nl,
            self.scan_start & 0x7F,
            self.non_display & 0x17,
            self.gate_interval & 0x1F,
        ]
    }
}

impl Default for PanelDriving {
    fn default() -> Self {
        Self {
            scan_flags: 0x00,
            lines: 480,
            scan_start: 0x00,
            non_display: 0x02,
            gate_interval: 0x11,
        }
    }
}

/// Gamma coefficients (C8)
///
/// `kp`/`kn` are the positive/negative fine adjustments, `rp`/`rn` the
/// gradient adjustments and `vrp`/`vrn` the amplitude adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GammaSetting {
    pub kp: [u8; 6],
    pub rp: [u8; 2],
    pub vrp: [u8; 2],
    pub kn: [u8; 6],
    pub rn: [u8; 2],
    pub vrn: [u8; 2],
}

/// Two 3-bit fields in one byte
const fn nibbles(lo: u8, hi: u8) -> u8 {
    (lo & 0x07) | ((hi & 0x07) << 4)
}

impl GammaSetting {
    pub fn payload(&self) -> [u8; GAMMA_LEN] {
        let (kp, kn) = (&self.kp, &self.kn);
        [
            nibbles(kp[0], kp[1]),
            nibbles(kp[2], kp[3]),
            nibbles(kp[4], kp[5]),
            nibbles(self.rp[0], self.rp[1]),
            self.vrp[0] & 0x0F,
            self.vrp[1] & 0x1F,
            nibbles(kn[0], kn[1]),
            nibbles(kn[2], kn[3]),
            nibbles(kn[4], kn[5]),
            nibbles(self.rn[0], self.rn[1]),
            self.vrn[0] & 0x0F,
            self.vrn[1] & 0x1F,
        ]
    }
}

impl Default for GammaSetting {
    fn default() -> Self {
        Self {
            kp: [0, 0, 4, 1, 3, 3],
            rp: [0, 1],
            vrp: [0x00, 0x16],
            kn: [4, 4, 6, 3, 7, 7],
            rn: [0, 0],
            vrn: [0x0F, 0x00],
        }
    }
}

/// Gamma curve source
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gamma {
    /// Encoded from typed coefficients
    Curve(GammaSetting),
    /// Sent verbatim; must be 12 or 14 bytes
    Raw(Vec<u8, GAMMA_LEN_EXTENDED>),
}

impl Gamma {
    pub fn payload(&self) -> Result<Vec<u8, GAMMA_LEN_EXTENDED>, ConfigError> {
        match self {
            Gamma::Curve(setting) => {
                Vec::from_slice(&setting.payload()).map_err(|_| ConfigError::InvalidGammaLength)
            }
            Gamma::Raw(bytes) if bytes.len() == GAMMA_LEN || bytes.len() == GAMMA_LEN_EXTENDED => {
                Ok(bytes.clone())
            }
            Gamma::Raw(_) => Err(ConfigError::InvalidGammaLength),
        }
    }
}

impl Default for Gamma {
    fn default() -> Self {
        Gamma::Curve(GammaSetting::default())
    }
}

/// Everything the init sequence programs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelSettings {
    pub power: PowerSetting,
    pub vcom: VcomSetting,
    pub normal_power: NormalPowerSetting,
    pub timing: TimingSetting,
    pub driving: PanelDriving,
    /// Frame rate selector, 3 bits
    pub frame_rate: u8,
    pub gamma: Gamma,
    pub pixel_format: PixelFormat,
    pub address_mode: AddressMode,
    /// Enter display inversion before switching on
    pub inverted: bool,
}

impl PanelSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gamma.payload().map(|_| ())
    }
}
