//! Configuration register
//!
//! The configuration register selects the scan mode, the analog input pair and
//! whether the inputs are measured single-ended or differentially.
//!
//! Byte layout, MSB first: `0 SCAN1 SCAN0 0 0 0 CS0 SGL/DIF`
//!
//! The MAX11644/5 have two inputs, so only the lowest channel select bit is
//! used. The upper channel select bits are always written as zero.

use core::convert::Infallible;

use regiface::{register, Register, ToByteArray, WritableRegister};

use super::{check, Field, FieldError};

/// Scan mode
///
/// Controls which channels are converted for each read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanMode {
    /// Scan up from AIN0 to the selected channel (default)
    #[default]
    ScanUp = 0,
    /// Convert the selected channel eight times
    Repeat = 1,
    /// Marked "do not use" by the datasheet. Encoded as-is.
    Reserved = 2,
    /// Convert the selected channel once
    Single = 3,
}

impl ScanMode {
    /// Decodes the low two bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => ScanMode::ScanUp,
            1 => ScanMode::Repeat,
            2 => ScanMode::Reserved,
            _ => ScanMode::Single,
        }
    }

    /// Number of results one read request produces for `channel`,
    /// or `None` for the reserved mode.
    pub const fn conversions(self, channel: Channel) -> Option<usize> {
        match self {
            ScanMode::ScanUp => Some(channel as usize + 1),
            ScanMode::Repeat => Some(8),
            ScanMode::Reserved => None,
            ScanMode::Single => Some(1),
        }
    }
}

/// Analog input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pin {
    /// AIN0
    Ain0,
    /// AIN1
    Ain1,
    /// Ground
    Gnd,
}

/// Channel select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel 0 (default)
    #[default]
    Ch0 = 0,
    /// Channel 1
    Ch1 = 1,
}

impl Channel {
    /// Decodes the low bit of `bit`
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            Channel::Ch1
        } else {
            Channel::Ch0
        }
    }

    /// Positive and negative terminals measured for this channel.
    ///
    /// | CS0 | Single-ended  | Differential  |
    /// |-----|---------------|---------------|
    /// | 0   | AIN0 - GND    | AIN0 - AIN1   |
    /// | 1   | AIN1 - GND    | AIN1 - AIN0   |
    pub const fn pins(self, input: InputMode) -> (Pin, Pin) {
        match (self, input) {
            (Channel::Ch0, InputMode::SingleEnded) => (Pin::Ain0, Pin::Gnd),
            (Channel::Ch1, InputMode::SingleEnded) => (Pin::Ain1, Pin::Gnd),
            (Channel::Ch0, InputMode::Differential) => (Pin::Ain0, Pin::Ain1),
            (Channel::Ch1, InputMode::Differential) => (Pin::Ain1, Pin::Ain0),
        }
    }
}

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// Differential input, output coding follows the operating mode
    Differential = 0,
    /// Single-ended input, binary output (default)
    #[default]
    SingleEnded = 1,
}

impl InputMode {
    /// Decodes the low bit of `bit`
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            InputMode::SingleEnded
        } else {
            InputMode::Differential
        }
    }
}

/// Configuration register (marker: bit 7 clear)
///
/// # Important Notes
/// - The input mode written here decides, together with the operating mode,
///   how later conversions are decoded
/// - [`ScanMode::Reserved`] is written unchanged, the device behavior is undefined
#[register(0x00u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigRegister {
    /// Scan mode
    pub scan: ScanMode,
    /// Channel select
    pub channel: Channel,
    /// Single-ended or differential input
    pub input: InputMode,
}

impl ConfigRegister {
    /// Builds a configuration register from raw field values, truncating each to its width.
    pub const fn from_bits(scan: u8, channel: u8, input: u8) -> Self {
        Self {
            scan: ScanMode::from_bits(scan),
            channel: Channel::from_bit(channel),
            input: InputMode::from_bit(input),
        }
    }

    /// Builds a configuration register from raw field values, rejecting any
    /// value that does not fit its field. The reserved scan mode is accepted.
    pub fn try_from_bits(scan: u8, channel: u8, input: u8) -> Result<Self, FieldError> {
        Ok(Self::from_bits(
            check(Field::Scan, scan)?,
            check(Field::Channel, channel)?,
            check(Field::InputMode, input)?,
        ))
    }

    /// Replaces the scan mode.
    pub fn with_scan(self, scan: ScanMode) -> Self {
        Self { scan, ..self }
    }

    /// Replaces the channel select.
    pub fn with_channel(self, channel: Channel) -> Self {
        Self { channel, ..self }
    }

    /// Replaces the input mode.
    pub fn with_input(self, input: InputMode) -> Self {
        Self { input, ..self }
    }

    /// Terminals measured with this configuration
    pub fn pins(&self) -> (Pin, Pin) {
        self.channel.pins(self.input)
    }
}

impl ToByteArray for ConfigRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([Self::id()
            | ((self.scan as u8) << 5)
            | ((self.channel as u8) << 1)
            | self.input as u8])
    }
}
