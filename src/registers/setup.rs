//! Setup register
//!
//! The setup register selects the voltage reference, the conversion clock and
//! the operating mode. It can also reset the configuration register.
//!
//! Byte layout, MSB first: `1 SEL2 SEL1 SEL0 CLK BIP/UNI RST X`

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, Register, ToByteArray, WritableRegister};

use super::{check, Field, FieldError};

bitflags! {
    /// Single-bit options of the setup register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SetupFlags: u8 {
        /// Conversions are clocked by SCL instead of the internal oscillator
        const EXTERNAL_CLOCK = 1 << 3;
        /// Bipolar operation, differential results are two's complement
        const BIPOLAR = 1 << 2;
        /// When clear, the configuration register is reset to its default
        const NO_RESET = 1 << 1;
    }
}

/// Reference voltage selection
///
/// | SEL | Reference | REF pin          | Internal reference |
/// |-----|-----------|------------------|--------------------|
/// | 0-1 | VDD       | Not connected    | Always on          |
/// | 2-3 | External  | Reference input  | Always on          |
/// | 4-5 | Internal  | Not connected    | Always on          |
/// | 6   | Internal  | Reference output | Off after conversion |
/// | 7   | Internal  | Reference output | Always on          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference {
    /// Supply voltage used as reference
    #[default]
    Vdd = 0,
    /// External reference applied to the REF pin
    External = 2,
    /// Internal reference, REF pin not connected
    Internal = 4,
    /// Internal reference driven on REF, powered down between conversions
    InternalAutoShutdown = 6,
    /// Internal reference driven on REF, always powered
    InternalOutput = 7,
}

impl Reference {
    /// Decodes a raw 3-bit selection. Aliased selections map to the same variant.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 | 1 => Reference::Vdd,
            2 | 3 => Reference::External,
            4 | 5 => Reference::Internal,
            6 => Reference::InternalAutoShutdown,
            _ => Reference::InternalOutput,
        }
    }
}

impl From<Reference> for u8 {
    fn from(value: Reference) -> Self {
        value as u8
    }
}

/// Conversion clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal oscillator (default)
    #[default]
    Internal = 0,
    /// External clock on SCL
    External = 1,
}

impl ClockSource {
    /// Decodes the low bit of `bit`
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            ClockSource::External
        } else {
            ClockSource::Internal
        }
    }
}

/// Operating mode
///
/// Only affects differential conversions. Single-ended results are always
/// straight binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Input range 0 to VREF, binary output (default)
    #[default]
    Unipolar = 0,
    /// Input range -VREF/2 to +VREF/2, two's complement output
    Bipolar = 1,
}

impl OperatingMode {
    /// Decodes the low bit of `bit`
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            OperatingMode::Bipolar
        } else {
            OperatingMode::Unipolar
        }
    }
}

/// Configuration register reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigReset {
    /// Reset the configuration register to its power-on default
    Reset = 0,
    /// Leave the configuration register untouched (default)
    #[default]
    NoAction = 1,
}

impl ConfigReset {
    /// Decodes the low bit of `bit`
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            ConfigReset::NoAction
        } else {
            ConfigReset::Reset
        }
    }
}

/// Setup register (marker: bit 7 set)
///
/// # Important Notes
/// - The raw 3-bit SEL field is stored masked, see [`with_reference_bits`](Self::with_reference_bits)
/// - The operating mode written here decides how later differential
///   conversions are decoded
/// - Writing [`ConfigReset::Reset`] returns the configuration register to
///   its default, the driver does not track that side effect
#[register(0x80u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupRegister {
    /// Raw SEL field, always within 0..=7
    reference: u8,
    /// Conversion clock
    pub clock: ClockSource,
    /// Unipolar or bipolar operation
    pub mode: OperatingMode,
    /// Configuration register reset
    pub reset: ConfigReset,
}

impl SetupRegister {
    /// Builds a setup register from raw field values, truncating each to its width.
    pub const fn from_bits(reference: u8, clock: u8, mode: u8, reset: u8) -> Self {
        Self {
            reference: reference & 0b111,
            clock: ClockSource::from_bit(clock),
            mode: OperatingMode::from_bit(mode),
            reset: ConfigReset::from_bit(reset),
        }
    }

    /// Builds a setup register from raw field values, rejecting any value
    /// that does not fit its field.
    pub fn try_from_bits(reference: u8, clock: u8, mode: u8, reset: u8) -> Result<Self, FieldError> {
        Ok(Self::from_bits(
            check(Field::Reference, reference)?,
            check(Field::ClockSource, clock)?,
            check(Field::OperatingMode, mode)?,
            check(Field::Reset, reset)?,
        ))
    }

    /// Replaces the reference selection.
    pub fn with_reference(self, reference: Reference) -> Self {
        Self {
            reference: reference.into(),
            ..self
        }
    }

    /// Replaces the raw SEL field, truncated to 3 bits.
    pub const fn with_reference_bits(self, bits: u8) -> Self {
        Self {
            reference: bits & 0b111,
            ..self
        }
    }

    /// Replaces the operating mode.
    pub fn with_mode(self, mode: OperatingMode) -> Self {
        Self { mode, ..self }
    }

    /// Replaces the clock source.
    pub fn with_clock(self, clock: ClockSource) -> Self {
        Self { clock, ..self }
    }

    /// Replaces the configuration reset flag.
    pub fn with_reset(self, reset: ConfigReset) -> Self {
        Self { reset, ..self }
    }

    /// Decoded reference selection
    pub fn reference(&self) -> Reference {
        Reference::from_bits(self.reference)
    }

    /// Raw SEL field
    pub fn reference_bits(&self) -> u8 {
        self.reference
    }

    /// Single-bit options as flags
    pub fn flags(&self) -> SetupFlags {
        let mut flags = SetupFlags::empty();
        flags.set(SetupFlags::EXTERNAL_CLOCK, self.clock == ClockSource::External);
        flags.set(SetupFlags::BIPOLAR, self.mode == OperatingMode::Bipolar);
        flags.set(SetupFlags::NO_RESET, self.reset == ConfigReset::NoAction);
        flags
    }
}

impl ToByteArray for SetupRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([Self::id() | (self.reference << 4) | self.flags().bits()])
    }
}
