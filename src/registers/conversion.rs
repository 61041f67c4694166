//! Conversion results
//!
//! Each result is sent as two bytes, MSB first. The high byte carries four
//! leading ones followed by the top nibble of the 12-bit code.

use core::convert::Infallible;

use regiface::FromByteArray;

use super::{InputMode, OperatingMode};

/// Output coding of a conversion result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Coding {
    /// Straight binary, 0 to 4095
    #[default]
    Binary,
    /// Two's complement, -2048 to 2047
    TwosComplement,
}

impl Coding {
    /// Coding the device uses for the given modes.
    ///
    /// Only bipolar differential conversions are two's complement.
    pub const fn for_modes(mode: OperatingMode, input: InputMode) -> Self {
        match (mode, input) {
            (OperatingMode::Bipolar, InputMode::Differential) => Coding::TwosComplement,
            _ => Coding::Binary,
        }
    }
}

/// Raw 12-bit conversion result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConversionResult {
    /// 12-bit output code
    pub code: u16,
}

impl ConversionResult {
    /// Mask of the valid result bits
    pub const MASK: u16 = 0x0FFF;
    /// Sign bit under two's complement coding
    pub const SIGN: u16 = 0x0800;

    /// Interprets the code with the given coding.
    pub const fn decode(self, coding: Coding) -> i16 {
        let code = self.code & Self::MASK;
        match coding {
            Coding::Binary => code as i16,
            Coding::TwosComplement => (code & !Self::SIGN) as i16 - (code & Self::SIGN) as i16,
        }
    }
}

impl FromByteArray for ConversionResult {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            code: u16::from_be_bytes(bytes) & Self::MASK,
        })
    }
}
