//! Register definitions for the MAX11644/MAX11645
//! Generated from the MAX11644-MAX11645 datasheet
//!
//! The device has no register address space. Bit 7 of every written byte selects
//! the destination: set for the setup register, clear for the configuration
//! register. The register id used with `regiface` is that marker.
//!
//! Reads always return conversion data, see [`ConversionResult`].

mod config;
mod conversion;
mod setup;

pub use config::*;
pub use conversion::*;
pub use setup::*;

/// Register field named by a [`FieldError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Setup register reference selection (3 bits)
    Reference,
    /// Setup register clock source (1 bit)
    ClockSource,
    /// Setup register operating mode (1 bit)
    OperatingMode,
    /// Setup register configuration reset (1 bit)
    Reset,
    /// Configuration register scan mode (2 bits)
    Scan,
    /// Configuration register channel select (1 bit)
    Channel,
    /// Configuration register input mode (1 bit)
    InputMode,
}

impl Field {
    /// Largest value the field can hold
    pub const fn max(self) -> u8 {
        match self {
            Field::Reference => 0b111,
            Field::Scan => 0b11,
            _ => 0b1,
        }
    }
}

/// Error returned by the checked register constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// The value does not fit in the register field
    OutOfRange {
        /// Offending field
        field: Field,
        /// Value that was supplied
        value: u8,
    },
}

/// Check that `value` fits in `field`.
pub(crate) fn check(field: Field, value: u8) -> Result<u8, FieldError> {
    if value > field.max() {
        Err(FieldError::OutOfRange { field, value })
    } else {
        Ok(value)
    }
}
