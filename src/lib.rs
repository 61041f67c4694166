#![cfg_attr(not(test), no_std)]
//! MAX1164x ADC Driver
//!
//! This crate provides a type-safe interface for the Maxim MAX11644 and MAX11645
//! low-power, 12-bit, 2-channel analog-to-digital converters with I2C interface.
//! Both parts share the factory programmed address `0x36` and differ only in
//! supply range, so one driver covers both.
//!
//! # Features
//! - 12-bit resolution, 2 single-ended or 1 differential input pair
//! - Internal reference, external reference or VDD
//! - Unipolar (binary) or bipolar (two's complement) differential conversions
//! - Internal or external (SCL) conversion clock
//! - I2C at 100kHz, 400kHz and 1MHz
//!
//! # Architecture
//! The driver is organized into two modules:
//!
//! - [`device`]: Main device interface for hardware interaction
//!   - Writes the setup and configuration registers
//!   - Reads and decodes conversion results
//!   - Tracks the modes that decide how results are decoded
//!
//! - [`registers`]: Register definitions
//!   - [`SetupRegister`]: reference, clock, unipolar/bipolar, configuration reset
//!   - [`ConfigRegister`]: scan mode, channel select, single-ended/differential
//!   - [`ConversionResult`]: raw 12-bit output code
//!
//! # Usage
//! The driver uses the `regiface` crate to describe its registers. The main
//! entry point is the [`Device`] struct which wraps an I2C bus and provides
//! methods for interacting with the ADC.
//!
//! Register fields can be given as raw numbers, which are truncated to the field
//! width ([`SetupRegister::from_bits`]), or checked ([`SetupRegister::try_from_bits`]).
//!
//! # Important Notes
//! - The device never reports its own configuration, the driver tracks it
//! - Results are two's complement only for bipolar differential conversions
//! - Resetting the configuration through the setup register is not tracked
//!
//! # Example
//! ```no_run
//! use embedded_hal::i2c::I2c;
//! use max1164x::{BusSpeed, ConfigRegister, Device, OperatingMode, SetupRegister};
//!
//! fn differential<I2C: I2c>(i2c: I2C) -> Result<[i16; 4], I2C::Error> {
//!     let mut device = Device::new(i2c, BusSpeed::Fast);
//!
//!     device.setup(SetupRegister::default().with_mode(OperatingMode::Bipolar))?;
//!     // AIN1 - AIN0, convert once per read
//!     device.config(ConfigRegister::from_bits(3, 1, 0))?;
//!
//!     device.read_samples::<4>()
//! }
//! ```

pub mod device;
pub mod registers;

pub use device::{BusSpeed, Device, UnsupportedSpeed, ADDRESS};
pub use registers::*;
