//! MAX11644/MAX11645 Device Interface
//!
//! This module provides a high-level interface for interacting with the MAX1164x ADCs
//! over I2C. It supports both synchronous and asynchronous operations.
//!
//! The interface is built around the `Device<I2C>` struct which wraps an I2C bus and
//! provides methods for:
//! - Writing the setup and configuration registers
//! - Reading one or more conversion results
//!
//! The device reports results as raw 12-bit codes and does not say how they are
//! coded. The driver remembers the operating mode from the last setup write and
//! the input mode from the last configuration write and decodes with those.
//!
//! # Example
//! ```no_run
//! use max1164x::{BusSpeed, ConfigRegister, Device, Reference, SetupRegister};
//!
//! fn read<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<i16, I2C::Error> {
//!     let mut device = Device::new(i2c, BusSpeed::Standard);
//!
//!     device.setup(SetupRegister::default().with_reference(Reference::Internal))?;
//!     device.config(ConfigRegister::from_bits(3, 1, 0))?;
//!
//!     device.read_sample()
//! }
//! ```

use core::convert::Infallible;

use regiface::{ByteArray, FromByteArray, WritableRegister};

use crate::registers::{
    Coding, ConfigRegister, ConversionResult, InputMode, OperatingMode, SetupRegister,
};

/// Factory programmed 7-bit I2C address
pub const ADDRESS: u8 = 0x36;

/// I2C clock speeds supported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusSpeed {
    /// 100 kHz standard mode (default)
    #[default]
    Standard,
    /// 400 kHz fast mode
    Fast,
    /// 1 MHz fast mode plus
    FastPlus,
}

impl BusSpeed {
    /// Clock frequency in Hz
    pub const fn frequency_hz(self) -> u32 {
        match self {
            BusSpeed::Standard => 100_000,
            BusSpeed::Fast => 400_000,
            BusSpeed::FastPlus => 1_000_000,
        }
    }
}

/// Error type for unsupported bus speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnsupportedSpeed(pub u32);

impl TryFrom<u32> for BusSpeed {
    type Error = UnsupportedSpeed;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            100_000 => Ok(BusSpeed::Standard),
            400_000 => Ok(BusSpeed::Fast),
            1_000_000 => Ok(BusSpeed::FastPlus),
            other => Err(UnsupportedSpeed(other)),
        }
    }
}

/// Main device interface for the MAX11644/MAX11645.
///
/// This struct wraps an I2C bus and provides methods to interact with the ADC.
/// It supports both synchronous operations through the embedded-hal traits and
/// asynchronous operations through embedded-hal-async.
///
/// Every operation issues exactly one bus transaction. Bus errors are returned
/// as reported by the bus, without retries.
pub struct Device<I2C> {
    i2c: I2C,
    speed: BusSpeed,
    mode: OperatingMode,
    input: InputMode,
}

impl<I2C> Device<I2C> {
    /// Creates a new Device instance wrapping the provided I2C bus.
    ///
    /// No bus traffic happens here. The session starts out unipolar and
    /// single-ended, matching the device's power-on state.
    ///
    /// # Arguments
    /// * `i2c` - An I2C bus implementing the required embedded-hal traits
    /// * `speed` - Clock speed the bus was configured with
    pub fn new(i2c: I2C, speed: BusSpeed) -> Self {
        Self {
            i2c,
            speed,
            mode: OperatingMode::Unipolar,
            input: InputMode::SingleEnded,
        }
    }

    /// Releases the underlying I2C bus.
    ///
    /// This method consumes the Device instance and returns the wrapped I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Clock speed given at construction
    pub fn bus_speed(&self) -> BusSpeed {
        self.speed
    }

    /// Operating mode written by the last successful setup
    pub fn operating_mode(&self) -> OperatingMode {
        self.mode
    }

    /// Input mode written by the last successful configuration
    pub fn input_mode(&self) -> InputMode {
        self.input
    }

    /// Coding applied to results read now
    pub fn coding(&self) -> Coding {
        Coding::for_modes(self.mode, self.input)
    }

    fn decode<const N: usize>(&self, raw: [[u8; 2]; N]) -> [i16; N] {
        let coding = self.coding();
        raw.map(|bytes| {
            let Ok(result) = ConversionResult::from_bytes(bytes);
            result.decode(coding)
        })
    }
}

impl<I2C> Device<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Writes a register to the device.
    ///
    /// The register's byte already carries the marker bit that selects the
    /// destination, so it is written as-is.
    ///
    /// # Errors
    /// Any error reported by the I2C bus
    pub fn write_register<R>(&mut self, register: R) -> Result<(), I2C::Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let Ok(raw_value) = register.to_bytes();

        #[cfg(feature = "defmt")]
        defmt::trace!("max1164x write {=[u8]:#04x}", raw_value.as_ref());

        self.i2c.write(ADDRESS, raw_value.as_ref())
    }

    /// Writes the setup register.
    ///
    /// On success the operating mode used for decoding becomes `setup.mode`.
    ///
    /// # Errors
    /// Any error reported by the I2C bus. The operating mode is left unchanged.
    pub fn setup(&mut self, setup: SetupRegister) -> Result<(), I2C::Error> {
        self.write_register(setup)?;
        self.mode = setup.mode;
        Ok(())
    }

    /// Writes the configuration register.
    ///
    /// On success the input mode used for decoding becomes `config.input`.
    ///
    /// # Errors
    /// Any error reported by the I2C bus. The input mode is left unchanged.
    pub fn config(&mut self, config: ConfigRegister) -> Result<(), I2C::Error> {
        self.write_register(config)?;
        self.input = config.input;
        Ok(())
    }

    /// Reads and decodes a single conversion result.
    ///
    /// # Errors
    /// Any error reported by the I2C bus
    pub fn read_sample(&mut self) -> Result<i16, I2C::Error> {
        let [sample] = self.read_samples::<1>()?;
        Ok(sample)
    }

    /// Reads and decodes `N` consecutive conversion results in one transaction.
    ///
    /// Results are returned in the order the device sent them.
    ///
    /// # Errors
    /// Any error reported by the I2C bus, including short reads
    pub fn read_samples<const N: usize>(&mut self) -> Result<[i16; N], I2C::Error> {
        const { assert!(N > 0, "at least one sample must be read") };

        let mut raw = [[0u8; 2]; N];
        self.i2c.read(ADDRESS, raw.as_flattened_mut())?;

        #[cfg(feature = "defmt")]
        defmt::trace!("max1164x read {=[u8]:#04x}", raw.as_flattened());

        Ok(self.decode(raw))
    }
}

impl<I2C> Device<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    /// Asynchronously writes a register to the device.
    ///
    /// This is the async version of [`write_register`](Device::write_register).
    pub async fn write_register_async<R>(&mut self, register: R) -> Result<(), I2C::Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let Ok(raw_value) = register.to_bytes();

        #[cfg(feature = "defmt")]
        defmt::trace!("max1164x write {=[u8]:#04x}", raw_value.as_ref());

        self.i2c.write(ADDRESS, raw_value.as_ref()).await
    }

    /// Asynchronously writes the setup register.
    ///
    /// This is the async version of [`setup`](Device::setup).
    pub async fn setup_async(&mut self, setup: SetupRegister) -> Result<(), I2C::Error> {
        self.write_register_async(setup).await?;
        self.mode = setup.mode;
        Ok(())
    }

    /// Asynchronously writes the configuration register.
    ///
    /// This is the async version of [`config`](Device::config).
    pub async fn config_async(&mut self, config: ConfigRegister) -> Result<(), I2C::Error> {
        self.write_register_async(config).await?;
        self.input = config.input;
        Ok(())
    }

    /// Asynchronously reads a single conversion result.
    ///
    /// This is the async version of [`read_sample`](Device::read_sample).
    pub async fn read_sample_async(&mut self) -> Result<i16, I2C::Error> {
        let [sample] = self.read_samples_async::<1>().await?;
        Ok(sample)
    }

    /// Asynchronously reads `N` conversion results.
    ///
    /// This is the async version of [`read_samples`](Device::read_samples).
    pub async fn read_samples_async<const N: usize>(&mut self) -> Result<[i16; N], I2C::Error> {
        const { assert!(N > 0, "at least one sample must be read") };

        let mut raw = [[0u8; 2]; N];
        self.i2c.read(ADDRESS, raw.as_flattened_mut()).await?;

        #[cfg(feature = "defmt")]
        defmt::trace!("max1164x read {=[u8]:#04x}", raw.as_flattened());

        Ok(self.decode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{Channel, Reference, ScanMode};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    fn block_on<F: core::future::Future>(fut: F) -> F::Output {
        // Simple blocking executor for tests
        use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn noop_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut fut = core::pin::pin!(fut);

        loop {
            if let Poll::Ready(output) = fut.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    #[test]
    fn new_does_not_touch_the_bus() {
        let device = Device::new(I2cMock::new(&[]), BusSpeed::Fast);
        assert_eq!(device.bus_speed().frequency_hz(), 400_000);
        assert_eq!(device.operating_mode(), OperatingMode::Unipolar);
        assert_eq!(device.input_mode(), InputMode::SingleEnded);
        assert_eq!(device.coding(), Coding::Binary);
        device.release().done();
    }

    #[test]
    fn bus_speed_from_hz() {
        assert_eq!(BusSpeed::try_from(100_000), Ok(BusSpeed::Standard));
        assert_eq!(BusSpeed::try_from(1_000_000), Ok(BusSpeed::FastPlus));
        assert_eq!(BusSpeed::try_from(3_400_000), Err(UnsupportedSpeed(3_400_000)));
    }

    #[test]
    fn end_to_end() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0xD0]),
            I2cTransaction::write(ADDRESS, vec![0x62]),
            I2cTransaction::read(ADDRESS, vec![0x08, 0x01]),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        device.setup(SetupRegister::from_bits(5, 0, 0, 0)).unwrap();
        device.config(ConfigRegister::from_bits(3, 1, 0)).unwrap();
        assert_eq!(device.read_sample(), Ok(2049));

        device.release().done();
    }

    #[test]
    fn default_registers() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x82]),
            I2cTransaction::write(ADDRESS, vec![0x01]),
            I2cTransaction::read(ADDRESS, vec![0x0F, 0xFF]),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        device.setup(SetupRegister::default()).unwrap();
        device.config(ConfigRegister::default()).unwrap();
        assert_eq!(device.read_sample(), Ok(4095));

        device.release().done();
    }

    #[test]
    fn bipolar_differential_is_signed() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x86]),
            I2cTransaction::write(ADDRESS, vec![0x60]),
            I2cTransaction::read(ADDRESS, vec![0x0F, 0xFF, 0x08, 0x00, 0x07, 0xFF]),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        device
            .setup(SetupRegister::default().with_mode(OperatingMode::Bipolar))
            .unwrap();
        device
            .config(
                ConfigRegister::default()
                    .with_scan(ScanMode::Single)
                    .with_input(InputMode::Differential),
            )
            .unwrap();
        assert_eq!(device.coding(), Coding::TwosComplement);
        assert_eq!(device.read_samples::<3>(), Ok([-1, -2048, 2047]));

        device.release().done();
    }

    #[test]
    fn bipolar_single_ended_is_unsigned() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x86]),
            I2cTransaction::read(ADDRESS, vec![0xFF, 0xFF]),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        device.setup(SetupRegister::from_bits(0, 0, 1, 1)).unwrap();
        assert_eq!(device.read_sample(), Ok(4095));

        device.release().done();
    }

    #[test]
    fn mode_follows_latest_setup() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x86]),
            I2cTransaction::write(ADDRESS, vec![0x60]),
            I2cTransaction::write(ADDRESS, vec![0x20]),
            I2cTransaction::write(ADDRESS, vec![0x82]),
            I2cTransaction::read(ADDRESS, vec![0x0F, 0xFF, 0x08, 0x00]),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        device.setup(SetupRegister::from_bits(0, 0, 1, 1)).unwrap();
        device.config(ConfigRegister::from_bits(3, 0, 0)).unwrap();
        device.config(ConfigRegister::from_bits(1, 0, 0)).unwrap();
        assert_eq!(device.operating_mode(), OperatingMode::Bipolar);
        device.setup(SetupRegister::from_bits(0, 0, 0, 1)).unwrap();

        assert_eq!(device.operating_mode(), OperatingMode::Unipolar);
        assert_eq!(device.input_mode(), InputMode::Differential);
        assert_eq!(device.read_samples::<2>(), Ok([4095, 2048]));

        device.release().done();
    }

    #[test]
    fn failed_write_keeps_session_state() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x86]).with_error(ErrorKind::Other),
            I2cTransaction::write(ADDRESS, vec![0x00]).with_error(ErrorKind::Other),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        assert_eq!(
            device.setup(SetupRegister::from_bits(0, 0, 1, 1)),
            Err(ErrorKind::Other)
        );
        assert_eq!(
            device.config(ConfigRegister::from_bits(0, 0, 0)),
            Err(ErrorKind::Other)
        );
        assert_eq!(device.operating_mode(), OperatingMode::Unipolar);
        assert_eq!(device.input_mode(), InputMode::SingleEnded);

        device.release().done();
    }

    #[test]
    fn read_error_is_propagated() {
        let expectations =
            [I2cTransaction::read(ADDRESS, vec![0x00, 0x00]).with_error(ErrorKind::Other)];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        assert_eq!(device.read_sample(), Err(ErrorKind::Other));

        device.release().done();
    }

    #[test]
    fn async_round() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0xF6]),
            I2cTransaction::write(ADDRESS, vec![0x02]),
            I2cTransaction::read(ADDRESS, vec![0x0F, 0xFE]),
            I2cTransaction::read(ADDRESS, vec![0x00, 0x05, 0x08, 0x00]),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::FastPlus);

        block_on(async {
            device
                .setup_async(
                    SetupRegister::default()
                        .with_reference(Reference::InternalOutput)
                        .with_mode(OperatingMode::Bipolar),
                )
                .await
                .unwrap();
            device
                .config_async(
                    ConfigRegister::default()
                        .with_channel(Channel::Ch1)
                        .with_input(InputMode::Differential),
                )
                .await
                .unwrap();
            assert_eq!(device.read_sample_async().await, Ok(-2));
            assert_eq!(device.read_samples_async::<2>().await, Ok([5, -2048]));
        });

        device.release().done();
    }

    #[test]
    fn async_errors_are_propagated() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x86]).with_error(ErrorKind::Other),
            I2cTransaction::write(ADDRESS, vec![0x00]).with_error(ErrorKind::Other),
            I2cTransaction::read(ADDRESS, vec![0x0F, 0xFF, 0x0F, 0xFF])
                .with_error(ErrorKind::Other),
        ];
        let mut device = Device::new(I2cMock::new(&expectations), BusSpeed::Standard);

        block_on(async {
            assert_eq!(
                device.setup_async(SetupRegister::from_bits(0, 0, 1, 1)).await,
                Err(ErrorKind::Other)
            );
            assert_eq!(
                device.config_async(ConfigRegister::from_bits(0, 0, 0)).await,
                Err(ErrorKind::Other)
            );
            assert_eq!(device.read_samples_async::<2>().await, Err(ErrorKind::Other));
        });

        assert_eq!(device.operating_mode(), OperatingMode::Unipolar);
        assert_eq!(device.input_mode(), InputMode::SingleEnded);

        device.release().done();
    }
}
