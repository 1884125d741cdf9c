use embedded_hal::{delay::DelayNs, i2c::I2c};
use fugit::MillisDurationU32;
use tracing::{debug, error, info, warn};

use crate::{
    error::{Error, Result},
    frame::{CommandFrame, RESPONSE_FRAME_LEN, ResponseFrame},
    register::{EPS2_I2C_ADDRESS, Eps2Register, register_name},
    scan::{self, ScanResult},
    types::{IdentityCheck, Integrity, Reading, Telemetry, Uptime, kelvin_to_celsius},
};

/// You can create an Eps2 using any bus which implements [embedded_hal::i2c::I2c] and any delay which implements
/// [embedded_hal::delay::DelayNs].
///
/// The driver owns both for its lifetime. Use [Self::release] to get them back.
///
/// For its methods, "read" means a single register transaction. Every read returns a [Reading], which still holds
/// the value when the response checksum did not match.
pub struct Eps2<I: I2c, D: DelayNs> {
    i2c: I,
    delay: D,
    /// Default for the EPS is 0x36.
    address: u8,
}

impl<I: I2c, D: DelayNs> Eps2<I, D> {
    /// Time the EPS needs between receiving a command and having its response ready.
    ///
    /// The EPS has no "ready" signal, so this is a fixed wait.
    pub const SETTLE_DELAY: MillisDurationU32 = MillisDurationU32::from_ticks(50);

    /// Create a new Eps2 instance talking to the default EPS address.
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, EPS2_I2C_ADDRESS)
    }

    /// Create a new Eps2 instance talking to a custom 7-bit address.
    pub fn with_address(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Destroy the driver, returning the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    /// Return the device ID. Should be [`EXPECTED_DEVICE_ID`](crate::register::EXPECTED_DEVICE_ID).
    pub fn read_device_id(&mut self) -> Result<Reading<u32>, I::Error> {
        self.read_register(Eps2Register::DeviceId)
    }

    /// Read the device ID and compare it with the expected one.
    ///
    /// A different ID is only logged. It is up to the caller whether to keep talking to the device.
    pub fn verify_device_id(&mut self) -> Result<Reading<IdentityCheck>, I::Error> {
        let identity = self
            .read_device_id()?
            .map(IdentityCheck::from_device_id);
        if let IdentityCheck::Mismatch { found } = identity.value {
            warn!("Unexpected device ID 0x{:04X}! Continuing.", found);
        }
        Ok(identity)
    }

    /// Return the cause of the last EPS reset.
    pub fn read_reset_cause(&mut self) -> Result<Reading<u32>, I::Error> {
        self.read_register(Eps2Register::LastResetCause)
    }

    /// Return how many times the EPS has reset.
    pub fn read_reset_count(&mut self) -> Result<Reading<u32>, I::Error> {
        self.read_register(Eps2Register::ResetCounter)
    }

    /// Return the main power bus voltage in millivolts.
    pub fn read_bus_voltage_mv(&mut self) -> Result<Reading<u32>, I::Error> {
        self.read_register(Eps2Register::MainPowerBusVoltageMv)
    }

    /// Return the EPS microcontroller temperature in Kelvin.
    ///
    /// The register holds whole Kelvin, no scaling is applied.
    pub fn read_temperature_k(&mut self) -> Result<Reading<f32>, I::Error> {
        let raw = self.read_register(Eps2Register::UcTemperatureK)?;
        Ok(raw.map(|kelvin| kelvin as f32))
    }

    /// Return the EPS microcontroller temperature in Celsius.
    pub fn read_temperature_c(&mut self) -> Result<Reading<f32>, I::Error> {
        Ok(self.read_temperature_k()?.map(kelvin_to_celsius))
    }

    /// Return how long the EPS has been running.
    pub fn read_time_counter(&mut self) -> Result<Reading<Uptime>, I::Error> {
        let raw = self.read_register(Eps2Register::TimeCounterMs)?;
        Ok(raw.map(Uptime::millis))
    }

    /// Read the usual set of telemetry registers, one after the other.
    ///
    /// Checksum and identity problems are recorded in the snapshot. A bus error stops the snapshot.
    pub fn read_telemetry(&mut self) -> Result<Telemetry, I::Error> {
        let identity = self.verify_device_id()?;
        let temperature_k = self.read_temperature_k()?;
        let last_reset_cause = self.read_reset_cause()?;
        let reset_count = self.read_reset_count()?;
        let main_bus_voltage_mv = self.read_bus_voltage_mv()?;

        Ok(Telemetry {
            identity,
            temperature_k,
            last_reset_cause,
            reset_count,
            main_bus_voltage_mv,
        })
    }

    /// Look for devices on the bus, logging what was found.
    ///
    /// A failed scan is logged and gives `None`.
    pub fn scan_bus(&mut self) -> Option<ScanResult> {
        info!("Scanning I2C bus...");
        match scan::scan(&mut self.i2c) {
            Ok(devices) => {
                if devices.is_empty() {
                    info!("No I2C devices found");
                } else {
                    info!("Found {} device(s): {:02X?}", devices.len(), devices.as_slice());
                }
                Some(devices)
            }
            Err(err) => {
                error!("I2C scan error: {:?}", err);
                None
            }
        }
    }

    /// Read a single register from the EPS.
    ///
    /// Any `u8` register index is sent as is. Bus errors are returned, there are no retries.
    pub fn read_register(&mut self, register: impl Into<u8>) -> Result<Reading<u32>, I::Error> {
        let command = CommandFrame::new(register.into());
        debug!(
            "Reading register {} ({}), writing: {:02X?}",
            command.register(),
            register_name(command.register()),
            command.as_bytes()
        );

        self.i2c
            .write(self.address, command.as_bytes())
            .map_err(Error::Bus)?;

        self.delay.delay_ms(Self::SETTLE_DELAY.to_millis());

        let mut buff = [0u8; RESPONSE_FRAME_LEN];
        self.i2c
            .read(self.address, &mut buff)
            .map_err(Error::Bus)?;
        debug!("Raw data (from EPS): {:02X?}", buff);

        let response = ResponseFrame::from_bytes(buff);
        let reading = response.decode();
        if let Integrity::Mismatch { expected, received } = reading.integrity {
            warn!(
                "CRC mismatch on read of register {}! Expected 0x{:02X}, received 0x{:02X}. Continuing.",
                command.register(),
                expected,
                received
            );
        }
        Ok(reading)
    }
}
