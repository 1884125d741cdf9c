//! This module contains the types returned by the EPS register reads.

use fugit::MillisDurationU32;

use crate::register::EXPECTED_DEVICE_ID;

/// Result of the checksum comparison on a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrity {
    /// The received CRC8 matched the one calculated over the response.
    Valid,
    /// The received CRC8 did not match. The value was still decoded, but it should not be trusted.
    Mismatch {
        /// CRC8 calculated over the first 5 response bytes.
        expected: u8,
        /// CRC8 sent by the EPS.
        received: u8,
    },
}

impl Integrity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Integrity::Valid)
    }
}

/// A value read from the EPS, together with whether its response passed the checksum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading<T> {
    pub value: T,
    pub integrity: Integrity,
}

impl<T> Reading<T> {
    pub fn new(value: T, integrity: Integrity) -> Self {
        Self { value, integrity }
    }

    /// Return the value only if the response checksum matched.
    pub fn trusted(self) -> Option<T> {
        self.integrity.is_valid().then_some(self.value)
    }

    /// Reinterpret the value, keeping the integrity of the response it came from.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        Reading {
            value: f(self.value),
            integrity: self.integrity,
        }
    }
}

/// Outcome of comparing the device ID register against [`EXPECTED_DEVICE_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityCheck {
    Match,
    Mismatch { found: u32 },
}

impl IdentityCheck {
    pub fn from_device_id(device_id: u32) -> Self {
        if device_id == EXPECTED_DEVICE_ID {
            IdentityCheck::Match
        } else {
            IdentityCheck::Mismatch { found: device_id }
        }
    }

    /// The device ID that was read.
    pub fn device_id(&self) -> u32 {
        match *self {
            IdentityCheck::Match => EXPECTED_DEVICE_ID,
            IdentityCheck::Mismatch { found } => found,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, IdentityCheck::Match)
    }
}

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f32 = 273.15;

/// Convert a Kelvin temperature to Celsius.
pub fn kelvin_to_celsius(kelvin: f32) -> f32 {
    kelvin - KELVIN_OFFSET
}

/// One pass over the telemetry registers, in the order they are read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub identity: Reading<IdentityCheck>,
    pub temperature_k: Reading<f32>,
    pub last_reset_cause: Reading<u32>,
    pub reset_count: Reading<u32>,
    pub main_bus_voltage_mv: Reading<u32>,
}

impl Telemetry {
    /// Whether every response in this snapshot passed its checksum.
    pub fn all_valid(&self) -> bool {
        self.identity.integrity.is_valid()
            && self.temperature_k.integrity.is_valid()
            && self.last_reset_cause.integrity.is_valid()
            && self.reset_count.integrity.is_valid()
            && self.main_bus_voltage_mv.integrity.is_valid()
    }

    pub fn temperature_c(&self) -> Reading<f32> {
        self.temperature_k.map(kelvin_to_celsius)
    }
}

/// Uptime of the EPS as reported by its time counter register.
pub type Uptime = MillisDurationU32;
