//! This module is used to define the registers on the EPS 2.0 and its fixed bus constants.

use strum_macros::{EnumIter, IntoStaticStr};

/// 7-bit I2C address of the EPS.
pub const EPS2_I2C_ADDRESS: u8 = 0x36;

/// Value of [`Eps2Register::DeviceId`] on a genuine EPS 2.0.
pub const EXPECTED_DEVICE_ID: u32 = 0xEEE2;

/// The EPS registers read by this driver. All registers are __R__ and hold a u32.
///
/// The EPS exposes more registers than listed here. [`read_register`](crate::eps::Eps2::read_register) accepts any
/// `u8` for those.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[repr(u8)]
pub enum Eps2Register {
    /// Time since the EPS booted, in milliseconds.
    TimeCounterMs = 0,
    /// Microcontroller temperature in Kelvin.
    UcTemperatureK = 1,
    /// Last reset cause.
    LastResetCause = 3,
    /// Reset counter.
    ResetCounter = 4,
    /// Main power bus voltage in millivolts.
    MainPowerBusVoltageMv = 18,
    /// Device ID. See [`EXPECTED_DEVICE_ID`].
    DeviceId = 48,
}

impl From<Eps2Register> for u8 {
    fn from(value: Eps2Register) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Eps2Register {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Eps2Register as R;
        match value {
            0 => Ok(R::TimeCounterMs),
            1 => Ok(R::UcTemperatureK),
            3 => Ok(R::LastResetCause),
            4 => Ok(R::ResetCounter),
            18 => Ok(R::MainPowerBusVoltageMv),
            48 => Ok(R::DeviceId),
            _ => Err(()),
        }
    }
}

/// Name of a register index for log output. Indices not in [`Eps2Register`] are "Unknown".
pub fn register_name(index: u8) -> &'static str {
    Eps2Register::try_from(index)
        .map(<&'static str>::from)
        .unwrap_or("Unknown")
}
