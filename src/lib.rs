//! This crate provides a driver for reading telemetry from the SpaceLab EPS 2.0 power management module.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! The EPS answers register reads over I2C at 7-bit address `0x36`. Each read is a request/response pair:
//! * Command, 2 bytes: `[register, crc8(register)]`.
//! * Wait 50ms for the EPS to prepare its answer.
//! * Response, 6 bytes: `[register, value (big-endian u32), crc8(first 5 bytes)]`.
//!
//! Registers which are read by this driver:
//! * Time counter (ms)
//! * Microcontroller temperature (K)
//! * Last reset cause
//! * Reset counter
//! * Main power bus voltage (mV)
//! * Device ID (expected `0xEEE2`)
//!
//! Any I2C bus implementing [embedded_hal::i2c::I2c] and delay implementing [embedded_hal::delay::DelayNs] can be
//! used. The protocol is read-only.
//!
//! A checksum mismatch on a response does not fail the read. Every read returns a [types::Reading] which carries the
//! decoded value together with its [types::Integrity], so callers can tell a trustworthy value from a best-effort one.

#![cfg_attr(feature = "no-std", no_std)]

// The test doubles and log capture need std, even when the library itself is built without it.
#[cfg(all(test, feature = "no-std"))]
extern crate std;

pub mod crc;
pub mod eps;
pub mod error;
pub mod frame;
pub mod register;
pub mod scan;
pub mod types;

#[cfg(test)]
mod mock_i2c;
