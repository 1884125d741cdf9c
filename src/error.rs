//! Our error types for the EPS driver.

use thiserror::Error;

pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Custom error type for SpaceLab EPS 2.0 communications.
///
/// Only transport failures are errors. Checksum and identity problems are reported through
/// [`Reading`](crate::types::Reading) and [`IdentityCheck`](crate::types::IdentityCheck) instead.
#[derive(Error, Debug)]
pub enum Error<E: embedded_hal::i2c::Error> {
    /// The I2C bus reported an error, e.g. the EPS did not acknowledge. The bus error is passed through untouched.
    #[error("I2C bus error: {0:?}")]
    Bus(E),
}

impl<E: embedded_hal::i2c::Error> Error<E> {
    /// The bus-independent kind of the underlying error.
    pub fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        match self {
            Error::Bus(err) => err.kind(),
        }
    }
}
