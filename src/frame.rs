//! Command and response frames exchanged with the EPS.
//!
//! Both frames have a fixed size, so they are plain byte arrays.

use crate::{
    crc::crc8,
    types::{Integrity, Reading},
};

/// Size of a [`CommandFrame`] in bytes.
pub const COMMAND_FRAME_LEN: usize = 2;

/// Size of a [`ResponseFrame`] in bytes.
pub const RESPONSE_FRAME_LEN: usize = 6;

/// Request to read one register: `[register, crc8(register)]`.
///
/// The EPS firmware notes mention a longer request carrying a 4 byte register index. That framing is not used, the
/// EPS has been observed to answer the 2 byte request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame([u8; COMMAND_FRAME_LEN]);

impl CommandFrame {
    pub fn new(register: u8) -> Self {
        Self([register, crc8(&[register])])
    }

    pub fn register(&self) -> u8 {
        self.0[0]
    }

    pub fn checksum(&self) -> u8 {
        self.0[1]
    }

    pub fn as_bytes(&self) -> &[u8; COMMAND_FRAME_LEN] {
        &self.0
    }
}

/// Answer to a [`CommandFrame`].
///
/// | Byte | Content                          |
/// |------|----------------------------------|
/// | 0    | Echoed register                  |
/// | 1..5 | Register value, big-endian `u32` |
/// | 5    | CRC8 over bytes 0..5             |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame([u8; RESPONSE_FRAME_LEN]);

impl ResponseFrame {
    pub fn from_bytes(bytes: [u8; RESPONSE_FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Build the response the EPS would send for `register` holding `value`. Used for emulating the EPS.
    pub fn encode(register: u8, value: u32) -> Self {
        let mut bytes = [0u8; RESPONSE_FRAME_LEN];
        bytes[0] = register;
        bytes[1..5].copy_from_slice(&value.to_be_bytes());
        bytes[5] = crc8(&bytes[..5]);
        Self(bytes)
    }

    /// Register index as echoed by the EPS. This is not compared against the request.
    pub fn echoed_register(&self) -> u8 {
        self.0[0]
    }

    pub fn value(&self) -> u32 {
        u32::from_be_bytes([self.0[1], self.0[2], self.0[3], self.0[4]])
    }

    pub fn received_checksum(&self) -> u8 {
        self.0[5]
    }

    pub fn computed_checksum(&self) -> u8 {
        crc8(&self.0[..5])
    }

    pub fn integrity(&self) -> Integrity {
        let expected = self.computed_checksum();
        let received = self.received_checksum();
        if expected == received {
            Integrity::Valid
        } else {
            Integrity::Mismatch { expected, received }
        }
    }

    /// Decode the value. A checksum mismatch does not prevent decoding, it is reported in the returned reading.
    pub fn decode(&self) -> Reading<u32> {
        Reading::new(self.value(), self.integrity())
    }

    pub fn as_bytes(&self) -> &[u8; RESPONSE_FRAME_LEN] {
        &self.0
    }
}
