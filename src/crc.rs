//! CRC8 used to protect EPS command and response frames.

/// Initial value of the checksum accumulator.
pub const CRC8_INITIAL_VALUE: u8 = 0x00;

/// Generator polynomial, x^8 + x^2 + x + 1.
pub const CRC8_POLYNOMIAL: u8 = 0x07;

/// Calculate the CRC8 of `data`.
///
/// Polynomial `0x07`, initial value `0x00`, MSB first, no reflection and no final XOR. Any length is valid,
/// an empty slice gives `0x00`.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = CRC8_INITIAL_VALUE;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ CRC8_POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
