//! Probe the I2C bus for devices which acknowledge their address.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

/// First address probed. Lower addresses are reserved by the I2C specification.
pub const FIRST_ADDRESS: u8 = 0x08;

/// Last address probed. Higher addresses are reserved by the I2C specification.
pub const LAST_ADDRESS: u8 = 0x77;

/// Number of addresses probed, and so the most devices a scan can find.
pub const SCAN_CAPACITY: usize = (LAST_ADDRESS - FIRST_ADDRESS + 1) as usize;

pub type ScanResult = heapless::Vec<u8, SCAN_CAPACITY>;

/// Return every 7-bit address in [`FIRST_ADDRESS`]..=[`LAST_ADDRESS`] which acknowledges an empty write.
///
/// A missing acknowledge just means nothing lives at that address. Any other bus error stops the scan and is returned.
pub fn scan<I: I2c>(i2c: &mut I) -> Result<ScanResult, I::Error> {
    let mut found = ScanResult::new();
    for address in FIRST_ADDRESS..=LAST_ADDRESS {
        match i2c.write(address, &[]) {
            Ok(()) => {
                // Can't overflow, there is one slot per probed address.
                let _ = found.push(address);
            }
            Err(err) if matches!(err.kind(), ErrorKind::NoAcknowledge(_)) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(found)
}
