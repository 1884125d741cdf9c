//! We use this mocking module in unit tests to emulate an I2C bus with an EPS on it.

use core::cell::RefCell;
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, Operation};

use crate::frame::ResponseFrame;

/// Something that happened on the mock bus, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Write { address: u8, len: usize },
    Read { address: u8, len: usize },
    Delay { ns: u64 },
}

type Journal = Rc<RefCell<heapless::Vec<BusEvent, 128>>>;

/// Our mock type used to emulate an I2C bus.
pub struct MockI2c {
    /// Buffer to store data written to any device on the bus
    write_buffer: heapless::Vec<u8, 256>,
    /// Buffer containing pre-configured response data to be read
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer
    read_position: usize,
    /// Addresses which acknowledge
    devices: heapless::Vec<u8, 8>,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
    /// Shared with any [MockDelay] created from this bus
    journal: Journal,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MockI2cError {
    /// Generic simulated bus error
    Bus,
    /// Nothing acknowledged the address
    NoAcknowledge,
    /// Simulated buffer overflow
    BufferOverflow,
    /// A read was requested but no response data was loaded
    NoData,
}

impl embedded_hal::i2c::Error for MockI2cError {
    fn kind(&self) -> ErrorKind {
        match self {
            MockI2cError::Bus => ErrorKind::Bus,
            MockI2cError::NoAcknowledge => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            MockI2cError::BufferOverflow => ErrorKind::Overrun,
            MockI2cError::NoData => ErrorKind::Other,
        }
    }
}

impl embedded_hal::i2c::ErrorType for MockI2c {
    type Error = MockI2cError;
}

impl embedded_hal::i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.handle_write(address, bytes)?,
                Operation::Read(buf) => self.handle_read(address, buf)?,
            }
        }
        Ok(())
    }
}

impl MockI2c {
    /// Create a new MockI2c instance with no devices on the bus
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            devices: heapless::Vec::new(),
            should_error_on_write: false,
            should_error_on_read: false,
            journal: Rc::new(RefCell::new(heapless::Vec::new())),
        }
    }

    /// Create a bus with a single device which acknowledges `address`
    pub fn with_device(address: u8) -> Self {
        let mut mock = Self::new();
        mock.devices.push(address).unwrap();
        mock
    }

    /// Create a delay provider which logs into this bus' event journal
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            journal: self.journal.clone(),
        }
    }

    /// Make `address` acknowledge
    pub fn add_device(&mut self, address: u8) -> Result<(), MockI2cError> {
        self.devices
            .push(address)
            .map_err(|_| MockI2cError::BufferOverflow)
    }

    /// Set the data that will be returned by reads, replacing anything loaded before
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockI2cError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockI2cError::BufferOverflow)
    }

    /// Append a response frame after any data already loaded
    pub fn queue_response(&mut self, frame: &ResponseFrame) -> Result<(), MockI2cError> {
        self.read_buffer
            .extend_from_slice(frame.as_bytes())
            .map_err(|_| MockI2cError::BufferOverflow)
    }

    /// Get a reference to the data that was written to the bus
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Number of loaded bytes which have not been read yet
    pub fn unread_len(&self) -> usize {
        self.read_buffer.len() - self.read_position
    }

    /// Everything that happened on the bus and its delays so far
    pub fn events(&self) -> heapless::Vec<BusEvent, 128> {
        self.journal.borrow().clone()
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }

    fn log(&self, event: BusEvent) {
        // Long scans can fill the journal, later events are dropped.
        let _ = self.journal.borrow_mut().push(event);
    }

    fn handle_write(&mut self, address: u8, bytes: &[u8]) -> Result<(), MockI2cError> {
        if self.should_error_on_write {
            return Err(MockI2cError::Bus);
        }
        if !self.devices.contains(&address) {
            return Err(MockI2cError::NoAcknowledge);
        }
        self.write_buffer
            .extend_from_slice(bytes)
            .map_err(|_| MockI2cError::BufferOverflow)?;
        self.log(BusEvent::Write {
            address,
            len: bytes.len(),
        });
        Ok(())
    }

    fn handle_read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), MockI2cError> {
        if self.should_error_on_read {
            return Err(MockI2cError::Bus);
        }
        if !self.devices.contains(&address) {
            return Err(MockI2cError::NoAcknowledge);
        }
        if self.unread_len() < buf.len() {
            return Err(MockI2cError::NoData);
        }
        let end = self.read_position + buf.len();
        buf.copy_from_slice(&self.read_buffer[self.read_position..end]);
        self.read_position = end;
        self.log(BusEvent::Read {
            address,
            len: buf.len(),
        });
        Ok(())
    }
}

/// Delay provider which does not sleep, it only records how long it was asked to wait.
pub struct MockDelay {
    journal: Journal,
}

impl MockDelay {
    fn log(&self, ns: u64) {
        let _ = self.journal.borrow_mut().push(BusEvent::Delay { ns });
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.log(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log(ms as u64 * 1_000_000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::delay::DelayNs;
    use embedded_hal::i2c::{Error, I2c};

    #[test]
    fn test_new_mock_i2c() {
        let mock = MockI2c::new();
        assert_eq!(mock.written_data().len(), 0);
        assert_eq!(mock.unread_len(), 0);
        assert!(mock.events().is_empty());
    }

    #[test]
    fn test_write_data() {
        let mut mock = MockI2c::with_device(0x36);
        mock.write(0x36, &[0x30, 0x90]).unwrap();
        mock.write(0x36, &[0x01]).unwrap();
        assert_eq!(mock.written_data(), &[0x30, 0x90, 0x01]);
        assert_eq!(
            mock.events().as_slice(),
            &[
                BusEvent::Write {
                    address: 0x36,
                    len: 2
                },
                BusEvent::Write {
                    address: 0x36,
                    len: 1
                },
            ]
        );
    }

    #[test]
    fn test_absent_device_nacks() {
        let mut mock = MockI2c::with_device(0x36);
        let result = mock.write(0x37, &[0x00]);
        assert_eq!(result, Err(MockI2cError::NoAcknowledge));
        assert!(matches!(
            MockI2cError::NoAcknowledge.kind(),
            ErrorKind::NoAcknowledge(_)
        ));

        let mut buffer = [0u8; 1];
        assert_eq!(
            mock.read(0x37, &mut buffer),
            Err(MockI2cError::NoAcknowledge)
        );
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn test_read_data_in_sequence() {
        let mut mock = MockI2c::with_device(0x36);
        mock.set_read_data(b"Hello World").unwrap();

        let mut buffer1 = [0u8; 5];
        let mut buffer2 = [0u8; 6];
        mock.read(0x36, &mut buffer1).unwrap();
        mock.read(0x36, &mut buffer2).unwrap();

        assert_eq!(&buffer1, b"Hello");
        assert_eq!(&buffer2, b" World");
        assert_eq!(mock.unread_len(), 0);
    }

    #[test]
    fn test_read_without_data() {
        let mut mock = MockI2c::with_device(0x36);
        mock.set_read_data(b"Hi").unwrap();

        let mut buffer = [0u8; 6];
        assert_eq!(mock.read(0x36, &mut buffer), Err(MockI2cError::NoData));
    }

    #[test]
    fn test_queue_response_appends() {
        let mut mock = MockI2c::with_device(0x36);
        mock.queue_response(&ResponseFrame::encode(1, 300)).unwrap();
        mock.queue_response(&ResponseFrame::encode(4, 2)).unwrap();
        assert_eq!(mock.unread_len(), 12);

        let mut buffer = [0u8; 6];
        mock.read(0x36, &mut buffer).unwrap();
        assert_eq!(buffer, *ResponseFrame::encode(1, 300).as_bytes());
    }

    #[test]
    fn test_set_read_data_buffer_overflow() {
        let mut mock = MockI2c::new();
        let result = mock.set_read_data(&[0u8; 300]);
        assert_eq!(result, Err(MockI2cError::BufferOverflow));
    }

    #[test]
    fn test_error_flags_toggle() {
        let mut mock = MockI2c::with_device(0x36);

        mock.set_write_error(true);
        assert_eq!(mock.write(0x36, b"test"), Err(MockI2cError::Bus));
        mock.set_write_error(false);
        assert!(mock.write(0x36, b"test").is_ok());

        mock.set_read_data(b"data").unwrap();
        let mut buffer = [0u8; 4];
        mock.set_read_error(true);
        assert_eq!(mock.read(0x36, &mut buffer), Err(MockI2cError::Bus));
        mock.set_read_error(false);
        assert!(mock.read(0x36, &mut buffer).is_ok());
    }

    #[test]
    fn test_delay_is_journaled() {
        let mut mock = MockI2c::with_device(0x36);
        let mut delay = mock.delay();

        mock.write(0x36, &[0x01]).unwrap();
        delay.delay_ms(50);
        delay.delay_us(3);

        assert_eq!(
            mock.events().as_slice(),
            &[
                BusEvent::Write {
                    address: 0x36,
                    len: 1
                },
                BusEvent::Delay { ns: 50_000_000 },
                BusEvent::Delay { ns: 3_000 },
            ]
        );
    }
}
