//! Emulated sensor register file

use std::collections::VecDeque;

use vl53l7cx_core::bus::I2cBus;
use vl53l7cx_core::error::{Error, Result};
use vl53l7cx_core::sensor::{
    DEVICE_ID_REG, EXPECTED_DEVICE_ID, EXPECTED_REVISION_ID, PAGE_DEFAULT, PAGE_IDENTITY,
    PAGE_SELECT, REVISION_ID_REG,
};

/// Size of the emulated register space (full 16-bit index range)
const MEMORY_SIZE: usize = 0x1_0000;

/// Configuration for the dummy sensor
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// 7-bit bus address the sensor answers on
    pub address: u8,
    /// Value of the device id register
    pub device_id: u8,
    /// Value of the revision id register
    pub revision_id: u8,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            address: 0x29,
            device_id: EXPECTED_DEVICE_ID,
            revision_id: EXPECTED_REVISION_ID,
        }
    }
}

/// One recorded bus transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// A write transaction and the bytes it carried
    Write(Vec<u8>),
    /// A read transaction and the number of bytes requested
    Read(usize),
}

/// Fault applied to an upcoming transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The next write only accepts this many bytes
    ShortWrite(usize),
    /// The next read only returns this many bytes
    ShortRead(usize),
    /// The next transaction of either kind fails outright
    TransferError,
}

/// Dummy VL53L7CX
///
/// Emulates the sensor's register file behind the `I2cBus` trait. A write
/// sets the register index from its first two bytes and stores any remaining
/// bytes from there on; a read returns bytes from the current index on. The
/// page select register switches the identity registers in and out, like the
/// real device.
pub struct DummySensor {
    config: DummyConfig,
    memory: Vec<u8>,
    page: u8,
    index: u16,
    log: Vec<Transaction>,
    faults: VecDeque<Fault>,
}

impl DummySensor {
    /// Create a new dummy sensor with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            memory: vec![0; MEMORY_SIZE],
            page: PAGE_DEFAULT,
            index: 0,
            log: Vec::new(),
            faults: VecDeque::new(),
        }
    }

    /// Create a new dummy sensor with default configuration (a VL53L7CX at 0x29)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Currently selected register page
    pub fn page(&self) -> u8 {
        self.page
    }

    /// Get a reference to the register memory
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Get a mutable reference to the register memory
    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Transactions seen so far
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Forget recorded transactions
    pub fn clear_transactions(&mut self) {
        self.log.clear();
    }

    /// Queue a fault for an upcoming transaction
    pub fn inject(&mut self, fault: Fault) {
        self.faults.push_back(fault);
    }

    /// Pop the first queued fault that applies to a write or a read
    fn take_fault(&mut self, is_write: bool) -> Option<Fault> {
        let pos = self.faults.iter().position(|f| match f {
            Fault::ShortWrite(_) => is_write,
            Fault::ShortRead(_) => !is_write,
            Fault::TransferError => true,
        })?;
        self.faults.remove(pos)
    }

    fn load(&self, index: u16) -> u8 {
        if self.page == PAGE_IDENTITY {
            match index {
                DEVICE_ID_REG => return self.config.device_id,
                REVISION_ID_REG => return self.config.revision_id,
                _ => {}
            }
        }
        self.memory[index as usize]
    }

    fn store(&mut self, index: u16, value: u8) {
        if index == PAGE_SELECT {
            self.page = value;
            return;
        }
        self.memory[index as usize] = value;
    }
}

impl I2cBus for DummySensor {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let accepted = match self.take_fault(true) {
            Some(Fault::TransferError) => return Err(Error::TransferFailed),
            Some(Fault::ShortWrite(n)) => n.min(data.len()),
            _ => data.len(),
        };
        self.log.push(Transaction::Write(data.to_vec()));

        let data = &data[..accepted];
        if data.len() < 2 {
            return Ok(accepted);
        }
        self.index = u16::from_be_bytes([data[0], data[1]]);
        let mut index = self.index;
        for &byte in &data[2..] {
            self.store(index, byte);
            index = index.wrapping_add(1);
        }
        Ok(accepted)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let returned = match self.take_fault(false) {
            Some(Fault::TransferError) => return Err(Error::TransferFailed),
            Some(Fault::ShortRead(n)) => n.min(buf.len()),
            _ => buf.len(),
        };
        self.log.push(Transaction::Read(buf.len()));

        let mut index = self.index;
        for byte in buf.iter_mut().take(returned) {
            *byte = self.load(index);
            index = index.wrapping_add(1);
        }
        Ok(returned)
    }

    fn address(&self) -> u8 {
        self.config.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vl53l7cx_core::{protocol, sensor};

    #[test]
    fn test_identity() {
        let mut dev = DummySensor::new_default();
        let id = sensor::check_alive(&mut dev).unwrap();
        assert_eq!(id.device_id, 0xF0);
        assert_eq!(id.revision_id, 0x02);
        assert_eq!(dev.page(), PAGE_DEFAULT);
    }

    #[test]
    fn test_not_detected() {
        let mut dev = DummySensor::new(DummyConfig {
            revision_id: 0x0C,
            ..Default::default()
        });
        assert!(matches!(
            sensor::check_alive(&mut dev),
            Err(Error::SensorNotDetected {
                revision_id: 0x0C,
                ..
            })
        ));
    }

    #[test]
    fn test_write_then_read_back() {
        let mut dev = DummySensor::new_default();
        protocol::write_multi(&mut dev, 0x2C00, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        protocol::write_byte(&mut dev, 0x2C04, 0x42).unwrap();

        let mut buf = [0u8; 5];
        protocol::read_multi(&mut dev, 0x2C00, &mut buf).unwrap();
        assert_eq!(buf, [0xDE, 0xAD, 0xBE, 0xEF, 0x42]);
        assert_eq!(protocol::read_byte(&mut dev, 0x2C01).unwrap(), 0xAD);
    }

    #[test]
    fn test_transaction_log() {
        let mut dev = DummySensor::new_default();
        protocol::write_multi(&mut dev, 0x1234, &[1, 2]).unwrap();
        protocol::read_byte(&mut dev, 0x1234).unwrap();
        protocol::write_multi(&mut dev, 0x0100, &[]).unwrap();

        assert_eq!(
            dev.transactions(),
            &[
                Transaction::Write(vec![0x12, 0x34, 1, 2]),
                Transaction::Write(vec![0x12, 0x34]),
                Transaction::Read(1),
                Transaction::Write(vec![0x01, 0x00]),
            ]
        );
    }

    #[test]
    fn test_short_write_fault() {
        let mut dev = DummySensor::new_default();
        dev.inject(Fault::ShortWrite(1));
        assert_eq!(
            protocol::write_byte(&mut dev, 0x0010, 0x55),
            Err(Error::ShortWrite {
                expected: 3,
                actual: 1
            })
        );
        // Fault is consumed, the retry by the caller goes through
        protocol::write_byte(&mut dev, 0x0010, 0x55).unwrap();
        assert_eq!(dev.memory()[0x10], 0x55);
    }

    #[test]
    fn test_short_read_fault() {
        let mut dev = DummySensor::new_default();
        dev.inject(Fault::ShortRead(3));
        let mut buf = [0u8; 8];
        assert_eq!(
            protocol::read_multi(&mut dev, 0x0000, &mut buf),
            Err(Error::ShortRead {
                expected: 8,
                actual: 3
            })
        );
    }

    #[test]
    fn test_short_read_skips_writes() {
        let mut dev = DummySensor::new_default();
        dev.inject(Fault::ShortRead(0));
        // The index write is unaffected, the data read comes back empty
        assert_eq!(
            protocol::read_byte(&mut dev, 0x0000),
            Err(Error::ShortRead {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(dev.transactions().len(), 2);
    }

    #[test]
    fn test_transfer_error_fault() {
        let mut dev = DummySensor::new_default();
        dev.inject(Fault::TransferError);
        assert_eq!(
            protocol::write_multi(&mut dev, 0x0000, &[1]),
            Err(Error::TransferFailed)
        );
        assert!(dev.transactions().is_empty());
    }
}
