//! Sensor identity checks
//!
//! The identity registers live on register page 0. The driver selects that
//! page, reads the device and revision ids, then switches back to the page
//! the firmware runs on.

use crate::bus::I2cBus;
use crate::error::{Error, Result};
use crate::protocol;

/// Page select register
pub const PAGE_SELECT: u16 = 0x7FFF;

/// Page holding the identity registers
pub const PAGE_IDENTITY: u8 = 0x00;

/// Page the driver normally operates on
pub const PAGE_DEFAULT: u8 = 0x02;

/// Device id register (page 0)
pub const DEVICE_ID_REG: u16 = 0x0000;

/// Revision id register (page 0)
pub const REVISION_ID_REG: u16 = 0x0001;

/// Device id reported by a VL53L7CX
pub const EXPECTED_DEVICE_ID: u8 = 0xF0;

/// Revision id reported by a VL53L7CX
pub const EXPECTED_REVISION_ID: u8 = 0x02;

/// Identity registers as read from the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorId {
    /// Device id register value
    pub device_id: u8,
    /// Revision id register value
    pub revision_id: u8,
}

impl SensorId {
    /// True if the ids match a VL53L7CX
    pub fn is_vl53l7cx(&self) -> bool {
        self.device_id == EXPECTED_DEVICE_ID && self.revision_id == EXPECTED_REVISION_ID
    }
}

/// Select a register page
pub fn select_page<B: I2cBus + ?Sized>(bus: &mut B, page: u8) -> Result<()> {
    protocol::write_byte(bus, PAGE_SELECT, page)
}

/// Read the identity registers
///
/// Leaves the sensor on [`PAGE_DEFAULT`] when all transfers succeed.
pub fn read_identity<B: I2cBus + ?Sized>(bus: &mut B) -> Result<SensorId> {
    select_page(bus, PAGE_IDENTITY)?;
    let device_id = protocol::read_byte(bus, DEVICE_ID_REG)?;
    let revision_id = protocol::read_byte(bus, REVISION_ID_REG)?;
    select_page(bus, PAGE_DEFAULT)?;

    log::debug!(
        "sensor: device id 0x{:02X}, revision 0x{:02X}",
        device_id,
        revision_id
    );

    Ok(SensorId {
        device_id,
        revision_id,
    })
}

/// Check that a VL53L7CX answers on the bus
///
/// Returns the identity on success and [`Error::SensorNotDetected`] when the
/// device answers with unexpected ids.
pub fn check_alive<B: I2cBus + ?Sized>(bus: &mut B) -> Result<SensorId> {
    let id = read_identity(bus)?;
    if !id.is_vl53l7cx() {
        return Err(Error::SensorNotDetected {
            device_id: id.device_id,
            revision_id: id.revision_id,
        });
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Paged register file answering like the sensor's identity block
    struct PagedBus {
        page: u8,
        index: u16,
        device_id: u8,
        revision_id: u8,
        page_writes: Vec<u8>,
    }

    impl PagedBus {
        fn new(device_id: u8, revision_id: u8) -> Self {
            Self {
                page: PAGE_DEFAULT,
                index: 0,
                device_id,
                revision_id,
                page_writes: Vec::new(),
            }
        }
    }

    impl I2cBus for PagedBus {
        fn write(&mut self, data: &[u8]) -> Result<usize> {
            self.index = u16::from_be_bytes([data[0], data[1]]);
            if self.index == PAGE_SELECT && data.len() == 3 {
                self.page = data[2];
                self.page_writes.push(data[2]);
            }
            Ok(data.len())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            let value = match (self.page, self.index) {
                (PAGE_IDENTITY, DEVICE_ID_REG) => self.device_id,
                (PAGE_IDENTITY, REVISION_ID_REG) => self.revision_id,
                _ => 0,
            };
            buf.fill(value);
            Ok(buf.len())
        }

        fn address(&self) -> u8 {
            0x29
        }
    }

    #[test]
    fn test_check_alive() {
        let mut bus = PagedBus::new(0xF0, 0x02);
        let id = check_alive(&mut bus).unwrap();
        assert!(id.is_vl53l7cx());
        assert_eq!(bus.page_writes, [PAGE_IDENTITY, PAGE_DEFAULT]);
        assert_eq!(bus.page, PAGE_DEFAULT);
    }

    #[test]
    fn test_wrong_revision() {
        // VL53L8CX shares the device id but reports revision 0x0C
        let mut bus = PagedBus::new(0xF0, 0x0C);
        assert_eq!(
            check_alive(&mut bus),
            Err(Error::SensorNotDetected {
                device_id: 0xF0,
                revision_id: 0x0C
            })
        );
    }
}
