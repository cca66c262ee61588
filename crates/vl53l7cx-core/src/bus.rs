//! Two-wire bus trait and address helpers
//!
//! [`I2cBus`] is the seam between the register transport and a host bus
//! controller. It deliberately reports how many bytes each transaction moved
//! instead of hiding partial transfers, because the transport treats any
//! count mismatch as a failure.

use crate::error::{Error, Result};

/// Default sensor address in the vendor's 8-bit convention
pub const DEFAULT_ADDRESS: u16 = 0x52;

/// Highest valid 7-bit bus address
pub const MAX_7BIT_ADDRESS: u8 = 0x7F;

/// Convert an address in the vendor's 8-bit convention to a 7-bit bus address
///
/// The vendor driver stores the address shifted left by one, so the bus
/// address is `address >> 1`. Fails with [`Error::InvalidAddress`] when the
/// result does not fit in 7 bits.
pub fn seven_bit_address(address: u16) -> Result<u8> {
    let addr = address >> 1;
    if addr > MAX_7BIT_ADDRESS as u16 {
        return Err(Error::InvalidAddress(address));
    }
    Ok(addr as u8)
}

/// A bus session bound to a single target device
///
/// Each call is one bus transaction bounded by start/stop. Implementations
/// return the number of bytes actually transferred; they should only return
/// `Err` when the transfer could not be attempted or failed outright.
pub trait I2cBus {
    /// Write `data` to the target in a single transaction
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read into `buf` from the target in a single transaction
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// 7-bit address of the target this session talks to
    fn address(&self) -> u8;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn address(&self) -> u8 {
        (**self).address()
    }
}

// Boxed buses let the platform registry hand out trait objects
impl I2cBus for alloc::boxed::Box<dyn I2cBus + Send> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn address(&self) -> u8 {
        (**self).address()
    }
}
