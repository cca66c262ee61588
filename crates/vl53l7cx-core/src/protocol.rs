//! Register transport
//!
//! The VL53L7CX exposes a 16-bit register index space. Every access starts
//! with the index sent most-significant byte first, regardless of host
//! endianness:
//!
//! - **Reads** write the 2-byte index as one transaction, then read the data
//!   as a second transaction.
//! - **Writes** send index and data as one contiguous frame. Some controllers
//!   and targets require address and data without an intervening stop
//!   condition, so the frame is never split.
//!
//! Any transaction that moves a different number of bytes than framed fails
//! the whole operation. Nothing here retries.

use alloc::vec::Vec;

use crate::bus::I2cBus;
use crate::error::{Error, Result};

/// Size of the register index on the wire
pub const INDEX_LEN: usize = 2;

/// Encode a register index in wire order
#[inline]
pub fn encode_index(reg: u16) -> [u8; INDEX_LEN] {
    reg.to_be_bytes()
}

/// Build a single write frame: `[reg_hi, reg_lo, data..]`
pub fn write_frame(reg: u16, data: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(INDEX_LEN + data.len());
    frame.extend_from_slice(&encode_index(reg));
    frame.extend_from_slice(data);
    frame
}

/// Write `frame` as one transaction and require every byte to be accepted
fn write_exact<B: I2cBus + ?Sized>(bus: &mut B, frame: &[u8]) -> Result<()> {
    let written = bus.write(frame)?;
    if written != frame.len() {
        log::trace!(
            "i2c 0x{:02X}: short write {}/{}",
            bus.address(),
            written,
            frame.len()
        );
        return Err(Error::ShortWrite {
            expected: frame.len(),
            actual: written,
        });
    }
    Ok(())
}

/// Fill `buf` with one read transaction and require it to be filled
fn read_exact<B: I2cBus + ?Sized>(bus: &mut B, buf: &mut [u8]) -> Result<()> {
    let read = bus.read(buf)?;
    if read != buf.len() {
        log::trace!(
            "i2c 0x{:02X}: short read {}/{}",
            bus.address(),
            read,
            buf.len()
        );
        return Err(Error::ShortRead {
            expected: buf.len(),
            actual: read,
        });
    }
    Ok(())
}

/// Read a single register byte
pub fn read_byte<B: I2cBus + ?Sized>(bus: &mut B, reg: u16) -> Result<u8> {
    let mut value = [0u8; 1];
    read_multi(bus, reg, &mut value)?;
    Ok(value[0])
}

/// Write a single register byte as one 3-byte transaction
pub fn write_byte<B: I2cBus + ?Sized>(bus: &mut B, reg: u16, value: u8) -> Result<()> {
    let [hi, lo] = encode_index(reg);
    log::trace!("i2c 0x{:02X}: wr 0x{:04X} <- 0x{:02X}", bus.address(), reg, value);
    write_exact(bus, &[hi, lo, value])
}

/// Read `buf.len()` bytes starting at `reg`
///
/// An empty `buf` still sends the index, followed by a zero-length read.
pub fn read_multi<B: I2cBus + ?Sized>(bus: &mut B, reg: u16, buf: &mut [u8]) -> Result<()> {
    log::trace!(
        "i2c 0x{:02X}: rd 0x{:04X} ({} bytes)",
        bus.address(),
        reg,
        buf.len()
    );
    write_exact(bus, &encode_index(reg))?;
    read_exact(bus, buf)
}

/// Write `data` starting at `reg` as a single `data.len() + 2` byte frame
///
/// An empty `data` degenerates to an index-only transaction.
pub fn write_multi<B: I2cBus + ?Sized>(bus: &mut B, reg: u16, data: &[u8]) -> Result<()> {
    log::trace!(
        "i2c 0x{:02X}: wr 0x{:04X} ({} bytes)",
        bus.address(),
        reg,
        data.len()
    );
    let frame = write_frame(reg, data);
    write_exact(bus, &frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Debug, PartialEq)]
    enum Op {
        Write(Vec<u8>),
        Read(usize),
    }

    /// Bus that records transactions and can truncate them
    #[derive(Default)]
    struct MockBus {
        ops: Vec<Op>,
        read_data: Vec<u8>,
        write_limit: Option<usize>,
        read_limit: Option<usize>,
        fail: bool,
    }

    impl I2cBus for MockBus {
        fn write(&mut self, data: &[u8]) -> Result<usize> {
            if self.fail {
                return Err(Error::TransferFailed);
            }
            self.ops.push(Op::Write(data.to_vec()));
            Ok(self.write_limit.map_or(data.len(), |l| l.min(data.len())))
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            self.ops.push(Op::Read(buf.len()));
            let n = self.read_limit.map_or(buf.len(), |l| l.min(buf.len()));
            for (i, b) in buf.iter_mut().take(n).enumerate() {
                *b = self.read_data.get(i).copied().unwrap_or(0);
            }
            Ok(n)
        }

        fn address(&self) -> u8 {
            0x29
        }
    }

    #[test]
    fn test_read_byte_framing() {
        let mut bus = MockBus {
            read_data: vec![0xA5],
            ..Default::default()
        };
        assert_eq!(read_byte(&mut bus, 0x1234).unwrap(), 0xA5);
        assert_eq!(bus.ops, vec![Op::Write(vec![0x12, 0x34]), Op::Read(1)]);
    }

    #[test]
    fn test_write_byte_framing() {
        let mut bus = MockBus::default();
        write_byte(&mut bus, 0x1234, 0x7F).unwrap();
        assert_eq!(bus.ops, vec![Op::Write(vec![0x12, 0x34, 0x7F])]);
    }

    #[test]
    fn test_write_multi_single_transaction() {
        let mut bus = MockBus::default();
        write_multi(&mut bus, 0x2C04, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(bus.ops, vec![Op::Write(vec![0x2C, 0x04, 1, 2, 3, 4, 5])]);
    }

    #[test]
    fn test_write_multi_empty() {
        let mut bus = MockBus::default();
        write_multi(&mut bus, 0x7FFF, &[]).unwrap();
        assert_eq!(bus.ops, vec![Op::Write(vec![0x7F, 0xFF])]);
    }

    #[test]
    fn test_read_multi() {
        let mut bus = MockBus {
            read_data: vec![9, 8, 7, 6],
            ..Default::default()
        };
        let mut buf = [0u8; 4];
        read_multi(&mut bus, 0x0000, &mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7, 6]);
        assert_eq!(bus.ops, vec![Op::Write(vec![0x00, 0x00]), Op::Read(4)]);
    }

    #[test]
    fn test_read_multi_empty() {
        let mut bus = MockBus::default();
        let mut buf = [0u8; 0];
        read_multi(&mut bus, 0x0100, &mut buf).unwrap();
        assert_eq!(bus.ops, vec![Op::Write(vec![0x01, 0x00]), Op::Read(0)]);
    }

    #[test]
    fn test_short_index_write() {
        let mut bus = MockBus {
            write_limit: Some(1),
            ..Default::default()
        };
        assert_eq!(
            read_byte(&mut bus, 0x0001),
            Err(Error::ShortWrite {
                expected: 2,
                actual: 1
            })
        );
        // The data phase must not run after a failed index write
        assert_eq!(bus.ops.len(), 1);
    }

    #[test]
    fn test_short_read() {
        let mut bus = MockBus {
            read_limit: Some(2),
            ..Default::default()
        };
        let mut buf = [0u8; 4];
        assert_eq!(
            read_multi(&mut bus, 0x0000, &mut buf),
            Err(Error::ShortRead {
                expected: 4,
                actual: 2
            })
        );

        let mut bus = MockBus {
            read_limit: Some(0),
            ..Default::default()
        };
        assert!(read_byte(&mut bus, 0x0000).is_err());
    }

    #[test]
    fn test_short_write() {
        let mut bus = MockBus {
            write_limit: Some(2),
            ..Default::default()
        };
        assert_eq!(
            write_byte(&mut bus, 0x0000, 1),
            Err(Error::ShortWrite {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            write_multi(&mut bus, 0x0000, &[1, 2, 3]),
            Err(Error::ShortWrite {
                expected: 5,
                actual: 2
            })
        );
    }

    #[test]
    fn test_transfer_error_propagates() {
        let mut bus = MockBus {
            fail: true,
            ..Default::default()
        };
        assert_eq!(write_byte(&mut bus, 0, 0), Err(Error::TransferFailed));
        assert_eq!(read_byte(&mut bus, 0), Err(Error::TransferFailed));
    }

    #[test]
    fn test_index_is_big_endian() {
        for reg in [0x0000u16, 0x00FF, 0xFF00, 0x7FFF, 0xABCD] {
            let frame = write_frame(reg, &[]);
            assert_eq!(frame, vec![(reg >> 8) as u8, reg as u8]);
        }
    }
}
