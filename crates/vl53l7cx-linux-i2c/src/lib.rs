//! vl53l7cx-linux-i2c - Linux i2c-dev bus session
//!
//! This crate provides the bus session the VL53L7CX platform layer talks
//! through on Linux hosts, via the `/dev/i2c-N` character devices.
//!
//! # Overview
//!
//! The kernel's i2c-dev driver exposes each adapter as a character device.
//! After binding the descriptor to a target address with the `I2C_SLAVE`
//! ioctl, every `write(2)` is one write transaction and every `read(2)` one
//! read transaction against that target.
//!
//! # Example
//!
//! ```no_run
//! use vl53l7cx_linux_i2c::{LinuxI2c, LinuxI2cConfig};
//! use vl53l7cx_core::protocol;
//!
//! // Open I2C7 with the sensor's default address (0x52 >> 1 = 0x29)
//! let mut bus = LinuxI2c::open_device("/dev/i2c-7")?;
//!
//! // Or with a custom address
//! let config = LinuxI2cConfig::new("/dev/i2c-1").with_address(0x54);
//! let mut other = LinuxI2c::open(&config)?;
//!
//! protocol::write_byte(&mut bus, 0x7FFF, 0x00)?;
//! let device_id = protocol::read_byte(&mut bus, 0x0000)?;
//! println!("device id: 0x{:02X}", device_id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the vl53l7cx CLI
//!
//! ```bash
//! # Default bus and address
//! vl53l7cx probe -p linux
//!
//! # Bus number instead of device path, custom address
//! vl53l7cx probe -p linux:bus=1,addr=0x54
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with `CONFIG_I2C_CHARDEV`
//! - Read/write access to `/dev/i2c-N` (usually the `i2c` group)

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxI2c, LinuxI2cConfig, DEFAULT_DEVICE};
pub use error::{LinuxI2cError, Result};

/// Open a Linux I2C session and return it as a boxed bus
///
/// This is a convenience function for use in the platform registry.
///
/// # Example Options
///
/// - `dev=/dev/i2c-7` - device path (default)
/// - `bus=7` - bus number (alternative to dev)
/// - `addr=0x52` - target address, 8-bit convention
pub fn open_linux_i2c(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn vl53l7cx_core::bus::I2cBus + Send>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let bus = LinuxI2c::open(&config)?;
    Ok(Box::new(bus))
}
