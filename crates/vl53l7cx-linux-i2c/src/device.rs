//! Linux I2C bus session
//!
//! This module provides the `LinuxI2c` struct that implements the `I2cBus`
//! trait on top of the kernel's i2c-dev interface: plain `read(2)` and
//! `write(2)` on `/dev/i2c-N`, after binding the descriptor to a target with
//! the `I2C_SLAVE` ioctl. Each syscall is one bus transaction.

use crate::error::{LinuxI2cError, Result};

use vl53l7cx_core::bus::{self, I2cBus, DEFAULT_ADDRESS};
use vl53l7cx_core::error::{Error as CoreError, Result as CoreResult};

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

/// Bus the sensor is wired to on the target board (I2C7)
pub const DEFAULT_DEVICE: &str = "/dev/i2c-7";

/// Linux i2c-dev ioctl constants
mod ioctl {
    /// Bind the descriptor to a 7-bit target address
    const I2C_SLAVE: u16 = 0x0703;

    nix::ioctl_write_int_bad!(i2c_set_target, I2C_SLAVE);
}

/// Configuration for opening a Linux I2C bus session
#[derive(Debug, Clone)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-7")
    pub device: String,
    /// Target address in the vendor's 8-bit convention (default: 0x52)
    pub address: u16,
}

impl Default for LinuxI2cConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            address: DEFAULT_ADDRESS,
        }
    }
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the target address (8-bit convention)
    pub fn with_address(mut self, address: u16) -> Self {
        self.address = address;
        self
    }
}

/// An open i2c-dev descriptor bound to one target
///
/// Dropping the session closes the descriptor; [`LinuxI2c::close`] does the
/// same explicitly and consumes the session so it cannot be closed twice.
#[derive(Debug)]
pub struct LinuxI2c {
    /// File handle for the i2c-dev node
    file: File,
    /// 7-bit target address
    address: u8,
}

impl LinuxI2c {
    /// Open a Linux I2C bus session with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        let address = bus::seven_bit_address(config.address)
            .map_err(|_| LinuxI2cError::InvalidAddress(config.address))?;

        log::debug!("linux_i2c: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        unsafe {
            ioctl::i2c_set_target(file.as_raw_fd(), address as libc::c_int).map_err(|e| {
                LinuxI2cError::SetAddressFailed {
                    addr: address,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        log::info!(
            "linux_i2c: Opened {} (target 0x{:02X})",
            config.device,
            address
        );

        Ok(Self { file, address })
    }

    /// Open a device with the default target address
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxI2cConfig::new(device))
    }

    /// Adopt a descriptor that is already bound to `address`
    ///
    /// # Safety
    ///
    /// `fd` must be an open descriptor owned by nobody else; the returned
    /// session takes ownership and closes it on drop.
    pub unsafe fn from_raw_fd(fd: RawFd, address: u8) -> Self {
        Self {
            file: File::from_raw_fd(fd),
            address,
        }
    }

    /// Give up ownership of the descriptor without closing it
    pub fn into_raw_fd(self) -> RawFd {
        self.file.into_raw_fd()
    }

    /// Close the session
    pub fn close(self) {
        log::debug!("linux_i2c: Closing session (target 0x{:02X})", self.address);
        drop(self.file);
    }
}

impl AsRawFd for LinuxI2c {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl I2cBus for LinuxI2c {
    fn write(&mut self, data: &[u8]) -> CoreResult<usize> {
        self.file.write(data).map_err(|e| {
            log::error!("linux_i2c: write of {} bytes failed: {}", data.len(), e);
            CoreError::from(LinuxI2cError::TransferFailed(e))
        })
    }

    fn read(&mut self, buf: &mut [u8]) -> CoreResult<usize> {
        // Some adapters reject zero-length messages
        if buf.is_empty() {
            return Ok(0);
        }
        self.file.read(buf).map_err(|e| {
            log::error!("linux_i2c: read of {} bytes failed: {}", buf.len(), e);
            CoreError::from(LinuxI2cError::TransferFailed(e))
        })
    }

    fn address(&self) -> u8 {
        self.address
    }
}

/// Parse a number that can be hex (0x...) or decimal
fn parse_number(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex: {}", e))
    } else {
        s.parse().map_err(|e| format!("invalid number: {}", e))
    }
}

/// Parse platform options from a list of key-value pairs
///
/// # Supported Options
///
/// - `dev=/dev/i2c-N` - I2C device path (default: /dev/i2c-7)
/// - `bus=N` - I2C bus number (alternative to dev)
/// - `addr=0x52` - target address, 8-bit convention (default: 0x52)
///
/// Unknown keys are ignored with a warning so that options meant for other
/// parts of the platform (reset line, timing) can share one string.
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxI2cConfig, String> {
    let mut config = LinuxI2cConfig::default();
    let mut dev: Option<String> = None;
    let mut bus: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                dev = Some(value.to_string());
            }
            "bus" => {
                bus = Some(
                    parse_number(value).map_err(|e| format!("Invalid bus value {}: {}", value, e))?,
                );
            }
            "addr" => {
                let addr = parse_number(value)
                    .map_err(|e| format!("Invalid addr value {}: {}", value, e))?;
                if addr > 0xFF {
                    return Err(format!(
                        "Invalid address 0x{:X} (8-bit convention, must be at most 0xFF)",
                        addr
                    ));
                }
                config.address = addr as u16;
            }
            _ => {
                log::debug!("linux_i2c: Ignoring option {}={}", key, value);
            }
        }
    }

    match (dev, bus) {
        (Some(_), Some(_)) => {
            return Err("Only one of 'dev' or 'bus' can be specified".to_string());
        }
        (Some(dev), None) => {
            if dev.is_empty() {
                return Err("No device specified. Use dev=/dev/i2c-N or bus=N".to_string());
            }
            config.device = dev;
        }
        (None, Some(n)) => config.device = format!("/dev/i2c-{}", n),
        (None, None) => {}
    }

    Ok(config)
}
