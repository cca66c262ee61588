//! Error types for Linux I2C operations

use thiserror::Error;

/// Linux I2C specific errors
#[derive(Debug, Error)]
pub enum LinuxI2cError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to bind the session to the target address
    #[error("Failed to set target address 0x{addr:02X}: {source}")]
    SetAddressFailed {
        addr: u8,
        #[source]
        source: std::io::Error,
    },

    /// Address does not fit in 7 bits
    #[error("Invalid address 0x{0:02X} (8-bit convention, must be at most 0xFF)")]
    InvalidAddress(u16),

    /// Read or write on the bus failed
    #[error("I2C transfer failed: {0}")]
    TransferFailed(#[source] std::io::Error),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device not specified
    #[error("No device specified. Use dev=/dev/i2c-N or bus=N")]
    NoDevice,
}

impl From<LinuxI2cError> for vl53l7cx_core::Error {
    fn from(e: LinuxI2cError) -> Self {
        match e {
            LinuxI2cError::OpenFailed { .. } | LinuxI2cError::NoDevice => Self::BusOpenFailed,
            LinuxI2cError::SetAddressFailed { .. } => Self::AddressBindFailed,
            LinuxI2cError::InvalidAddress(addr) => Self::InvalidAddress(addr),
            LinuxI2cError::TransferFailed(_) => Self::TransferFailed,
            LinuxI2cError::InvalidParameter(_) => Self::BusOpenFailed,
        }
    }
}

/// Result type for Linux I2C operations
pub type Result<T> = std::result::Result<T, LinuxI2cError>;
