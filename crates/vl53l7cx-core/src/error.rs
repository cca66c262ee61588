//! Error types for vl53l7cx-core
//!
//! This module provides a no_std compatible error type shared by every
//! backend. Backends keep their own detailed error enums and map them into
//! this one at the trait boundary.

use core::fmt;

/// Status returned to the vendor driver on success
pub const STATUS_OK: u8 = 0;

/// Status returned to the vendor driver on any failure
pub const STATUS_ERROR: u8 = 255;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Bus session errors
    /// The bus device node could not be opened
    BusOpenFailed,
    /// The kernel rejected binding the session to the target address
    AddressBindFailed,
    /// Address does not fit the 7-bit bus address space
    InvalidAddress(u16),
    /// The session has already been closed
    SessionClosed,

    // Transfer errors
    /// A write transaction accepted fewer bytes than framed
    ShortWrite {
        /// Bytes in the frame
        expected: usize,
        /// Bytes the bus accepted
        actual: usize,
    },
    /// A read transaction returned fewer bytes than requested
    ShortRead {
        /// Bytes requested
        expected: usize,
        /// Bytes the bus returned
        actual: usize,
    },
    /// The underlying transfer failed outright
    TransferFailed,

    // Reset line errors
    /// Requesting the GPIO line or setting its direction failed
    GpioConfigureFailed,
    /// Driving the GPIO line failed
    GpioWriteFailed,
    /// The GPIO line was driven before being configured as an output
    GpioNotConfigured,

    // Sensor errors
    /// Identity registers did not match a VL53L7CX
    SensorNotDetected {
        /// Value read from the device id register
        device_id: u8,
        /// Value read from the revision id register
        revision_id: u8,
    },
    /// The ranging driver reported a failure status
    DriverError(u8),
}

impl Error {
    /// True for errors that belong to the bus-open class
    pub fn is_bus_open(&self) -> bool {
        matches!(
            self,
            Self::BusOpenFailed | Self::AddressBindFailed | Self::InvalidAddress(_)
        )
    }

    /// True for errors raised by a bus transfer
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::ShortWrite { .. }
                | Self::ShortRead { .. }
                | Self::TransferFailed
                | Self::SessionClosed
        )
    }

    /// True for errors raised while driving the reset line
    pub fn is_gpio(&self) -> bool {
        matches!(
            self,
            Self::GpioConfigureFailed | Self::GpioWriteFailed | Self::GpioNotConfigured
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusOpenFailed => write!(f, "failed to open bus device"),
            Self::AddressBindFailed => write!(f, "failed to bind bus to target address"),
            Self::InvalidAddress(addr) => {
                write!(f, "address 0x{:02X} is not a valid 7-bit bus address", addr)
            }
            Self::SessionClosed => write!(f, "bus session is closed"),
            Self::ShortWrite { expected, actual } => {
                write!(f, "short write: {} of {} bytes accepted", actual, expected)
            }
            Self::ShortRead { expected, actual } => {
                write!(f, "short read: {} of {} bytes returned", actual, expected)
            }
            Self::TransferFailed => write!(f, "bus transfer failed"),
            Self::GpioConfigureFailed => write!(f, "failed to configure reset line as output"),
            Self::GpioWriteFailed => write!(f, "failed to drive reset line"),
            Self::GpioNotConfigured => write!(f, "reset line used before being configured"),
            Self::SensorNotDetected {
                device_id,
                revision_id,
            } => write!(
                f,
                "sensor not detected (device id 0x{:02X}, revision 0x{:02X})",
                device_id, revision_id
            ),
            Self::DriverError(status) => write!(f, "ranging driver returned status {}", status),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

/// Collapse a result into the vendor driver's status convention
///
/// The driver only distinguishes success from failure, so every error maps
/// to [`STATUS_ERROR`].
pub fn status_code<T>(result: &Result<T>) -> u8 {
    match result {
        Ok(_) => STATUS_OK,
        Err(_) => STATUS_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(status_code(&Ok::<(), Error>(())), STATUS_OK);
        assert_eq!(status_code(&Err::<(), _>(Error::TransferFailed)), STATUS_ERROR);
        assert_eq!(
            status_code(&Err::<u8, _>(Error::ShortRead {
                expected: 4,
                actual: 0
            })),
            STATUS_ERROR
        );
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::AddressBindFailed.is_bus_open());
        assert!(Error::InvalidAddress(0x100).is_bus_open());
        assert!(Error::ShortWrite {
            expected: 3,
            actual: 2
        }
        .is_io());
        assert!(Error::GpioNotConfigured.is_gpio());
        assert!(!Error::GpioWriteFailed.is_io());
        assert!(!Error::TransferFailed.is_gpio());
    }
}
