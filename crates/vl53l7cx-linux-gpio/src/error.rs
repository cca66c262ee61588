//! Error types for Linux GPIO reset line operations

use thiserror::Error;

/// Linux GPIO reset line errors
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Failed to open GPIO chip
    #[error("Failed to open GPIO chip '{path}': {source}")]
    ChipOpenFailed {
        path: String,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to query the line
    #[error("Failed to get info for line {line}: {source}")]
    LineInfoFailed {
        line: u32,
        #[source]
        source: gpiocdev::Error,
    },

    /// Line is held by another consumer
    #[error("GPIO line {line} is already in use by '{consumer}'")]
    LineBusy { line: u32, consumer: String },

    /// Failed to request the line as output
    #[error("Failed to request GPIO line as output: {0}")]
    LineRequestFailed(#[source] gpiocdev::Error),

    /// Failed to set GPIO line value
    #[error("Failed to set GPIO line value: {0}")]
    SetValueFailed(#[source] gpiocdev::Error),

    /// Line driven before being requested
    #[error("GPIO line has not been configured as output")]
    NotConfigured,

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// GPIO chip not specified
    #[error("No GPIO chip specified. Use gpiodev=/dev/gpiochipN or gpiochip=N")]
    NoDevice,
}

impl From<LinuxGpioError> for vl53l7cx_core::Error {
    fn from(e: LinuxGpioError) -> Self {
        match e {
            LinuxGpioError::SetValueFailed(_) => Self::GpioWriteFailed,
            LinuxGpioError::NotConfigured => Self::GpioNotConfigured,
            _ => Self::GpioConfigureFailed,
        }
    }
}

/// Result type for Linux GPIO reset line operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;
