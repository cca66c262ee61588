//! vl53l7cx-linux-gpio - Linux GPIO reset line
//!
//! This crate drives the VL53L7CX hardware reset input from a host GPIO
//! using the Linux character device GPIO interface (gpiocdev).
//!
//! # Overview
//!
//! The line is requested through `/dev/gpiochipN` as an output and held for
//! the lifetime of the [`LinuxGpioReset`] handle. This replaces the
//! deprecated sysfs `export`/`direction`/`value` files: there is no global
//! state left behind, and a failure to claim the line is reported instead
//! of silently toggling an unconfigured pin.
//!
//! # Example
//!
//! ```no_run
//! use vl53l7cx_linux_gpio::{LinuxGpioReset, LinuxGpioResetConfig};
//! use vl53l7cx_core::delay::StdDelay;
//! use vl53l7cx_core::reset::{reset_device, ResetTiming};
//!
//! // GPIO4_A7 (legacy sysfs number 135)
//! let mut line = LinuxGpioReset::new(LinuxGpioResetConfig::from_global(135))?;
//! reset_device(&mut line, &mut StdDelay, ResetTiming::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the vl53l7cx CLI
//!
//! ```bash
//! # Chip number and line offset
//! vl53l7cx reset -p linux:gpiochip=4,reset=7
//!
//! # Legacy global GPIO number
//! vl53l7cx reset -p linux:gpio=135
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support (kernel 5.10+ for v2 API)
//! - Access to `/dev/gpiochipN` devices (may require root or udev rules)

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxGpioReset, LinuxGpioResetConfig, DEFAULT_CHIP, DEFAULT_LINE};
pub use error::{LinuxGpioError, Result};

/// Create a reset line handle and return it boxed
///
/// This is a convenience function for use in the platform registry. The
/// line is not claimed until the first reset.
///
/// # Example Options
///
/// - `gpiodev=/dev/gpiochip4` - GPIO chip device path (default)
/// - `gpiochip=4` - GPIO chip number (alternative to gpiodev)
/// - `reset=7` - line offset (default)
/// - `gpio=135` - legacy global GPIO number
pub fn open_linux_gpio_reset(
    options: &[(&str, &str)],
) -> std::result::Result<
    Box<dyn vl53l7cx_core::reset::ResetLine + Send>,
    Box<dyn std::error::Error>,
> {
    let config = parse_options(options)?;
    let line = LinuxGpioReset::new(config)?;
    Ok(Box::new(line))
}
