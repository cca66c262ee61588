//! Linux GPIO reset line implementation
//!
//! This module provides the `LinuxGpioReset` struct that implements the
//! `ResetLine` trait using Linux's GPIO character device interface
//! (gpiocdev). The line is requested once, on the first
//! `configure_output()`, and held until the struct is dropped, so nothing
//! else can drive the reset input while a session owns it.

use crate::error::{LinuxGpioError, Result};

use gpiocdev::chip::Chip;
use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

use vl53l7cx_core::error::{Error as CoreError, Result as CoreResult};
use vl53l7cx_core::reset::ResetLine;

/// GPIO chip of the reset line on the target board (bank 4)
pub const DEFAULT_CHIP: &str = "/dev/gpiochip4";

/// Reset line offset on the target board (GPIO4_A7)
pub const DEFAULT_LINE: Offset = 7;

/// Lines per bank in the legacy global GPIO numbering used by Rockchip SoCs
const LINES_PER_BANK: u32 = 32;

/// Consumer label shown in `gpioinfo`
const CONSUMER: &str = "vl53l7cx-reset";

/// Configuration for the reset line
#[derive(Debug, Clone)]
pub struct LinuxGpioResetConfig {
    /// Device path (e.g., "/dev/gpiochip4")
    pub device: String,
    /// Line offset on the chip
    pub line: Offset,
}

impl Default for LinuxGpioResetConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_CHIP.to_string(),
            line: DEFAULT_LINE,
        }
    }
}

impl LinuxGpioResetConfig {
    /// Create a new configuration with the given chip and line
    pub fn new(device: impl Into<String>, line: Offset) -> Self {
        Self {
            device: device.into(),
            line,
        }
    }

    /// Configuration from a legacy global GPIO number (sysfs numbering)
    ///
    /// On Rockchip parts the number is `bank * 32 + offset`, so GPIO 135 is
    /// bank 4, offset 7 (GPIO4_A7).
    pub fn from_global(number: u32) -> Self {
        Self::new(
            format!("/dev/gpiochip{}", number / LINES_PER_BANK),
            number % LINES_PER_BANK,
        )
    }
}

/// Sensor reset line driven through a GPIO character device
pub struct LinuxGpioReset {
    config: LinuxGpioResetConfig,
    /// Line request, present once the line is configured as output
    request: Option<Request>,
}

impl LinuxGpioReset {
    /// Create a reset line handle
    ///
    /// No GPIO resources are touched until `configure_output()`.
    pub fn new(config: LinuxGpioResetConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }
        Ok(Self {
            config,
            request: None,
        })
    }

    /// Create a handle and immediately claim the line as output
    pub fn open(config: LinuxGpioResetConfig) -> Result<Self> {
        let mut reset = Self::new(config)?;
        reset.request_line()?;
        Ok(reset)
    }

    /// Whether the line is currently requested as output
    pub fn is_configured(&self) -> bool {
        self.request.is_some()
    }

    /// The line configuration
    pub fn config(&self) -> &LinuxGpioResetConfig {
        &self.config
    }

    fn request_line(&mut self) -> Result<()> {
        if self.request.is_some() {
            return Ok(());
        }

        let LinuxGpioResetConfig { device, line } = &self.config;
        log::debug!("linux_gpio: Opening {} line {}", device, line);

        let chip = Chip::from_path(device).map_err(|e| LinuxGpioError::ChipOpenFailed {
            path: device.clone(),
            source: e,
        })?;
        let info = chip
            .line_info(*line)
            .map_err(|e| LinuxGpioError::LineInfoFailed {
                line: *line,
                source: e,
            })?;
        if info.used {
            return Err(LinuxGpioError::LineBusy {
                line: *line,
                consumer: info.consumer,
            });
        }

        // Start high so requesting the line does not itself reset the sensor
        let mut req_config = Config::default();
        req_config.with_line(*line).as_output(Value::Active);

        let request = Request::from_config(req_config)
            .on_chip(device)
            .with_consumer(CONSUMER)
            .request()
            .map_err(LinuxGpioError::LineRequestFailed)?;

        log::info!("linux_gpio: Claimed {} line {} as output", device, line);
        self.request = Some(request);
        Ok(())
    }

    fn drive(&mut self, high: bool) -> Result<()> {
        let request = self.request.as_ref().ok_or(LinuxGpioError::NotConfigured)?;
        let value = if high { Value::Active } else { Value::Inactive };
        request
            .set_value(self.config.line, value)
            .map_err(LinuxGpioError::SetValueFailed)?;
        Ok(())
    }
}

impl Drop for LinuxGpioReset {
    fn drop(&mut self) {
        if self.request.take().is_some() {
            log::debug!(
                "linux_gpio: Released {} line {}",
                self.config.device,
                self.config.line
            );
        }
    }
}

impl ResetLine for LinuxGpioReset {
    fn configure_output(&mut self) -> CoreResult<()> {
        self.request_line().map_err(|e| {
            log::error!("linux_gpio: {}", e);
            CoreError::from(e)
        })
    }

    fn set_level(&mut self, high: bool) -> CoreResult<()> {
        self.drive(high).map_err(|e| {
            log::error!("linux_gpio: {}", e);
            CoreError::from(e)
        })
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

/// Parse reset line options from a list of key-value pairs
///
/// # Supported Options
///
/// - `gpiodev=/dev/gpiochipN` - GPIO chip device path (default: /dev/gpiochip4)
/// - `gpiochip=N` - GPIO chip number (alternative to gpiodev)
/// - `reset=N` - line offset on the chip (default: 7)
/// - `gpio=N` - legacy global GPIO number, replaces chip and line
///
/// Unknown keys are ignored so the string can be shared with the bus options.
pub fn parse_options(
    options: &[(&str, &str)],
) -> std::result::Result<LinuxGpioResetConfig, String> {
    let mut config = LinuxGpioResetConfig::default();
    let mut gpiodev: Option<String> = None;
    let mut gpiochip: Option<u32> = None;
    let mut line: Option<u32> = None;
    let mut global: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "gpiodev" => gpiodev = Some(value.to_string()),
            "gpiochip" => {
                gpiochip = Some(
                    parse_number(value)
                        .map_err(|e| format!("Invalid gpiochip value {}: {}", value, e))?,
                );
            }
            "reset" => {
                line = Some(
                    parse_number(value)
                        .map_err(|e| format!("Invalid reset value {}: {}", value, e))?,
                );
            }
            "gpio" => {
                global = Some(
                    parse_number(value)
                        .map_err(|e| format!("Invalid gpio value {}: {}", value, e))?,
                );
            }
            _ => {
                log::debug!("linux_gpio: Ignoring option {}={}", key, value);
            }
        }
    }

    if let Some(number) = global {
        if gpiodev.is_some() || gpiochip.is_some() || line.is_some() {
            return Err("'gpio' cannot be combined with gpiodev, gpiochip or reset".to_string());
        }
        return Ok(LinuxGpioResetConfig::from_global(number));
    }

    match (gpiodev, gpiochip) {
        (Some(_), Some(_)) => {
            return Err("Only one of 'gpiodev' or 'gpiochip' can be specified".to_string());
        }
        (Some(dev), None) => {
            if dev.is_empty() {
                return Err("No GPIO chip specified. Use gpiodev=/dev/gpiochipN".to_string());
            }
            config.device = dev;
        }
        (None, Some(n)) => config.device = format!("/dev/gpiochip{}", n),
        (None, None) => {}
    }

    if let Some(line) = line {
        config.line = line;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = parse_options(&[("dev", "/dev/i2c-7")]).unwrap();
        assert_eq!(config.device, DEFAULT_CHIP);
        assert_eq!(config.line, DEFAULT_LINE);
    }

    #[test]
    fn test_parse_chip_and_line() {
        let config = parse_options(&[("gpiochip", "1"), ("reset", "17")]).unwrap();
        assert_eq!(config.device, "/dev/gpiochip1");
        assert_eq!(config.line, 17);

        let config = parse_options(&[("gpiodev", "/dev/gpiochip2"), ("reset", "0x3")]).unwrap();
        assert_eq!(config.device, "/dev/gpiochip2");
        assert_eq!(config.line, 3);
    }

    #[test]
    fn test_parse_global_number() {
        let config = parse_options(&[("gpio", "135")]).unwrap();
        assert_eq!(config.device, "/dev/gpiochip4");
        assert_eq!(config.line, 7);
        assert!(parse_options(&[("gpio", "135"), ("reset", "1")]).is_err());
    }

    #[test]
    fn test_parse_rejects() {
        assert!(parse_options(&[("gpiodev", "/dev/gpiochip0"), ("gpiochip", "0")]).is_err());
        assert!(parse_options(&[("reset", "seven")]).is_err());
        assert!(parse_options(&[("gpiodev", "")]).is_err());
    }

    #[test]
    fn test_drive_before_configure() {
        let mut reset =
            LinuxGpioReset::new(LinuxGpioResetConfig::new("/nonexistent/gpiochip9", 7)).unwrap();
        assert!(!reset.is_configured());
        assert_eq!(reset.set_level(false), Err(CoreError::GpioNotConfigured));
    }

    #[test]
    fn test_configure_missing_chip() {
        let mut reset =
            LinuxGpioReset::new(LinuxGpioResetConfig::new("/nonexistent/gpiochip9", 7)).unwrap();
        assert_eq!(reset.configure_output(), Err(CoreError::GpioConfigureFailed));
        assert!(!reset.is_configured());
        assert!(matches!(
            LinuxGpioReset::open(LinuxGpioResetConfig::new("/nonexistent/gpiochip9", 7)),
            Err(LinuxGpioError::ChipOpenFailed { .. })
        ));
    }

    #[test]
    fn test_empty_device() {
        assert!(matches!(
            LinuxGpioReset::new(LinuxGpioResetConfig::new("", 7)),
            Err(LinuxGpioError::NoDevice)
        ));
    }
}
