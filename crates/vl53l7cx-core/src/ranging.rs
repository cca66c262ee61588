//! Ranging sensor interface
//!
//! The ranging state machine (firmware upload, configuration, result
//! decoding) belongs to the vendor driver. This module only describes the
//! calls an application makes on it, so the polling loop can be written and
//! tested independently of any particular driver.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::Result;

/// Zone grid resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// 4x4 zones
    #[default]
    Res4x4,
    /// 8x8 zones
    Res8x8,
}

impl Resolution {
    /// Number of zones in the grid
    pub fn zones(self) -> usize {
        match self {
            Self::Res4x4 => 16,
            Self::Res8x8 => 64,
        }
    }

    /// Zones per row
    pub fn side(self) -> usize {
        match self {
            Self::Res4x4 => 4,
            Self::Res8x8 => 8,
        }
    }

    /// Highest ranging frequency the sensor accepts at this resolution
    pub fn max_frequency_hz(self) -> u8 {
        match self {
            Self::Res4x4 => 60,
            Self::Res8x8 => 15,
        }
    }

    /// Check a ranging frequency against this resolution's limits
    pub fn frequency_supported(self, hz: u8) -> bool {
        (1..=self.max_frequency_hz()).contains(&hz)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

impl FromStr for Resolution {
    type Err = &'static str;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim() {
            "4x4" | "16" => Ok(Self::Res4x4),
            "8x8" | "64" => Ok(Self::Res8x8),
            _ => Err("resolution must be 4x4 or 8x8"),
        }
    }
}

/// Ranging mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangingMode {
    /// Back-to-back measurements at the configured frequency
    #[default]
    Continuous,
    /// Measurements separated by a programmable integration time
    Autonomous,
}

impl fmt::Display for RangingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuous => write!(f, "continuous"),
            Self::Autonomous => write!(f, "autonomous"),
        }
    }
}

impl FromStr for RangingMode {
    type Err = &'static str;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(Self::Continuous),
            "autonomous" => Ok(Self::Autonomous),
            _ => Err("mode must be continuous or autonomous"),
        }
    }
}

/// One set of ranging results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangingFrame {
    /// Grid the frame was measured with
    pub resolution: Resolution,
    /// Distance per zone in millimetres, row-major
    pub distance_mm: Vec<i16>,
    /// Die temperature in degrees Celsius
    pub silicon_temp_degc: i8,
}

/// Calls an application makes on a ranging driver
pub trait RangingSensor {
    /// Read the identity registers and report whether a sensor answers
    fn is_alive(&mut self) -> Result<bool>;

    /// Boot the sensor (firmware upload and default configuration)
    fn init(&mut self) -> Result<()>;

    /// Select the zone grid
    fn set_resolution(&mut self, resolution: Resolution) -> Result<()>;

    /// Set the ranging frequency in Hz
    fn set_ranging_frequency_hz(&mut self, hz: u8) -> Result<()>;

    /// Select the ranging mode
    fn set_ranging_mode(&mut self, mode: RangingMode) -> Result<()>;

    /// Start a ranging session
    fn start_ranging(&mut self) -> Result<()>;

    /// Stop the ranging session
    fn stop_ranging(&mut self) -> Result<()>;

    /// Poll whether a new frame is available
    fn check_data_ready(&mut self) -> Result<bool>;

    /// Fetch the latest frame
    fn get_ranging_data(&mut self) -> Result<RangingFrame>;
}

impl RangingSensor for alloc::boxed::Box<dyn RangingSensor + Send> {
    fn is_alive(&mut self) -> Result<bool> {
        (**self).is_alive()
    }

    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        (**self).set_resolution(resolution)
    }

    fn set_ranging_frequency_hz(&mut self, hz: u8) -> Result<()> {
        (**self).set_ranging_frequency_hz(hz)
    }

    fn set_ranging_mode(&mut self, mode: RangingMode) -> Result<()> {
        (**self).set_ranging_mode(mode)
    }

    fn start_ranging(&mut self) -> Result<()> {
        (**self).start_ranging()
    }

    fn stop_ranging(&mut self) -> Result<()> {
        (**self).stop_ranging()
    }

    fn check_data_ready(&mut self) -> Result<bool> {
        (**self).check_data_ready()
    }

    fn get_ranging_data(&mut self) -> Result<RangingFrame> {
        (**self).get_ranging_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_geometry() {
        assert_eq!(Resolution::Res4x4.zones(), 16);
        assert_eq!(Resolution::Res4x4.side(), 4);
        assert_eq!(Resolution::Res8x8.zones(), 64);
        assert_eq!(Resolution::Res8x8.side(), 8);
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("4x4".parse::<Resolution>(), Ok(Resolution::Res4x4));
        assert_eq!("8x8".parse::<Resolution>(), Ok(Resolution::Res8x8));
        assert_eq!("64".parse::<Resolution>(), Ok(Resolution::Res8x8));
        assert!("2x2".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_frequency_limits() {
        assert!(Resolution::Res4x4.frequency_supported(10));
        assert!(Resolution::Res4x4.frequency_supported(60));
        assert!(!Resolution::Res8x8.frequency_supported(30));
        assert!(!Resolution::Res8x8.frequency_supported(0));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(
            "Continuous".parse::<RangingMode>(),
            Ok(RangingMode::Continuous)
        );
        assert_eq!(
            "autonomous".parse::<RangingMode>(),
            Ok(RangingMode::Autonomous)
        );
        assert!("single".parse::<RangingMode>().is_err());
    }
}
