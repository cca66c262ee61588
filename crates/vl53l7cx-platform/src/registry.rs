//! Platform registry and initialization
//!
//! This module handles opening platforms by name. A platform string is
//! `name` or `name:key1=value1,key2=value2`; the keys are shared between the
//! backend crates, each of which picks out the ones it understands.

use std::collections::HashMap;

use vl53l7cx_core::bus::I2cBus;
use vl53l7cx_core::ranging::RangingSensor;
use vl53l7cx_core::reset::{ResetLine, ResetTiming};

use crate::platform::Platform;

/// Boxed bus session
pub type BoxedBus = Box<dyn I2cBus + Send>;

/// Boxed reset line
pub type BoxedResetLine = Box<dyn ResetLine + Send>;

/// Boxed ranging driver
pub type BoxedRangingSensor = Box<dyn RangingSensor + Send>;

/// A platform assembled from boxed backends
pub type BoxedPlatform = Platform<BoxedBus, BoxedResetLine>;

/// Information about a platform backend
pub struct PlatformInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available platforms (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_platforms() -> Vec<PlatformInfo> {
    let mut platforms = Vec::new();

    #[cfg(feature = "dummy")]
    platforms.push(PlatformInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory sensor emulator for testing (provides ranging)",
    });

    #[cfg(feature = "linux")]
    platforms.push(PlatformInfo {
        name: "linux",
        aliases: &["linux_i2c", "i2c-dev"],
        description: "Linux i2c-dev bus + gpiochip reset line \
                      (dev=/dev/i2c-N,addr=<8-bit>,gpiochip=<N>,reset=<line>,hold=<ms>)",
    });

    platforms
}

/// Generate a short list of platform names for CLI help
pub fn platform_names_short() -> String {
    let platforms = available_platforms();
    let names: Vec<&str> = platforms.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Parsed platform parameters
pub struct PlatformParams {
    /// Platform name
    pub name: String,
    /// Key-value parameters, in the order given
    pub params: Vec<(String, String)>,
}

impl PlatformParams {
    /// Parameters as borrowed pairs, the form backend `parse_options` take
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parameters as a map (later duplicates win)
    pub fn to_map(&self) -> HashMap<&str, &str> {
        self.pairs().into_iter().collect()
    }
}

/// Parse a platform string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
///
/// # Example
/// ```
/// use vl53l7cx_platform::parse_platform_params;
///
/// let params = parse_platform_params("linux:bus=1,reset=17").unwrap();
/// assert_eq!(params.name, "linux");
/// assert_eq!(params.get("reset"), Some("17"));
/// ```
pub fn parse_platform_params(s: &str) -> Result<PlatformParams, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));
    if name.is_empty() {
        return Err("Empty platform name".into());
    }

    let mut params = Vec::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.push((key.trim().to_string(), value.trim().to_string()));
            } else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            }
        }
    }

    Ok(PlatformParams {
        name: name.to_string(),
        params,
    })
}

/// An opened platform plus the ranging driver it offers, if any
pub struct PlatformHandle {
    /// Canonical platform name
    pub name: &'static str,
    /// Register I/O, reset and delay
    pub platform: BoxedPlatform,
    /// Ranging driver, when the platform provides one
    pub ranging: Option<BoxedRangingSensor>,
}

impl PlatformHandle {
    /// Take the ranging driver out of the handle
    pub fn take_ranging(&mut self) -> Result<BoxedRangingSensor, Box<dyn std::error::Error>> {
        self.ranging.take().ok_or_else(|| {
            format!(
                "platform '{}' has no ranging driver; link the vendor driver against \
                 the vl53l7cx-platform C ABI to range on hardware",
                self.name
            )
            .into()
        })
    }
}

/// Reset hold time from the `hold=<ms>` parameter
fn reset_timing(params: &PlatformParams) -> Result<ResetTiming, Box<dyn std::error::Error>> {
    match params.get("hold") {
        Some(v) => {
            let ms: u32 = v
                .parse()
                .map_err(|_| format!("Invalid hold value: {}", v))?;
            Ok(ResetTiming::symmetric(ms))
        }
        None => Ok(ResetTiming::default()),
    }
}

/// Open a platform from its string form
///
/// # Arguments
/// * `spec` - Platform specification (e.g., "dummy" or "linux:bus=7,reset=7")
pub fn open_platform(spec: &str) -> Result<PlatformHandle, Box<dyn std::error::Error>> {
    let params = parse_platform_params(spec)?;

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),

        #[cfg(feature = "linux")]
        "linux" | "linux_i2c" | "i2c-dev" => open_linux(&params),

        _ => Err(format!(
            "Unknown platform: {} (available: {})",
            params.name,
            platform_names_short()
        )
        .into()),
    }
}

/// Open the emulator
///
/// The ranging driver runs on its own emulated sensor: register commands and
/// the reset pulse go to `platform`, never to the ranger's register file.
#[cfg(feature = "dummy")]
fn open_dummy(params: &PlatformParams) -> Result<PlatformHandle, Box<dyn std::error::Error>> {
    use vl53l7cx_dummy::{DummyRanger, DummySensor, RecordingResetLine};

    log::info!("Using dummy sensor emulator");

    let bus: BoxedBus = Box::new(DummySensor::new_default());
    let reset: BoxedResetLine = Box::new(RecordingResetLine::new());
    let platform = Platform::new(bus, reset).with_reset_timing(reset_timing(params)?);

    Ok(PlatformHandle {
        name: "dummy",
        platform,
        ranging: Some(Box::new(DummyRanger::new_default())),
    })
}

#[cfg(feature = "linux")]
fn open_linux(params: &PlatformParams) -> Result<PlatformHandle, Box<dyn std::error::Error>> {
    let pairs = params.pairs();
    let bus = vl53l7cx_linux_i2c::open_linux_i2c(&pairs)?;
    let reset = vl53l7cx_linux_gpio::open_linux_gpio_reset(&pairs)?;
    let platform = Platform::new(bus, reset).with_reset_timing(reset_timing(params)?);

    Ok(PlatformHandle {
        name: "linux",
        platform,
        ranging: None,
    })
}
