//! Configuration file handling
//!
//! Settings come from three places, highest priority first: command-line
//! flags, an optional TOML file passed with `--config`, and built-in
//! defaults.
//!
//! ```toml
//! platform = "linux:dev=/dev/i2c-7,gpiochip=4,reset=7"
//!
//! [ranging]
//! resolution = "4x4"
//! frequency_hz = 10
//! mode = "continuous"
//! poll_interval_ms = 5
//! max_ready_errors = 10
//! strict = false
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use vl53l7cx_core::ranging::{RangingMode, Resolution};

use crate::error::AppError;

/// Platform used when neither the command line nor the file names one
pub const DEFAULT_PLATFORM: &str = "linux";

/// Default ranging frequency
pub const DEFAULT_FREQUENCY_HZ: u8 = 10;

/// Default data-ready poll interval
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5;

/// Default number of consecutive data-ready failures tolerated
pub const DEFAULT_MAX_READY_ERRORS: u32 = 10;

/// Contents of a config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Platform string
    pub platform: Option<String>,
    /// Ranging settings
    #[serde(default)]
    pub ranging: RangingFile,
}

/// `[ranging]` table of a config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangingFile {
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "deserialize_hex_opt")]
    pub frequency_hz: Option<u64>,
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "deserialize_hex_opt")]
    pub poll_interval_ms: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_hex_opt")]
    pub max_ready_errors: Option<u64>,
    pub strict: Option<bool>,
}

/// Deserialize an optional number that can be hex (0x...) or decimal
fn deserialize_hex_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Int(u64),
        Str(String),
    }

    match Option::<HexOrInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(HexOrInt::Int(n)) => Ok(Some(n)),
        Some(HexOrInt::Str(s)) => parse_number(&s).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parse a number that can be hex (0x...) or decimal
pub fn parse_number(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u64>().map_err(|e| format!("Invalid number: {}", e))
    }
}

impl ConfigFile {
    /// Parse config file contents
    pub fn parse(path: &Path, contents: &str) -> Result<Self, AppError> {
        toml::from_str(contents).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        log::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    /// Load `path` if given, otherwise use an empty config
    pub fn load_optional(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Platform string, command line first
    pub fn platform(&self, cli: Option<&str>) -> String {
        cli.or(self.platform.as_deref())
            .unwrap_or(DEFAULT_PLATFORM)
            .to_string()
    }
}

/// Ranging options given on the command line
#[derive(Debug, Default, Clone)]
pub struct RangingOverrides {
    pub resolution: Option<Resolution>,
    pub frequency_hz: Option<u8>,
    pub mode: Option<RangingMode>,
    pub poll_interval_ms: Option<u64>,
    pub max_ready_errors: Option<u32>,
    pub frames: Option<u64>,
    pub strict: bool,
}

/// Effective ranging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangingSettings {
    /// Zone grid
    pub resolution: Resolution,
    /// Ranging frequency in Hz
    pub frequency_hz: u8,
    /// Ranging mode
    pub mode: RangingMode,
    /// Sleep between data-ready checks
    pub poll_interval_ms: u64,
    /// Consecutive data-ready failures before giving up (0 = never)
    pub max_ready_errors: u32,
    /// Stop after this many frames
    pub frames: Option<u64>,
    /// Treat configuration failures as fatal
    pub strict: bool,
}

impl Default for RangingSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            mode: RangingMode::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_ready_errors: DEFAULT_MAX_READY_ERRORS,
            frames: None,
            strict: false,
        }
    }
}

fn invalid(key: &'static str, value: impl ToString, reason: impl ToString) -> AppError {
    AppError::InvalidSetting {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl RangingSettings {
    /// Merge file values and command-line overrides over the defaults
    pub fn resolve(file: &RangingFile, cli: &RangingOverrides) -> Result<Self, AppError> {
        let mut settings = Self::default();

        if let Some(s) = &file.resolution {
            settings.resolution = s.parse().map_err(|e| invalid("resolution", s, e))?;
        }
        if let Some(hz) = file.frequency_hz {
            let hz = u8::try_from(hz).map_err(|_| invalid("frequency_hz", hz, "out of range"))?;
            settings.frequency_hz = hz;
        }
        if let Some(s) = &file.mode {
            settings.mode = s.parse().map_err(|e| invalid("mode", s, e))?;
        }
        if let Some(ms) = file.poll_interval_ms {
            settings.poll_interval_ms = ms;
        }
        if let Some(n) = file.max_ready_errors {
            settings.max_ready_errors =
                u32::try_from(n).map_err(|_| invalid("max_ready_errors", n, "out of range"))?;
        }
        if let Some(strict) = file.strict {
            settings.strict = strict;
        }

        if let Some(resolution) = cli.resolution {
            settings.resolution = resolution;
        }
        if let Some(hz) = cli.frequency_hz {
            settings.frequency_hz = hz;
        }
        if let Some(mode) = cli.mode {
            settings.mode = mode;
        }
        if let Some(ms) = cli.poll_interval_ms {
            settings.poll_interval_ms = ms;
        }
        if let Some(n) = cli.max_ready_errors {
            settings.max_ready_errors = n;
        }
        settings.frames = cli.frames;
        settings.strict |= cli.strict;

        if !settings.resolution.frequency_supported(settings.frequency_hz) {
            log::warn!(
                "{} Hz is outside 1..={} Hz for {}",
                settings.frequency_hz,
                settings.resolution.max_frequency_hz(),
                settings.resolution
            );
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ConfigFile, AppError> {
        ConfigFile::parse(Path::new("test.toml"), s)
    }

    #[test]
    fn test_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.platform(None), DEFAULT_PLATFORM);
        let settings =
            RangingSettings::resolve(&config.ranging, &RangingOverrides::default()).unwrap();
        assert_eq!(settings, RangingSettings::default());
        assert_eq!(settings.frequency_hz, 10);
        assert_eq!(settings.poll_interval_ms, 5);
        assert_eq!(settings.max_ready_errors, 10);
    }

    #[test]
    fn test_file_values() {
        let config = parse(
            r#"
platform = "dummy"

[ranging]
resolution = "8x8"
frequency_hz = 15
mode = "autonomous"
poll_interval_ms = "0x14"
max_ready_errors = 3
strict = true
"#,
        )
        .unwrap();
        assert_eq!(config.platform(None), "dummy");
        assert_eq!(config.platform(Some("linux:bus=1")), "linux:bus=1");

        let settings =
            RangingSettings::resolve(&config.ranging, &RangingOverrides::default()).unwrap();
        assert_eq!(settings.resolution, Resolution::Res8x8);
        assert_eq!(settings.frequency_hz, 15);
        assert_eq!(settings.mode, RangingMode::Autonomous);
        assert_eq!(settings.poll_interval_ms, 20);
        assert_eq!(settings.max_ready_errors, 3);
        assert!(settings.strict);
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = parse("[ranging]\nresolution = \"8x8\"\nfrequency_hz = 10\n").unwrap();
        let cli = RangingOverrides {
            resolution: Some(Resolution::Res4x4),
            frequency_hz: Some(30),
            frames: Some(5),
            ..Default::default()
        };
        let settings = RangingSettings::resolve(&config.ranging, &cli).unwrap();
        assert_eq!(settings.resolution, Resolution::Res4x4);
        assert_eq!(settings.frequency_hz, 30);
        assert_eq!(settings.frames, Some(5));
        assert!(!settings.strict);
    }

    #[test]
    fn test_invalid_values() {
        let config = parse("[ranging]\nresolution = \"5x5\"\n").unwrap();
        assert!(matches!(
            RangingSettings::resolve(&config.ranging, &RangingOverrides::default()),
            Err(AppError::InvalidSetting {
                key: "resolution",
                ..
            })
        ));

        let config = parse("[ranging]\nfrequency_hz = 300\n").unwrap();
        assert!(RangingSettings::resolve(&config.ranging, &RangingOverrides::default()).is_err());

        assert!(matches!(
            parse("[ranging]\nspeed = 3\n"),
            Err(AppError::ConfigParse { .. })
        ));
        assert!(matches!(
            ConfigFile::load(Path::new("/nonexistent/vl53l7cx.toml")),
            Err(AppError::ConfigRead { .. })
        ));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0x52"), Ok(0x52));
        assert_eq!(parse_number("82"), Ok(82));
        assert!(parse_number("0xZZ").is_err());
    }
}
