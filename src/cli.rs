//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vl53l7cx_core::ranging::{RangingMode, Resolution};
use vl53l7cx_platform::platform_names_short;

/// Parse a string as a hex or decimal u16
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let n = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))?
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))?
    };
    u16::try_from(n).map_err(|_| format!("{} does not fit in 16 bits", s))
}

/// Parse a string as a hex or decimal byte
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let n = parse_hex_u16(s)?;
    u8::try_from(n).map_err(|_| format!("{} does not fit in a byte", s))
}

/// Generate dynamic help text for the platform argument
fn platform_help() -> String {
    format!(
        "Platform to use, e.g. linux:dev=/dev/i2c-7,gpiochip=4,reset=7 [available: {}] \
         (default: config file, then linux)",
        platform_names_short()
    )
}

#[derive(Parser)]
#[command(name = "vl53l7cx")]
#[command(author, version, about = "VL53L7CX time-of-flight sensor tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML format)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported platforms
    ListPlatforms,

    /// Reset the sensor and check its identity registers
    Probe {
        #[arg(short, long, help = platform_help())]
        platform: Option<String>,
    },

    /// Pulse the sensor's reset line
    Reset {
        #[arg(short, long, help = platform_help())]
        platform: Option<String>,

        /// Hold time for each level in milliseconds (minimum 10)
        #[arg(long)]
        hold_ms: Option<u32>,
    },

    /// Read registers and print a hex dump
    Read {
        #[arg(short, long, help = platform_help())]
        platform: Option<String>,

        /// First register index (hex, e.g., 0x2C00)
        #[arg(short, long, value_parser = parse_hex_u16)]
        reg: u16,

        /// Number of bytes to read
        #[arg(short, long, default_value = "1", value_parser = parse_hex_u16)]
        len: u16,

        /// Reverse each 4-byte group before printing
        #[arg(long)]
        swap: bool,
    },

    /// Write bytes to registers in one transaction
    Write {
        #[arg(short, long, help = platform_help())]
        platform: Option<String>,

        /// First register index (hex, e.g., 0x7FFF)
        #[arg(short, long, value_parser = parse_hex_u16)]
        reg: u16,

        /// Bytes to write (hex or decimal)
        #[arg(required = true, value_parser = parse_hex_u8)]
        bytes: Vec<u8>,
    },

    /// Start ranging and print the distance grid
    Ranging {
        #[arg(short, long, help = platform_help())]
        platform: Option<String>,

        /// Zone grid (4x4 or 8x8)
        #[arg(long)]
        resolution: Option<Resolution>,

        /// Ranging frequency in Hz
        #[arg(long)]
        frequency: Option<u8>,

        /// Ranging mode (continuous or autonomous)
        #[arg(long)]
        mode: Option<RangingMode>,

        /// Sleep between data-ready checks in milliseconds
        #[arg(long)]
        poll_ms: Option<u64>,

        /// Consecutive data-ready failures before giving up (0 = never)
        #[arg(long)]
        max_ready_errors: Option<u32>,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Fail if resolution, frequency or mode cannot be set
        #[arg(long)]
        strict: bool,
    },
}
