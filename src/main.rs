//! vl53l7cx - VL53L7CX time-of-flight sensor tool
//!
//! Talks to a VL53L7CX on a Linux host through the i2c-dev bus and a
//! gpiochip reset line, or to an in-memory emulator for testing.
//!
//! # Architecture
//!
//! Every command opens a platform from a platform string (see
//! `vl53l7cx_platform::registry`):
//! - **Register commands** (probe, reset, read, write) use the platform's
//!   bus session and reset line directly
//! - **Ranging** additionally needs a ranging driver. The dummy platform
//!   brings an emulated one; on hardware the vendor's C driver links against
//!   the platform crate's C ABI instead

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use config::{ConfigFile, RangingOverrides, RangingSettings};
use vl53l7cx_core::delay::StdDelay;
use vl53l7cx_platform::open_platform;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let config = ConfigFile::load_optional(cli.config.as_deref())?;

    match cli.command {
        Commands::ListPlatforms => {
            commands::list_platforms();
            Ok(())
        }
        Commands::Probe { platform } => {
            let mut handle = open_platform(&config.platform(platform.as_deref()))?;
            commands::probe::run_probe(&mut handle.platform)?;
            Ok(())
        }
        Commands::Reset { platform, hold_ms } => {
            let handle = open_platform(&config.platform(platform.as_deref()))?;
            commands::probe::run_reset(handle.platform, hold_ms)?;
            Ok(())
        }
        Commands::Read {
            platform,
            reg,
            len,
            swap,
        } => {
            let mut handle = open_platform(&config.platform(platform.as_deref()))?;
            commands::register::run_read(&mut handle.platform, reg, len, swap)
        }
        Commands::Write {
            platform,
            reg,
            bytes,
        } => {
            let mut handle = open_platform(&config.platform(platform.as_deref()))?;
            commands::register::run_write(&mut handle.platform, reg, &bytes)
        }
        Commands::Ranging {
            platform,
            resolution,
            frequency,
            mode,
            poll_ms,
            max_ready_errors,
            frames,
            strict,
        } => {
            let overrides = RangingOverrides {
                resolution,
                frequency_hz: frequency,
                mode,
                poll_interval_ms: poll_ms,
                max_ready_errors,
                frames,
                strict,
            };
            let settings = RangingSettings::resolve(&config.ranging, &overrides)?;

            let mut handle = open_platform(&config.platform(platform.as_deref()))?;
            let mut sensor = handle.take_ranging()?;

            handle.platform.reset_sensor()?;

            let stdout = std::io::stdout();
            commands::ranging::run_ranging(
                &mut sensor,
                &mut StdDelay,
                &mut stdout.lock(),
                &settings,
            )?;
            Ok(())
        }
    }
}
