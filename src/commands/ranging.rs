//! Ranging command implementation
//!
//! Brings the sensor up, applies the configured grid, frequency and mode,
//! then polls for frames and redraws the distance grid for each one.
//! Failures before ranging starts end the command, except the three
//! configuration calls, which only warn unless `strict` is set.

use std::io::Write;

use vl53l7cx_core::delay::Delay;
use vl53l7cx_core::error::Result as CoreResult;
use vl53l7cx_core::ranging::{RangingFrame, RangingSensor};

use crate::config::RangingSettings;
use crate::error::AppError;

/// Clear the terminal and move the cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draw one frame: header, one row of zones per line, temperature
pub fn render_frame<W: Write>(out: &mut W, frame: &RangingFrame) -> std::io::Result<()> {
    write!(out, "{}", CLEAR_SCREEN)?;
    writeln!(out, "--- VL53L7CX {} Distance (mm) ---", frame.resolution)?;
    for row in frame.distance_mm.chunks(frame.resolution.side()) {
        for distance in row {
            write!(out, "{:4} ", distance)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;
    writeln!(out, "Temperature: {} C", frame.silicon_temp_degc)?;
    out.flush()
}

/// Apply one configuration call, warning instead of failing unless strict
fn configure(step: &'static str, result: CoreResult<()>, strict: bool) -> Result<(), AppError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if strict => Err(AppError::Step { step, source: e }),
        Err(e) => {
            log::warn!("{} failed: {}, continuing with the driver default", step, e);
            Ok(())
        }
    }
}

/// Bring the sensor up and start a ranging session
pub fn start<S: RangingSensor + ?Sized>(
    sensor: &mut S,
    settings: &RangingSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    if !sensor.is_alive().map_err(AppError::step("is_alive"))? {
        return Err(AppError::NotAlive.into());
    }
    log::info!("Sensor detected");

    sensor.init().map_err(AppError::step("init"))?;

    configure(
        "set_resolution",
        sensor.set_resolution(settings.resolution),
        settings.strict,
    )?;
    configure(
        "set_ranging_frequency_hz",
        sensor.set_ranging_frequency_hz(settings.frequency_hz),
        settings.strict,
    )?;
    configure(
        "set_ranging_mode",
        sensor.set_ranging_mode(settings.mode),
        settings.strict,
    )?;

    log::info!(
        "Starting ranging ({}, {} Hz, {})",
        settings.resolution,
        settings.frequency_hz,
        settings.mode
    );
    sensor.start_ranging().map_err(AppError::step("start_ranging"))?;
    Ok(())
}

/// Poll for frames until `settings.frames` have been drawn
///
/// Runs forever when no frame limit is set. Returns the number of frames
/// drawn.
pub fn poll<S, D, W>(
    sensor: &mut S,
    delay: &mut D,
    out: &mut W,
    settings: &RangingSettings,
) -> Result<u64, Box<dyn std::error::Error>>
where
    S: RangingSensor + ?Sized,
    D: Delay,
    W: Write,
{
    let mut frames = 0u64;
    let mut ready_errors = 0u32;
    let poll_ms = u32::try_from(settings.poll_interval_ms).unwrap_or(u32::MAX);

    while settings.frames.map_or(true, |limit| frames < limit) {
        match sensor.check_data_ready() {
            Ok(true) => {
                ready_errors = 0;
                match sensor.get_ranging_data() {
                    Ok(frame) => {
                        render_frame(out, &frame)?;
                        frames += 1;
                    }
                    Err(e) => log::warn!("get_ranging_data failed: {}", e),
                }
            }
            Ok(false) => ready_errors = 0,
            Err(e) => {
                ready_errors += 1;
                log::warn!("check_data_ready failed ({} in a row): {}", ready_errors, e);
                if settings.max_ready_errors != 0 && ready_errors >= settings.max_ready_errors {
                    return Err(AppError::TooManyReadyErrors(ready_errors).into());
                }
            }
        }
        delay.delay_ms(poll_ms);
    }

    Ok(frames)
}

/// Run a full ranging session on `sensor`
pub fn run_ranging<S, D, W>(
    sensor: &mut S,
    delay: &mut D,
    out: &mut W,
    settings: &RangingSettings,
) -> Result<u64, Box<dyn std::error::Error>>
where
    S: RangingSensor + ?Sized,
    D: Delay,
    W: Write,
{
    start(sensor, settings)?;
    let result = poll(sensor, delay, out, settings);

    if let Err(e) = sensor.stop_ranging() {
        log::warn!("stop_ranging failed: {}", e);
    }
    let frames = result?;
    log::info!("Stopped after {} frames", frames);
    Ok(frames)
}
