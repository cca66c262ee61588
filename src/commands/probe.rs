//! Probe and reset commands

use vl53l7cx_core::bus::I2cBus;
use vl53l7cx_core::delay::Delay;
use vl53l7cx_core::reset::{ResetLine, ResetTiming};
use vl53l7cx_core::sensor::SensorId;
use vl53l7cx_platform::Platform;

/// Reset the sensor, then read and check its identity registers
pub fn run_probe<B, R, D>(
    platform: &mut Platform<B, R, D>,
) -> Result<SensorId, Box<dyn std::error::Error>>
where
    B: I2cBus,
    R: ResetLine,
    D: Delay,
{
    platform.reset_sensor()?;
    let id = platform.check_alive()?;

    println!(
        "Found VL53L7CX at 0x{:02X} (device id 0x{:02X}, revision 0x{:02X})",
        platform.address(),
        id.device_id,
        id.revision_id
    );
    Ok(id)
}

/// Pulse the reset line, optionally with longer holds
pub fn run_reset<B, R, D>(
    platform: Platform<B, R, D>,
    hold_ms: Option<u32>,
) -> Result<Platform<B, R, D>, Box<dyn std::error::Error>>
where
    B: I2cBus,
    R: ResetLine,
    D: Delay,
{
    let mut platform = match hold_ms {
        Some(ms) => platform.with_reset_timing(ResetTiming::symmetric(ms)),
        None => platform,
    };
    let timing = platform.reset_timing();
    platform.reset_sensor()?;

    println!(
        "Reset done (low {} ms, high {} ms)",
        timing.low_ms, timing.high_ms
    );
    Ok(platform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vl53l7cx_dummy::{DummyConfig, DummySensor, LineEvent, RecordingResetLine};

    #[test]
    fn test_probe_dummy() {
        let mut platform = Platform::new(DummySensor::new_default(), RecordingResetLine::new());
        let id = run_probe(&mut platform).unwrap();
        assert!(id.is_vl53l7cx());
        assert_eq!(platform.reset_line().events().len(), 3);
    }

    #[test]
    fn test_probe_wrong_device() {
        let sensor = DummySensor::new(DummyConfig {
            device_id: 0xEA,
            ..Default::default()
        });
        let mut platform = Platform::new(sensor, RecordingResetLine::new());
        assert!(run_probe(&mut platform).is_err());
    }

    #[test]
    fn test_reset_hold() {
        let platform = Platform::new(DummySensor::new_default(), RecordingResetLine::new());
        let platform = run_reset(platform, Some(25)).unwrap();
        assert_eq!(platform.reset_timing(), ResetTiming::symmetric(25));
        assert_eq!(
            platform.reset_line().events(),
            vec![LineEvent::ConfigureOutput, LineEvent::Low, LineEvent::High]
        );
        assert!(platform.reset_line().low_hold().unwrap() >= std::time::Duration::from_millis(25));
    }

    #[test]
    fn test_reset_failure() {
        let platform = Platform::new(DummySensor::new_default(), RecordingResetLine::failing());
        assert!(run_reset(platform, None).is_err());
    }
}
