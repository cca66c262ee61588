//! Emulated ranging driver

use std::collections::HashMap;

use vl53l7cx_core::error::{Error, Result};
use vl53l7cx_core::ranging::{RangingFrame, RangingMode, RangingSensor, Resolution};
use vl53l7cx_core::sensor;

use crate::sensor::DummySensor;

/// Status the vendor driver uses for an invalid parameter
const STATUS_INVALID_PARAM: u8 = 127;

/// Status the vendor driver uses for a generic failure
const STATUS_FAILED: u8 = 255;

/// Driver calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangingCall {
    /// `init`
    Init,
    /// `set_resolution`
    SetResolution,
    /// `set_ranging_frequency_hz`
    SetFrequency,
    /// `set_ranging_mode`
    SetMode,
    /// `start_ranging`
    Start,
    /// `stop_ranging`
    Stop,
    /// `check_data_ready`
    DataReady,
    /// `get_ranging_data`
    GetData,
}

/// Dummy ranging driver
///
/// Answers `is_alive` by reading the identity registers of an emulated
/// [`DummySensor`] and produces synthetic frames: a new frame becomes ready
/// every `ready_every` polls once ranging has started.
pub struct DummyRanger {
    device: DummySensor,
    initialized: bool,
    ranging: bool,
    resolution: Resolution,
    frequency_hz: u8,
    mode: RangingMode,
    ready_every: u32,
    polls: u32,
    frames: u32,
    failures: HashMap<RangingCall, u32>,
}

impl DummyRanger {
    /// Create a ranger on top of an emulated sensor
    pub fn new(device: DummySensor) -> Self {
        Self {
            device,
            initialized: false,
            ranging: false,
            resolution: Resolution::Res4x4,
            frequency_hz: 1,
            mode: RangingMode::Continuous,
            ready_every: 2,
            polls: 0,
            frames: 0,
            failures: HashMap::new(),
        }
    }

    /// Create a ranger on a default VL53L7CX
    pub fn new_default() -> Self {
        Self::new(DummySensor::new_default())
    }

    /// Make a frame ready every `polls` data-ready checks (minimum 1)
    pub fn with_ready_every(mut self, polls: u32) -> Self {
        self.ready_every = polls.max(1);
        self
    }

    /// Make the next `times` calls of `call` fail
    pub fn fail(&mut self, call: RangingCall, times: u32) {
        self.failures.insert(call, times);
    }

    /// Make every call of `call` fail
    pub fn fail_always(&mut self, call: RangingCall) {
        self.failures.insert(call, u32::MAX);
    }

    /// The emulated sensor
    pub fn device(&self) -> &DummySensor {
        &self.device
    }

    /// Current resolution
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Current ranging frequency
    pub fn frequency_hz(&self) -> u8 {
        self.frequency_hz
    }

    /// Current ranging mode
    pub fn mode(&self) -> RangingMode {
        self.mode
    }

    /// Whether a ranging session is active
    pub fn is_ranging(&self) -> bool {
        self.ranging
    }

    /// Frames handed out so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    fn check(&mut self, call: RangingCall) -> Result<()> {
        if let Some(remaining) = self.failures.get_mut(&call) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                log::debug!("dummy: injected failure for {:?}", call);
                return Err(Error::DriverError(STATUS_FAILED));
            }
        }
        Ok(())
    }

    fn require_initialized(&self) -> Result<()> {
        if !self.initialized {
            return Err(Error::DriverError(STATUS_FAILED));
        }
        Ok(())
    }

    fn synth_frame(&self) -> RangingFrame {
        let side = self.resolution.side();
        let distance_mm = (0..self.resolution.zones())
            .map(|zone| {
                let (row, col) = (zone / side, zone % side);
                // Tilted plane that drifts slowly from frame to frame
                (400 + row * 25 + col * 10 + (self.frames % 50) as usize) as i16
            })
            .collect();
        RangingFrame {
            resolution: self.resolution,
            distance_mm,
            silicon_temp_degc: 31,
        }
    }
}

impl RangingSensor for DummyRanger {
    fn is_alive(&mut self) -> Result<bool> {
        match sensor::check_alive(&mut self.device) {
            Ok(_) => Ok(true),
            Err(Error::SensorNotDetected { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn init(&mut self) -> Result<()> {
        self.check(RangingCall::Init)?;
        self.initialized = true;
        self.resolution = Resolution::Res4x4;
        self.frequency_hz = 1;
        self.mode = RangingMode::Autonomous;
        Ok(())
    }

    fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.check(RangingCall::SetResolution)?;
        self.require_initialized()?;
        self.resolution = resolution;
        if !resolution.frequency_supported(self.frequency_hz) {
            self.frequency_hz = resolution.max_frequency_hz();
        }
        Ok(())
    }

    fn set_ranging_frequency_hz(&mut self, hz: u8) -> Result<()> {
        self.check(RangingCall::SetFrequency)?;
        self.require_initialized()?;
        if !self.resolution.frequency_supported(hz) {
            return Err(Error::DriverError(STATUS_INVALID_PARAM));
        }
        self.frequency_hz = hz;
        Ok(())
    }

    fn set_ranging_mode(&mut self, mode: RangingMode) -> Result<()> {
        self.check(RangingCall::SetMode)?;
        self.require_initialized()?;
        self.mode = mode;
        Ok(())
    }

    fn start_ranging(&mut self) -> Result<()> {
        self.check(RangingCall::Start)?;
        self.require_initialized()?;
        self.ranging = true;
        self.polls = 0;
        Ok(())
    }

    fn stop_ranging(&mut self) -> Result<()> {
        self.check(RangingCall::Stop)?;
        self.ranging = false;
        Ok(())
    }

    fn check_data_ready(&mut self) -> Result<bool> {
        self.check(RangingCall::DataReady)?;
        if !self.ranging {
            return Ok(false);
        }
        self.polls += 1;
        Ok(self.polls % self.ready_every == 0)
    }

    fn get_ranging_data(&mut self) -> Result<RangingFrame> {
        self.check(RangingCall::GetData)?;
        if !self.ranging {
            return Err(Error::DriverError(STATUS_FAILED));
        }
        let frame = self.synth_frame();
        self.frames += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::DummyConfig;

    #[test]
    fn test_alive() {
        let mut ranger = DummyRanger::new_default();
        assert!(ranger.is_alive().unwrap());

        let mut ranger = DummyRanger::new(DummySensor::new(DummyConfig {
            device_id: 0x00,
            ..Default::default()
        }));
        assert!(!ranger.is_alive().unwrap());
    }

    #[test]
    fn test_configure_and_range() {
        let mut ranger = DummyRanger::new_default().with_ready_every(3);
        ranger.init().unwrap();
        ranger.set_resolution(Resolution::Res8x8).unwrap();
        ranger.set_ranging_frequency_hz(10).unwrap();
        ranger.set_ranging_mode(RangingMode::Continuous).unwrap();
        ranger.start_ranging().unwrap();

        let ready: Vec<bool> = (0..6).map(|_| ranger.check_data_ready().unwrap()).collect();
        assert_eq!(ready, vec![false, false, true, false, false, true]);

        let frame = ranger.get_ranging_data().unwrap();
        assert_eq!(frame.resolution, Resolution::Res8x8);
        assert_eq!(frame.distance_mm.len(), 64);
        assert_eq!(ranger.frames(), 1);

        ranger.stop_ranging().unwrap();
        assert!(!ranger.check_data_ready().unwrap());
    }

    #[test]
    fn test_frequency_validation() {
        let mut ranger = DummyRanger::new_default();
        ranger.init().unwrap();
        ranger.set_resolution(Resolution::Res8x8).unwrap();
        assert_eq!(
            ranger.set_ranging_frequency_hz(30),
            Err(Error::DriverError(STATUS_INVALID_PARAM))
        );
    }

    #[test]
    fn test_requires_init() {
        let mut ranger = DummyRanger::new_default();
        assert!(ranger.start_ranging().is_err());
        assert!(ranger.set_resolution(Resolution::Res4x4).is_err());
    }

    #[test]
    fn test_injected_failures() {
        let mut ranger = DummyRanger::new_default();
        ranger.fail(RangingCall::Init, 1);
        assert!(ranger.init().is_err());
        ranger.init().unwrap();

        ranger.fail_always(RangingCall::SetMode);
        assert!(ranger.set_ranging_mode(RangingMode::Continuous).is_err());
        assert!(ranger.set_ranging_mode(RangingMode::Continuous).is_err());
    }
}
