//! The platform facade
//!
//! `Platform` bundles the three host resources the sensor driver needs (a bus
//! session, a reset line and a delay) and exposes the platform operations on
//! them with `Result` returns. The C ABI in [`crate::ffi`] and the CLI are
//! both thin layers over these methods.

use vl53l7cx_core::bus::I2cBus;
use vl53l7cx_core::delay::{Delay, StdDelay};
use vl53l7cx_core::error::Result;
use vl53l7cx_core::reset::{self, ResetLine, ResetTiming};
use vl53l7cx_core::sensor::{self, SensorId};
use vl53l7cx_core::{protocol, swap};

/// Bus session, reset line and delay for one sensor
pub struct Platform<B, R, D = StdDelay> {
    bus: B,
    reset: R,
    delay: D,
    timing: ResetTiming,
}

impl<B: I2cBus, R: ResetLine> Platform<B, R, StdDelay> {
    /// Create a platform that sleeps with `std::thread::sleep`
    pub fn new(bus: B, reset: R) -> Self {
        Self::with_delay(bus, reset, StdDelay)
    }
}

impl<B: I2cBus, R: ResetLine, D: Delay> Platform<B, R, D> {
    /// Create a platform with a custom delay provider
    pub fn with_delay(bus: B, reset: R, delay: D) -> Self {
        Self {
            bus,
            reset,
            delay,
            timing: ResetTiming::default(),
        }
    }

    /// Use different reset hold times (raised to the datasheet minimum)
    pub fn with_reset_timing(mut self, timing: ResetTiming) -> Self {
        self.timing = timing.clamped();
        self
    }

    /// Reset hold times in use
    pub fn reset_timing(&self) -> ResetTiming {
        self.timing
    }

    /// Read one register byte
    pub fn rd_byte(&mut self, reg: u16) -> Result<u8> {
        protocol::read_byte(&mut self.bus, reg)
    }

    /// Write one register byte
    pub fn wr_byte(&mut self, reg: u16, value: u8) -> Result<()> {
        protocol::write_byte(&mut self.bus, reg, value)
    }

    /// Read `buf.len()` bytes starting at `reg`
    pub fn rd_multi(&mut self, reg: u16, buf: &mut [u8]) -> Result<()> {
        protocol::read_multi(&mut self.bus, reg, buf)
    }

    /// Write `data` starting at `reg` in one transaction
    pub fn wr_multi(&mut self, reg: u16, data: &[u8]) -> Result<()> {
        protocol::write_multi(&mut self.bus, reg, data)
    }

    /// Pulse the sensor's reset line
    pub fn reset_sensor(&mut self) -> Result<()> {
        log::info!("Resetting sensor");
        reset::reset_device(&mut self.reset, &mut self.delay, self.timing)
    }

    /// Reverse each 4-byte group of `buf` in place
    pub fn swap_buffer(&self, buf: &mut [u8]) {
        swap::swap_buffer(buf)
    }

    /// Sleep at least `ms` milliseconds
    pub fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms)
    }

    /// Read the identity registers and require a VL53L7CX
    pub fn check_alive(&mut self) -> Result<SensorId> {
        sensor::check_alive(&mut self.bus)
    }

    /// 7-bit address of the bus target
    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    /// The bus session
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// The bus session, mutably
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// The reset line
    pub fn reset_line(&self) -> &R {
        &self.reset
    }

    /// Take the platform apart
    pub fn into_parts(self) -> (B, R, D) {
        (self.bus, self.reset, self.delay)
    }
}
