//! C ABI for the vendor ranging driver
//!
//! The vendor's ultra-lite driver is a C library that calls a fixed set of
//! `VL53L7CX_*` platform functions. This module exports them, backed by the
//! Linux i2c-dev session and the gpiocdev reset line. The driver owns the
//! `VL53L7CX_Platform` struct and the bus descriptor stored in it. The reset
//! line is process-wide: it is requested on the first reset, stays driven
//! between resets and is released by `VL53L7CX_CommsClose`.
//!
//! Every function that returns a status returns [`STATUS_OK`] (0) on success
//! and `STATUS_ERROR` (255) on failure; the detailed error is logged.
//!
//! # Safety
//!
//! Platform pointers must be null or point to a `VL53L7CX_Platform` that no
//! other thread uses during the call. Buffer pointers must be null or valid
//! for `size` bytes. Null pointers are reported as failures, not dereferenced.

#![allow(non_snake_case, non_camel_case_types)]

use std::mem::ManuallyDrop;
use std::sync::{Mutex, PoisonError};

use libc::c_int;
use vl53l7cx_core::bus;
use vl53l7cx_core::delay::{wait_ms, Delay, StdDelay};
use vl53l7cx_core::error::{status_code, Error, Result, STATUS_OK};
use vl53l7cx_core::reset::{reset_device, ResetLine, ResetTiming};
use vl53l7cx_core::{protocol, swap};
use vl53l7cx_linux_gpio::{LinuxGpioReset, LinuxGpioResetConfig};
use vl53l7cx_linux_i2c::{LinuxI2c, LinuxI2cConfig, DEFAULT_DEVICE};

/// Descriptor value of a session that is not open
pub const CLOSED_FD: c_int = -1;

/// Platform context shared with the vendor driver
///
/// Must match the layout of `VL53L7CX_Platform` in the driver's
/// `platform.h`.
#[repr(C)]
#[derive(Debug)]
pub struct VL53L7CX_Platform {
    /// Sensor address, 8-bit convention (0x52 by default)
    pub address: u16,
    /// i2c-dev descriptor, negative when closed
    pub fd: c_int,
}

impl Default for VL53L7CX_Platform {
    fn default() -> Self {
        Self {
            address: bus::DEFAULT_ADDRESS,
            fd: CLOSED_FD,
        }
    }
}

/// Log a failed operation and turn the result into a driver status
fn report(op: &str, result: Result<()>) -> u8 {
    if let Err(e) = &result {
        log::error!("{}: {}", op, e);
    }
    status_code(&result)
}

/// Reset line that stays claimed between resets
struct HeldLine<R> {
    line: Option<R>,
}

impl<R: ResetLine> HeldLine<R> {
    const fn new() -> Self {
        Self { line: None }
    }

    /// Pulse the held line, acquiring it with `open` on first use
    fn reset<D: Delay>(
        &mut self,
        open: impl FnOnce() -> Result<R>,
        delay: &mut D,
        timing: ResetTiming,
    ) -> Result<()> {
        let line = match &mut self.line {
            Some(line) => line,
            None => self.line.insert(open()?),
        };
        reset_device(line, delay, timing)
    }

    /// Drop the held line, if any
    fn release(&mut self) -> bool {
        self.line.take().is_some()
    }
}

static RESET_LINE: Mutex<HeldLine<LinuxGpioReset>> = Mutex::new(HeldLine::new());

/// Release the process-wide reset line
fn release_reset_line() {
    let mut held = RESET_LINE.lock().unwrap_or_else(PoisonError::into_inner);
    if held.release() {
        log::debug!("Released reset line");
    }
}

/// Borrow the platform struct behind a driver pointer
///
/// # Safety
///
/// `p` must be null or point to a valid, exclusively accessible struct.
unsafe fn platform_mut<'a>(p: *mut VL53L7CX_Platform) -> Result<&'a mut VL53L7CX_Platform> {
    p.as_mut().ok_or(Error::SessionClosed)
}

/// Run `f` on the session stored in `platform` without closing it afterwards
fn with_session<T>(
    platform: &VL53L7CX_Platform,
    f: impl FnOnce(&mut LinuxI2c) -> Result<T>,
) -> Result<T> {
    if platform.fd < 0 {
        return Err(Error::SessionClosed);
    }
    let address = bus::seven_bit_address(platform.address)?;
    // The descriptor stays owned by the platform struct until CommsClose
    let mut session = ManuallyDrop::new(unsafe { LinuxI2c::from_raw_fd(platform.fd, address) });
    f(&mut session)
}

/// Open `device`, bind the platform's address and store the descriptor
fn comms_init(platform: &mut VL53L7CX_Platform, device: &str) -> Result<()> {
    let config = LinuxI2cConfig::new(device).with_address(platform.address);
    let session = LinuxI2c::open(&config).map_err(|e| {
        log::error!("linux_i2c: {}", e);
        Error::from(e)
    })?;
    platform.fd = session.into_raw_fd();
    Ok(())
}

/// Close the stored descriptor and mark the platform closed
fn comms_close(platform: &mut VL53L7CX_Platform) -> Result<()> {
    if platform.fd < 0 {
        return Err(Error::SessionClosed);
    }
    let session = unsafe { LinuxI2c::from_raw_fd(platform.fd, 0) };
    platform.fd = CLOSED_FD;
    session.close();
    Ok(())
}

/// Open the sensor's bus (`/dev/i2c-7`) and bind `p.address >> 1`
///
/// # Safety
///
/// `p` must be null or point to a valid `VL53L7CX_Platform`.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_CommsInit(p: *mut VL53L7CX_Platform) -> u8 {
    let result = platform_mut(p).and_then(|platform| comms_init(platform, DEFAULT_DEVICE));
    report("VL53L7CX_CommsInit", result)
}

/// Close the session and release the reset line
///
/// Fails on a platform that is not open. The reset line is released either
/// way.
///
/// # Safety
///
/// `p` must be null or point to a valid `VL53L7CX_Platform`.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_CommsClose(p: *mut VL53L7CX_Platform) -> u8 {
    let result = platform_mut(p).and_then(comms_close);
    release_reset_line();
    report("VL53L7CX_CommsClose", result)
}

/// Read one register into `*value`
///
/// # Safety
///
/// `p` must be null or point to a valid `VL53L7CX_Platform`, and `value`
/// must be null or valid for a one-byte write.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_RdByte(
    p: *mut VL53L7CX_Platform,
    reg: u16,
    value: *mut u8,
) -> u8 {
    let result = platform_mut(p).and_then(|platform| {
        let out = value.as_mut().ok_or(Error::TransferFailed)?;
        *out = with_session(platform, |bus| protocol::read_byte(bus, reg))?;
        Ok(())
    });
    report("VL53L7CX_RdByte", result)
}

/// Write `value` to one register
///
/// # Safety
///
/// `p` must be null or point to a valid `VL53L7CX_Platform`.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_WrByte(p: *mut VL53L7CX_Platform, reg: u16, value: u8) -> u8 {
    let result = platform_mut(p)
        .and_then(|platform| with_session(platform, |bus| protocol::write_byte(bus, reg, value)));
    report("VL53L7CX_WrByte", result)
}

/// Read `size` bytes starting at `reg` into `values`
///
/// # Safety
///
/// `p` must be null or point to a valid `VL53L7CX_Platform`, and `values`
/// must be null or valid for `size` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_RdMulti(
    p: *mut VL53L7CX_Platform,
    reg: u16,
    values: *mut u8,
    size: u32,
) -> u8 {
    let result = platform_mut(p).and_then(|platform| {
        let buf: &mut [u8] = if size == 0 {
            &mut []
        } else if values.is_null() {
            return Err(Error::TransferFailed);
        } else {
            std::slice::from_raw_parts_mut(values, size as usize)
        };
        with_session(platform, |bus| protocol::read_multi(bus, reg, buf))
    });
    report("VL53L7CX_RdMulti", result)
}

/// Write `size` bytes from `values` starting at `reg` in one transaction
///
/// # Safety
///
/// `p` must be null or point to a valid `VL53L7CX_Platform`, and `values`
/// must be null or valid for `size` bytes of reads.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_WrMulti(
    p: *mut VL53L7CX_Platform,
    reg: u16,
    values: *mut u8,
    size: u32,
) -> u8 {
    let result = platform_mut(p).and_then(|platform| {
        let data: &[u8] = if size == 0 {
            &[]
        } else if values.is_null() {
            return Err(Error::TransferFailed);
        } else {
            std::slice::from_raw_parts(values, size as usize)
        };
        with_session(platform, |bus| protocol::write_multi(bus, reg, data))
    });
    report("VL53L7CX_WrMulti", result)
}

/// Pulse the reset line (`/dev/gpiochip4` line 7)
///
/// The line is requested on the first call and left driven high afterwards.
/// The platform pointer is not used.
///
/// # Safety
///
/// Always safe to call; `p` is never dereferenced.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_Reset_Sensor(_p: *mut VL53L7CX_Platform) -> u8 {
    let mut held = RESET_LINE.lock().unwrap_or_else(PoisonError::into_inner);
    let result = held.reset(
        || LinuxGpioReset::new(LinuxGpioResetConfig::default()).map_err(Error::from),
        &mut StdDelay,
        ResetTiming::default(),
    );
    report("VL53L7CX_Reset_Sensor", result)
}

/// Reverse each 4-byte group of `buffer` in place
///
/// # Safety
///
/// `buffer` must be null or valid for `size` bytes of reads and writes.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_SwapBuffer(buffer: *mut u8, size: u16) {
    if buffer.is_null() || size == 0 {
        return;
    }
    swap::swap_buffer(std::slice::from_raw_parts_mut(buffer, size as usize));
}

/// Sleep at least `ms` milliseconds; always succeeds
///
/// # Safety
///
/// Always safe to call; `p` is never dereferenced.
#[no_mangle]
pub unsafe extern "C" fn VL53L7CX_WaitMs(_p: *mut VL53L7CX_Platform, ms: u32) -> u8 {
    wait_ms(ms);
    STATUS_OK
}
