//! vl53l7cx-platform - Host platform layer for the VL53L7CX
//!
//! This crate ties the bus, reset and delay backends together:
//!
//! - [`Platform`] exposes the register, reset, swap and wait operations on
//!   any bus and reset line, returning `Result`
//! - the registry opens a platform from a string such as
//!   `linux:dev=/dev/i2c-7,gpiochip=4,reset=7` or `dummy`
//! - the `ffi` module (feature `linux`) exports the `VL53L7CX_*` functions
//!   the vendor's C driver links against
//!
//! # Example
//!
//! ```
//! use vl53l7cx_platform::open_platform;
//!
//! let mut handle = open_platform("dummy")?;
//! handle.platform.reset_sensor()?;
//! let id = handle.platform.check_alive()?;
//! assert_eq!(id.device_id, 0xF0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "linux")]
pub mod ffi;
mod platform;
pub mod registry;

pub use platform::Platform;
pub use registry::{
    available_platforms, open_platform, parse_platform_params, platform_names_short,
    BoxedBus, BoxedPlatform, BoxedRangingSensor, BoxedResetLine, PlatformHandle, PlatformInfo,
    PlatformParams,
};
