//! vl53l7cx-core - Platform layer primitives for the VL53L7CX
//!
//! This crate contains everything about talking to a VL53L7CX time-of-flight
//! sensor that does not depend on a particular host: how register accesses
//! are framed on the two-wire bus, how the hardware reset pulse is timed, how
//! firmware buffers are byte swapped, and the sensor-level checks built on
//! top of those. It is `no_std` compatible; heap allocation is only used to
//! build multi-byte write frames.
//!
//! Host backends implement the small trait seams in [`bus`], [`reset`] and
//! [`delay`]:
//!
//! - [`bus::I2cBus`] - raw write/read transactions reporting byte counts
//! - [`reset::ResetLine`] - a GPIO output driving the sensor reset input
//! - [`delay::Delay`] - millisecond sleeps
//!
//! # Features
//!
//! - `std` - `std::error::Error` for [`Error`] and the [`delay::StdDelay`]
//!   implementation
//!
//! # Example
//!
//! ```ignore
//! use vl53l7cx_core::{protocol, sensor};
//!
//! fn dump<B: vl53l7cx_core::bus::I2cBus>(bus: &mut B) -> vl53l7cx_core::Result<()> {
//!     let id = sensor::read_identity(bus)?;
//!     println!("device 0x{:02X} rev 0x{:02X}", id.device_id, id.revision_id);
//!
//!     let mut buf = [0u8; 8];
//!     protocol::read_multi(bus, 0x2C00, &mut buf)?;
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bus;
pub mod delay;
pub mod error;
pub mod protocol;
pub mod ranging;
pub mod reset;
pub mod sensor;
pub mod swap;

pub use error::{status_code, Error, Result, STATUS_ERROR, STATUS_OK};
