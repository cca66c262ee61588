//! vl53l7cx-dummy - In-memory sensor emulator for testing
//!
//! This crate provides stand-ins for every piece of hardware the platform
//! layer touches, so the transport, reset and ranging code can be exercised
//! without a board:
//!
//! - [`DummySensor`] - register file behind `I2cBus`, with a transaction log
//!   and injectable short transfers
//! - [`RecordingResetLine`] - reset line that timestamps every transition
//! - [`DummyRanger`] - `RangingSensor` producing synthetic frames

mod ranger;
mod reset;
mod sensor;

pub use ranger::{DummyRanger, RangingCall};
pub use reset::{LineEvent, RecordingResetLine};
pub use sensor::{DummyConfig, DummySensor, Fault, Transaction};
