//! CLI command implementations
//!
//! Commands that touch hardware take a [`PlatformHandle`] opened by `main`
//! from the platform string, so the same code runs against the Linux
//! backends and the dummy emulator.
//!
//! [`PlatformHandle`]: vl53l7cx_platform::PlatformHandle

mod list;
pub mod probe;
pub mod ranging;
pub mod register;

pub use list::list_platforms;
