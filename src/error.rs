//! Application errors

use std::path::PathBuf;

use thiserror::Error;
use vl53l7cx_core::Error as CoreError;

/// Errors raised by the command layer itself
#[derive(Debug, Error)]
pub enum AppError {
    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this tool
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting has a value that cannot be used
    #[error("invalid {key} '{value}': {reason}")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// A ranging step whose failure ends the session
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: CoreError,
    },

    /// The sensor did not answer the identity check
    #[error("sensor not detected")]
    NotAlive,

    /// Too many data-ready checks failed in a row
    #[error("data-ready check failed {0} times in a row")]
    TooManyReadyErrors(u32),
}

impl AppError {
    /// Wrap a driver failure with the step that produced it
    pub fn step(step: &'static str) -> impl FnOnce(CoreError) -> Self {
        move |source| Self::Step { step, source }
    }
}
