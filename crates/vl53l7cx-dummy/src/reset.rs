//! Recording reset line

use std::time::{Duration, Instant};

use vl53l7cx_core::error::{Error, Result};
use vl53l7cx_core::reset::ResetLine;

/// Something that happened on the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// Line claimed as output
    ConfigureOutput,
    /// Line driven low
    Low,
    /// Line driven high
    High,
}

/// Reset line that records every transition with a timestamp
///
/// Behaves like a real line: driving it before `configure_output()` fails.
#[derive(Debug, Default)]
pub struct RecordingResetLine {
    events: Vec<(LineEvent, Instant)>,
    configured: bool,
    fail_configure: bool,
}

impl RecordingResetLine {
    /// Create an unconfigured line
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line whose configuration always fails
    pub fn failing() -> Self {
        Self {
            fail_configure: true,
            ..Self::default()
        }
    }

    /// Recorded events, oldest first
    pub fn events(&self) -> Vec<LineEvent> {
        self.events.iter().map(|(e, _)| *e).collect()
    }

    /// Time between the most recent low and the following high
    pub fn low_hold(&self) -> Option<Duration> {
        let low = self
            .events
            .iter()
            .rposition(|(e, _)| *e == LineEvent::Low)?;
        let (_, low_at) = self.events[low];
        let (_, high_at) = self.events[low + 1..]
            .iter()
            .find(|(e, _)| *e == LineEvent::High)?;
        Some(high_at.duration_since(low_at))
    }

    /// Time of the most recent high transition
    pub fn last_high(&self) -> Option<Instant> {
        self.events
            .iter()
            .rev()
            .find(|(e, _)| *e == LineEvent::High)
            .map(|(_, t)| *t)
    }

    /// Current level, if the line has been driven
    pub fn level(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|(e, _)| match e {
            LineEvent::Low => Some(false),
            LineEvent::High => Some(true),
            LineEvent::ConfigureOutput => None,
        })
    }
}

impl ResetLine for RecordingResetLine {
    fn configure_output(&mut self) -> Result<()> {
        if self.fail_configure {
            return Err(Error::GpioConfigureFailed);
        }
        if !self.configured {
            self.configured = true;
            self.events.push((LineEvent::ConfigureOutput, Instant::now()));
        }
        Ok(())
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        if !self.configured {
            return Err(Error::GpioNotConfigured);
        }
        let event = if high { LineEvent::High } else { LineEvent::Low };
        self.events.push((event, Instant::now()));
        Ok(())
    }
}
