//! Hardware reset pulse
//!
//! The sensor's reset input is wired to a host GPIO. A reset is a falling
//! edge, a low hold, a rising edge and a high hold. Both holds are minimums
//! taken from the datasheet timing: longer is fine, shorter is not.

use crate::delay::Delay;
use crate::error::Result;

/// Minimum time the line is held at each level, in milliseconds
pub const MIN_HOLD_MS: u32 = 10;

/// A GPIO output connected to the sensor reset input
///
/// Implementations acquire the line once and release it when dropped.
pub trait ResetLine {
    /// Claim the line and set its direction to output
    ///
    /// Calling this on an already configured line is a no-op.
    fn configure_output(&mut self) -> Result<()>;

    /// Drive the line high (`true`) or low (`false`)
    ///
    /// Fails with [`Error::GpioNotConfigured`](crate::Error::GpioNotConfigured)
    /// if [`configure_output`](Self::configure_output) has not succeeded.
    fn set_level(&mut self, high: bool) -> Result<()>;
}

impl<T: ResetLine + ?Sized> ResetLine for &mut T {
    fn configure_output(&mut self) -> Result<()> {
        (**self).configure_output()
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        (**self).set_level(high)
    }
}

impl ResetLine for alloc::boxed::Box<dyn ResetLine + Send> {
    fn configure_output(&mut self) -> Result<()> {
        (**self).configure_output()
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        (**self).set_level(high)
    }
}

/// Hold times for the reset pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTiming {
    /// Time held low after the falling edge
    pub low_ms: u32,
    /// Time held high after the rising edge
    pub high_ms: u32,
}

impl Default for ResetTiming {
    fn default() -> Self {
        Self {
            low_ms: MIN_HOLD_MS,
            high_ms: MIN_HOLD_MS,
        }
    }
}

impl ResetTiming {
    /// Use the same hold time for both levels
    pub fn symmetric(hold_ms: u32) -> Self {
        Self {
            low_ms: hold_ms,
            high_ms: hold_ms,
        }
    }

    /// Hold times raised to the datasheet minimum
    pub fn clamped(self) -> Self {
        Self {
            low_ms: self.low_ms.max(MIN_HOLD_MS),
            high_ms: self.high_ms.max(MIN_HOLD_MS),
        }
    }
}

/// Pulse the sensor reset line
///
/// Configures the line as an output, drives it low, waits, drives it high and
/// waits again. Any line failure aborts the sequence and is returned; the
/// line is never toggled before it has been configured.
pub fn reset_device<R, D>(line: &mut R, delay: &mut D, timing: ResetTiming) -> Result<()>
where
    R: ResetLine + ?Sized,
    D: Delay + ?Sized,
{
    let timing = timing.clamped();

    line.configure_output()?;

    log::debug!("reset: line low for {} ms", timing.low_ms);
    line.set_level(false)?;
    delay.delay_ms(timing.low_ms);

    log::debug!("reset: line high for {} ms", timing.high_ms);
    line.set_level(true)?;
    delay.delay_ms(timing.high_ms);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Configure,
        Level(bool),
        Wait(u32),
    }

    struct MockLine<'a> {
        log: &'a RefCell<Vec<Event>>,
        configured: bool,
        fail_configure: bool,
        fail_level: bool,
    }

    impl<'a> MockLine<'a> {
        fn new(log: &'a RefCell<Vec<Event>>) -> Self {
            Self {
                log,
                configured: false,
                fail_configure: false,
                fail_level: false,
            }
        }
    }

    impl ResetLine for MockLine<'_> {
        fn configure_output(&mut self) -> Result<()> {
            if self.fail_configure {
                return Err(Error::GpioConfigureFailed);
            }
            self.configured = true;
            self.log.borrow_mut().push(Event::Configure);
            Ok(())
        }

        fn set_level(&mut self, high: bool) -> Result<()> {
            if !self.configured {
                return Err(Error::GpioNotConfigured);
            }
            if self.fail_level {
                return Err(Error::GpioWriteFailed);
            }
            self.log.borrow_mut().push(Event::Level(high));
            Ok(())
        }
    }

    struct MockDelay<'a> {
        log: &'a RefCell<Vec<Event>>,
    }

    impl Delay for MockDelay<'_> {
        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::Wait(ms));
        }
    }

    #[test]
    fn test_reset_sequence() {
        let log = RefCell::new(Vec::new());
        let mut line = MockLine::new(&log);
        let mut delay = MockDelay { log: &log };

        reset_device(&mut line, &mut delay, ResetTiming::default()).unwrap();

        assert_eq!(
            log.into_inner(),
            vec![
                Event::Configure,
                Event::Level(false),
                Event::Wait(10),
                Event::Level(true),
                Event::Wait(10),
            ]
        );
    }

    #[test]
    fn test_short_holds_are_raised() {
        let log = RefCell::new(Vec::new());
        let mut line = MockLine::new(&log);
        let mut delay = MockDelay { log: &log };

        reset_device(&mut line, &mut delay, ResetTiming::symmetric(2)).unwrap();

        let waits: Vec<u32> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Wait(ms) => Some(*ms),
                _ => None,
            })
            .collect();
        assert_eq!(waits, vec![MIN_HOLD_MS, MIN_HOLD_MS]);
    }

    #[test]
    fn test_longer_holds_are_kept() {
        let timing = ResetTiming {
            low_ms: 25,
            high_ms: 50,
        };
        assert_eq!(timing.clamped(), timing);
    }

    #[test]
    fn test_configure_failure_aborts() {
        let log = RefCell::new(Vec::new());
        let mut line = MockLine::new(&log);
        line.fail_configure = true;
        let mut delay = MockDelay { log: &log };

        assert_eq!(
            reset_device(&mut line, &mut delay, ResetTiming::default()),
            Err(Error::GpioConfigureFailed)
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_write_failure_aborts() {
        let log = RefCell::new(Vec::new());
        let mut line = MockLine::new(&log);
        line.fail_level = true;
        let mut delay = MockDelay { log: &log };

        assert_eq!(
            reset_device(&mut line, &mut delay, ResetTiming::default()),
            Err(Error::GpioWriteFailed)
        );
        assert_eq!(log.into_inner(), vec![Event::Configure]);
    }
}
