//! Millisecond delays
//!
//! The vendor driver sequences the sensor boot with fixed waits, and the
//! reset pulse has minimum hold times, so every backend needs a sleep that
//! lasts at least as long as asked.

/// Blocking delay provider
pub trait Delay {
    /// Block for at least `ms` milliseconds
    ///
    /// `delay_ms(0)` may return immediately. There is no upper bound on
    /// overshoot.
    fn delay_ms(&mut self, ms: u32);
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Delay backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        wait_ms(ms);
    }
}

/// Sleep the calling thread for at least `ms` milliseconds
#[cfg(feature = "std")]
pub fn wait_ms(ms: u32) {
    if ms == 0 {
        return;
    }
    std::thread::sleep(std::time::Duration::from_millis(ms as u64));
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_wait_zero() {
        wait_ms(0);
        StdDelay.delay_ms(0);
    }

    #[test]
    fn test_wait_lower_bound() {
        let start = Instant::now();
        wait_ms(20);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(20));
        // Loose upper bound, scheduling jitter on CI can be large
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn test_std_delay() {
        let mut delay = StdDelay;
        let start = Instant::now();
        delay.delay_ms(5);
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
