//! Fixed-cadence pacing
//!
//! The viewer presents at most one frame per tick, and the test cartridge
//! emits one frame per tick. Both wait on a [`Pacer`].

use core::time::Duration;

/// Waits for the next tick of a fixed cadence
pub trait Pacer {
    /// Block until the next tick is due
    fn wait_for_tick(&mut self);
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn wait_for_tick(&mut self) {
        (**self).wait_for_tick()
    }
}

/// Pacer that never waits
///
/// Useful for replaying captures as fast as they can be decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait_for_tick(&mut self) {}
}

/// Convert a tick rate in Hz to a tick period
///
/// Returns `None` for a zero rate.
pub fn period_from_hz(hz: u32) -> Option<Duration> {
    if hz == 0 {
        None
    } else {
        Some(Duration::from_nanos(1_000_000_000 / hz as u64))
    }
}

#[cfg(any(feature = "std", test))]
pub use ticker::Ticker;

#[cfg(any(feature = "std", test))]
mod ticker {
    use core::time::Duration;
    use std::time::Instant;

    use log::trace;

    use super::Pacer;

    /// Wall-clock ticker with a fixed period
    ///
    /// Deadlines advance by whole periods. When the caller falls behind by
    /// more than a period, the missed ticks are skipped rather than replayed
    /// in a burst, so a slow frame never speeds up the frames after it.
    #[derive(Debug, Clone)]
    pub struct Ticker {
        period: Duration,
        next: Instant,
    }

    impl Ticker {
        /// Create a ticker whose first tick is one period from now
        pub fn every(period: Duration) -> Self {
            Self {
                period,
                next: Instant::now() + period,
            }
        }
    }

    impl Pacer for Ticker {
        fn wait_for_tick(&mut self) {
            let now = Instant::now();
            if now < self.next {
                std::thread::sleep(self.next - now);
                self.next += self.period;
                return;
            }

            // Late: skip to the first deadline after now
            let behind = now - self.next;
            let skipped = if self.period.is_zero() {
                0
            } else {
                (behind.as_nanos() / self.period.as_nanos()) as u64
            };
            if skipped > 0 {
                trace!("Ticker skipped {} ticks", skipped);
            }
            self.next += self.period * (skipped as u32 + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_period_from_hz() {
        assert_eq!(period_from_hz(0), None);
        assert_eq!(period_from_hz(1), Some(Duration::from_secs(1)));
        assert_eq!(period_from_hz(24), Some(Duration::from_nanos(41_666_666)));
    }

    #[test]
    fn test_ticker_waits_roughly_one_period() {
        let mut ticker = Ticker::every(Duration::from_millis(20));
        let start = Instant::now();
        ticker.wait_for_tick();
        ticker.wait_for_tick();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(40));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[test]
    fn test_ticker_skips_missed_ticks() {
        let mut ticker = Ticker::every(Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(100));
        let start = Instant::now();
        // Late tick returns immediately
        ticker.wait_for_tick();
        assert!(start.elapsed() < Duration::from_millis(20));
        // Skipped ticks are not replayed: the cadence resumes at full period
        ticker.wait_for_tick();
        let resumed = Instant::now();
        ticker.wait_for_tick();
        assert!(resumed.elapsed() >= Duration::from_millis(15));
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[test]
    fn test_unpaced_never_blocks() {
        let mut pacer = Unpaced;
        let start = Instant::now();
        for _ in 0..1000 {
            pacer.wait_for_tick();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
