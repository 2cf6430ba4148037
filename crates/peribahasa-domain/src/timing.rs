//! Injectable time sources for rate limiting and retry backoff
//!
//! Remote services are paced with a minimum interval between calls and LLM
//! retries back off linearly. Both go through [`Clock`] and [`Sleeper`] so
//! the timing policy can be tested without real delays.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Blocks the current thread
pub trait Sleeper: Send + Sync {
    /// Sleep for the given duration
    fn sleep(&self, duration: Duration);
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sleeper backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Clock that only moves when told to
///
/// Clones share the same elapsed time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Create a clock frozen at its creation instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock().unwrap() += duration;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock().unwrap()
    }
}

/// Sleeper that records requested durations instead of blocking
///
/// When linked to a [`ManualClock`], each sleep advances that clock.
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
    clock: Option<ManualClock>,
}

impl RecordingSleeper {
    /// Create a sleeper with an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the given clock on every sleep
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Every duration slept so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Sum of all recorded sleeps
    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        if let Some(clock) = &self.clock {
            clock.advance(duration);
        }
    }
}

/// Minimum-interval rate limiter
///
/// The first call to [`Pacer::wait`] returns immediately; later calls sleep
/// until `interval` has passed since the previous call returned.
///
/// # Examples
///
/// ```
/// use peribahasa_domain::{ManualClock, Pacer, RecordingSleeper};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let sleeper = RecordingSleeper::new().with_clock(clock.clone());
/// let mut pacer = Pacer::new(Duration::from_millis(200), Arc::new(clock.clone()), Arc::new(sleeper.clone()));
///
/// pacer.wait();
/// clock.advance(Duration::from_millis(50));
/// pacer.wait();
/// assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(150)]);
/// ```
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl Pacer {
    /// Create a pacer over an injected clock and sleeper
    pub fn new(interval: Duration, clock: Arc<dyn Clock>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            interval,
            last: None,
            clock,
            sleeper,
        }
    }

    /// Create a pacer over the wall clock
    pub fn system(interval: Duration) -> Self {
        Self::new(interval, Arc::new(SystemClock), Arc::new(ThreadSleeper))
    }

    /// Configured minimum interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next call is allowed, then record it
    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = self.clock.now().saturating_duration_since(last);
            if elapsed < self.interval {
                self.sleeper.sleep(self.interval - elapsed);
            }
        }
        self.last = Some(self.clock.now());
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("interval", &self.interval)
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_pacer(interval_ms: u64) -> (Pacer, ManualClock, RecordingSleeper) {
        let clock = ManualClock::new();
        let sleeper = RecordingSleeper::new().with_clock(clock.clone());
        let pacer = Pacer::new(
            Duration::from_millis(interval_ms),
            Arc::new(clock.clone()),
            Arc::new(sleeper.clone()),
        );
        (pacer, clock, sleeper)
    }

    #[test]
    fn test_first_wait_does_not_sleep() {
        let (mut pacer, _clock, sleeper) = manual_pacer(1000);
        pacer.wait();
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_back_to_back_waits_sleep_full_interval() {
        let (mut pacer, _clock, sleeper) = manual_pacer(1000);
        pacer.wait();
        pacer.wait();
        pacer.wait();
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1), Duration::from_secs(1)]);
    }

    #[test]
    fn test_elapsed_time_is_credited() {
        let (mut pacer, clock, sleeper) = manual_pacer(1000);
        pacer.wait();
        clock.advance(Duration::from_millis(1500));
        pacer.wait();
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_recording_sleeper_advances_clock() {
        let clock = ManualClock::new();
        let start = clock.now();
        let sleeper = RecordingSleeper::new().with_clock(clock.clone());
        sleeper.sleep(Duration::from_secs(2));
        sleeper.sleep(Duration::from_secs(4));
        assert_eq!(clock.now() - start, Duration::from_secs(6));
        assert_eq!(sleeper.total(), Duration::from_secs(6));
    }
}
