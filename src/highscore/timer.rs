// Debounce timing
//
// The frontend has no timer thread. A pending flush is a deadline that the
// host's frame loop checks through `ScoreStore::poll`.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of the current time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    /// Start at the current instant
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move time forward by whole milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A single pending flush
///
/// At most one deadline is outstanding. Arming an armed timer keeps the
/// original deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushTimer {
    deadline: Option<Instant>,
}

impl FlushTimer {
    /// Create a disarmed timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to expire `delay` after `now`
    ///
    /// # Returns
    /// true if the timer was disarmed and is now armed
    pub fn arm(&mut self, now: Instant, delay: Duration) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + delay);
        true
    }

    /// Disarm the timer; no-op when already disarmed
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has been reached
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance_ms(1500);
        assert_eq!(clock.now() - start, Duration::from_millis(1500));
    }

    #[test]
    fn test_arm_once() {
        let clock = ManualClock::new();
        let mut timer = FlushTimer::new();
        let start = clock.now();

        assert!(timer.arm(start, Duration::from_millis(2000)));
        clock.advance_ms(500);
        assert!(!timer.arm(clock.now(), Duration::from_millis(2000)));

        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(2000)));
    }

    #[test]
    fn test_is_due() {
        let clock = ManualClock::new();
        let mut timer = FlushTimer::new();
        assert!(!timer.is_due(clock.now()));

        timer.arm(clock.now(), Duration::from_millis(2000));
        clock.advance_ms(1999);
        assert!(!timer.is_due(clock.now()));
        clock.advance_ms(1);
        assert!(timer.is_due(clock.now()));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let clock = ManualClock::new();
        let mut timer = FlushTimer::new();
        timer.arm(clock.now(), Duration::from_millis(10));

        timer.cancel();
        timer.cancel();
        assert!(!timer.is_armed());
        assert!(timer.arm(clock.now(), Duration::from_millis(10)));
    }
}
