//! Exponential backoff with a ceiling

use std::time::Duration;

use super::{ReconnectionPolicy, ReconnectionSchedule};
use crate::error::{PolicyError, PolicyResult};

/// Default first delay of a reconnection episode
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1_000);

/// Default ceiling for reconnection delays
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(600_000);

/// Doubles the delay after every attempt until it reaches `max_delay`
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use nodewise_core::reconnection::{
///     ExponentialReconnectionPolicy, ReconnectionPolicy, ReconnectionSchedule,
/// };
///
/// let policy = ExponentialReconnectionPolicy::new(
///     Duration::from_millis(1000),
///     Duration::from_millis(10_000),
/// )?;
/// let mut schedule = policy.new_schedule();
/// assert_eq!(schedule.next_delay(), Duration::from_millis(1000));
/// assert_eq!(schedule.next_delay(), Duration::from_millis(2000));
/// # Ok::<(), nodewise_core::PolicyError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialReconnectionPolicy {
    base_delay: Duration,
    max_delay: Duration,
}

impl ExponentialReconnectionPolicy {
    /// Create a policy, rejecting a zero base delay or `base_delay > max_delay`
    pub fn new(base_delay: Duration, max_delay: Duration) -> PolicyResult<Self> {
        if base_delay.is_zero() {
            return Err(PolicyError::invalid_delay(
                base_delay,
                max_delay,
                "base delay must be positive",
            ));
        }
        if base_delay > max_delay {
            return Err(PolicyError::invalid_delay(
                base_delay,
                max_delay,
                "base delay cannot be greater than max delay",
            ));
        }
        Ok(Self { base_delay, max_delay })
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Concrete schedule, for callers that want to iterate it directly
    pub fn schedule(&self) -> ExponentialSchedule {
        ExponentialSchedule { next: self.base_delay, max: self.max_delay }
    }
}

impl Default for ExponentialReconnectionPolicy {
    fn default() -> Self {
        Self { base_delay: DEFAULT_BASE_DELAY, max_delay: DEFAULT_MAX_DELAY }
    }
}

impl ReconnectionPolicy for ExponentialReconnectionPolicy {
    fn new_schedule(&self) -> Box<dyn ReconnectionSchedule> {
        Box::new(self.schedule())
    }
}

/// Delay sequence `base, 2*base, 4*base, ...` clamped to the ceiling
#[derive(Debug, Clone)]
pub struct ExponentialSchedule {
    next: Duration,
    max: Duration,
}

impl ReconnectionSchedule for ExponentialSchedule {
    fn next_delay(&mut self) -> Duration {
        let current = self.next;
        // saturating: doubling near Duration::MAX clamps instead of wrapping
        self.next = current.saturating_mul(2).min(self.max);
        current
    }
}

impl Iterator for ExponentialSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Validates the doubling-then-clamped sequence.
    ///
    /// Assertions:
    /// - Confirms base 1000 / max 10000 yields 1000, 2000, 4000, 8000, then
    ///   10000 forever.
    #[test]
    fn test_delays_double_until_ceiling() {
        let policy = ExponentialReconnectionPolicy::new(ms(1000), ms(10_000)).unwrap();
        let delays: Vec<_> = policy.schedule().take(8).collect();
        assert_eq!(
            delays,
            vec![ms(1000), ms(2000), ms(4000), ms(8000), ms(10_000), ms(10_000), ms(10_000), ms(10_000)]
        );
    }

    /// Validates that delays never decrease and never exceed the ceiling.
    ///
    /// Assertions:
    /// - Ensures each delay is `>=` the previous one and `<=` max.
    #[test]
    fn test_delays_are_monotonic_and_bounded() {
        let policy = ExponentialReconnectionPolicy::new(ms(3), ms(1_000)).unwrap();
        let mut schedule = policy.new_schedule();
        let mut previous = Duration::ZERO;
        for _ in 0..64 {
            let delay = schedule.next_delay();
            assert!(delay >= previous);
            assert!(delay <= ms(1_000));
            previous = delay;
        }
        assert_eq!(previous, ms(1_000));
    }

    /// Validates overflow handling near `Duration::MAX`.
    ///
    /// Assertions:
    /// - Ensures doubling close to the largest duration clamps to the
    ///   ceiling without panicking.
    #[test]
    fn test_doubling_near_max_does_not_overflow() {
        let huge = Duration::MAX / 3;
        let policy = ExponentialReconnectionPolicy::new(huge, Duration::MAX).unwrap();
        let mut schedule = policy.schedule();
        assert_eq!(schedule.next_delay(), huge);
        assert_eq!(schedule.next_delay(), huge * 2);
        assert_eq!(schedule.next_delay(), Duration::MAX);
        assert_eq!(schedule.next_delay(), Duration::MAX);
    }

    /// Validates schedule independence.
    ///
    /// Assertions:
    /// - Confirms advancing one schedule leaves another at the base delay.
    #[test]
    fn test_schedules_are_independent() {
        let policy = ExponentialReconnectionPolicy::default();
        let mut first = policy.new_schedule();
        let mut second = policy.new_schedule();

        first.next_delay();
        first.next_delay();
        assert_eq!(first.next_delay(), ms(4_000));
        assert_eq!(second.next_delay(), DEFAULT_BASE_DELAY);
    }

    /// Validates constructor validation.
    ///
    /// Assertions:
    /// - Ensures `base > max` is rejected.
    /// - Ensures a zero base is rejected.
    /// - Confirms `base == max` is accepted and yields a constant sequence.
    #[test]
    fn test_invalid_delays_rejected() {
        let err = ExponentialReconnectionPolicy::new(ms(2_000), ms(1_000)).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidDelay { .. }));

        assert!(ExponentialReconnectionPolicy::new(Duration::ZERO, ms(1_000)).is_err());

        let flat = ExponentialReconnectionPolicy::new(ms(500), ms(500)).unwrap();
        assert!(flat.schedule().take(3).all(|d| d == ms(500)));
    }

    /// Validates the built-in defaults.
    ///
    /// Assertions:
    /// - Confirms base 1000 ms and max 600000 ms.
    #[test]
    fn test_defaults() {
        let policy = ExponentialReconnectionPolicy::default();
        assert_eq!(policy.base_delay(), ms(1_000));
        assert_eq!(policy.max_delay(), ms(600_000));
    }
}
