//! Fixed reconnection delay

use std::time::Duration;

use super::{ReconnectionPolicy, ReconnectionSchedule};
use crate::error::{PolicyError, PolicyResult};

/// Waits the same delay before every attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantReconnectionPolicy {
    delay: Duration,
}

impl ConstantReconnectionPolicy {
    pub fn new(delay: Duration) -> PolicyResult<Self> {
        if delay.is_zero() {
            return Err(PolicyError::invalid_delay(delay, delay, "delay must be positive"));
        }
        Ok(Self { delay })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl ReconnectionPolicy for ConstantReconnectionPolicy {
    fn new_schedule(&self) -> Box<dyn ReconnectionSchedule> {
        Box::new(ConstantSchedule { delay: self.delay })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantSchedule {
    delay: Duration,
}

impl ReconnectionSchedule for ConstantSchedule {
    fn next_delay(&mut self) -> Duration {
        self.delay
    }
}

impl Iterator for ConstantSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.delay)
    }
}
