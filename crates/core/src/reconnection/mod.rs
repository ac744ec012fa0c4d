//! Reconnection: how long to wait between attempts to reach a down node
//!
//! A [`ReconnectionPolicy`] is shared by the whole client and only hands out
//! schedules. Each "node is down, keep trying" episode owns one
//! [`ReconnectionSchedule`]; a new episode asks for a fresh schedule, which
//! starts over from the base delay. Schedules only compute durations, the
//! connection manager does the waiting.

pub mod constant;
pub mod exponential;

use std::fmt;
use std::time::Duration;

pub use constant::{ConstantReconnectionPolicy, ConstantSchedule};
pub use exponential::{
    ExponentialReconnectionPolicy, ExponentialSchedule, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY,
};

/// Stateful delay sequence for one reconnection episode
///
/// Owned by exactly one episode, so it needs no internal synchronization.
pub trait ReconnectionSchedule: Send + fmt::Debug {
    /// Delay to wait before the next connection attempt
    fn next_delay(&mut self) -> Duration;
}

/// Factory for per-episode reconnection schedules
pub trait ReconnectionPolicy: Send + Sync + fmt::Debug {
    /// Start a new, independent schedule
    fn new_schedule(&self) -> Box<dyn ReconnectionSchedule>;
}

impl<S: ReconnectionSchedule + ?Sized> ReconnectionSchedule for Box<S> {
    fn next_delay(&mut self) -> Duration {
        (**self).next_delay()
    }
}
