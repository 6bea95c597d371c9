//! Spacing between external lookups.

use std::thread;
use std::time::{Duration, Instant};

/// Gate taken before every external geocode call, so the service's usage
/// policy is respected. Cache hits never touch the gate.
pub trait RateGate {
    fn wait(&mut self);
}

/// Enforces a minimum interval between successive calls by sleeping off the
/// remainder of the previous call's window. The first call passes straight
/// through.
pub struct FixedIntervalGate {
    min_delay: Duration,
    last: Option<Instant>,
}

impl FixedIntervalGate {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last: None,
        }
    }
}

impl RateGate for FixedIntervalGate {
    fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                thread::sleep(self.min_delay - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Zero-delay gate for tests and offline fakes.
pub struct NoDelayGate;

impl RateGate for NoDelayGate {
    fn wait(&mut self) {}
}
