//! Simulated work latency
//!
//! Each task owns its own generator; nothing here is shared across threads.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;

/// Uniform random delay in `[0, max)`
#[derive(Debug)]
pub struct Latency {
    max: Duration,
    rng: SmallRng,
}

impl Latency {
    /// Random delays up to `max`, seeded from the operating system
    pub fn up_to(max: Duration) -> Self {
        Self {
            max,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Reproducible delays, for tests
    pub fn seeded(max: Duration, seed: u64) -> Self {
        Self {
            max,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::seeded(Duration::ZERO, 0)
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn next_delay(&mut self) -> Duration {
        let max_nanos = u64::try_from(self.max.as_nanos()).unwrap_or(u64::MAX);
        if max_nanos == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.rng.random_range(0..max_nanos))
    }

    /// Sleep the current thread for the next delay. Never call with a lock held.
    pub fn pause(&mut self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
