//! Simulated latency and failure injection for the connect handshake.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// An injected transient failure.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Connection failed")]
pub struct SimulatedFault;

/// Decides how long a handshake takes and whether it fails.
#[async_trait]
pub trait FaultInjector: Send + Sync {
    /// Waits out the simulated latency, then reports the outcome.
    async fn inject(&self) -> Result<(), SimulatedFault>;
}

/// Fixed delay followed by a random failure.
#[derive(Debug)]
pub struct RandomFaultInjector {
    delay: Duration,
    failure_probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomFaultInjector {
    /// Creates an injector seeded from OS entropy.
    ///
    /// `failure_probability` is clamped to `[0, 1]`.
    pub fn new(delay: Duration, failure_probability: f64) -> Self {
        Self::from_rng(delay, failure_probability, StdRng::from_entropy())
    }

    /// Creates a reproducible injector.
    pub fn with_seed(delay: Duration, failure_probability: f64, seed: u64) -> Self {
        Self::from_rng(delay, failure_probability, StdRng::seed_from_u64(seed))
    }

    fn from_rng(delay: Duration, failure_probability: f64, rng: StdRng) -> Self {
        let failure_probability = if failure_probability.is_nan() {
            0.0
        } else {
            failure_probability.clamp(0.0, 1.0)
        };

        Self {
            delay,
            failure_probability,
            rng: Mutex::new(rng),
        }
    }

    /// Draws one outcome without waiting. `true` means the attempt fails.
    pub fn roll(&self) -> bool {
        self.rng.lock().gen_bool(self.failure_probability)
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub const fn failure_probability(&self) -> f64 {
        self.failure_probability
    }
}

#[async_trait]
impl FaultInjector for RandomFaultInjector {
    async fn inject(&self) -> Result<(), SimulatedFault> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.roll() {
            Err(SimulatedFault)
        } else {
            Ok(())
        }
    }
}

/// Injector with a predetermined outcome. Counts how often it was reached.
#[derive(Debug, Default)]
pub struct FixedFaultInjector {
    delay: Duration,
    fail: bool,
    calls: AtomicUsize,
}

impl FixedFaultInjector {
    /// Never fails, no delay.
    pub fn healthy() -> Self {
        Self::default()
    }

    /// Always fails, no delay.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of handshakes that reached this injector.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FaultInjector for FixedFaultInjector {
    async fn inject(&self) -> Result<(), SimulatedFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail { Err(SimulatedFault) } else { Ok(()) }
    }
}
