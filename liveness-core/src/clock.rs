//! Injected time and randomness sources.
//!
//! Expiry comparisons and challenge-id sampling both go through a trait
//! boundary instead of calling `Utc::now()` / the thread RNG directly, so
//! tests can substitute a fixed clock and a deterministic RNG and get
//! reproducible results, matching the pack's preference for explicit
//! dependency injection over ambient globals.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests: starts at a fixed instant and only
/// advances when explicitly told to.
#[derive(Clone)]
pub struct FixedClock {
    inner: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.inner.lock().unwrap();
        *guard += delta;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.inner.lock().unwrap() = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.inner.lock().unwrap()
    }
}

/// Source of cryptographically secure randomness for challenge ids and
/// step sampling.
pub trait SecureRng: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl SecureRng for OsRandom {
    fn fill(&self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}

/// Fixed-seed RNG used by tests that need reproducible sampling.
pub struct SeededRng {
    inner: Mutex<rand::rngs::StdRng>,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            inner: Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl SecureRng for SeededRng {
    fn fill(&self, buf: &mut [u8]) {
        self.inner.lock().unwrap().fill_bytes(buf);
    }
}
