//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_index(&self, len: usize) -> usize {
        use rand::Rng;
        rand::thread_rng().gen_range(0..len)
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing.
///
/// `gen_range` returns the fixed value clamped into the requested range;
/// `gen_index` returns the fixed value modulo the length.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.0.clamp(min, max)
    }

    fn gen_index(&self, len: usize) -> usize {
        self.0.unsigned_abs() as usize % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_random_stays_in_range() {
        let random = SystemRandom::new();
        for _ in 0..200 {
            let value = random.gen_range(-15, 15);
            assert!((-15..=15).contains(&value));
            assert!(random.gen_index(4) < 4);
        }
    }

    #[test]
    fn test_fixed_random_clamps() {
        let random = FixedRandom(40);
        assert_eq!(random.gen_range(-15, 15), 15);
        assert_eq!(random.gen_index(5), 0);
    }
}
