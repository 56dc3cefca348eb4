//! Random source for fallback weather, failure injection and reference suffixes.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

pub trait RandomSource: Send {
    /// Uniform integer in `low..high`. Returns `low` when the range is empty.
    fn below(&mut self, low: u32, high: u32) -> u32;

    /// Uniform float in `0.0..1.0`
    fn unit(&mut self) -> f64;
}

/// Thread-local entropy, used in production wiring
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        rand::rng().random_range(low..high)
    }

    fn unit(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Reproducible sequence for tests
#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        let first: Vec<u32> = (0..16).map(|_| a.below(0, 1000)).collect();
        let second: Vec<u32> = (0..16).map(|_| b.below(0, 1000)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ranges_are_respected() {
        let mut rng = ThreadRandom;
        for _ in 0..200 {
            let v = rng.below(40, 80);
            assert!((40..80).contains(&v));
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
        assert_eq!(rng.below(5, 5), 5);
    }
}
