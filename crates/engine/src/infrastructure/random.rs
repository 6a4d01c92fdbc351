//! Random implementations.

use rand::Rng;

use crate::infrastructure::ports::RandomPort;

/// System random - uses real randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Random that always draws the same value.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_random_stays_in_range() {
        let random = SystemRandom::new();
        for _ in 0..200 {
            let value = random.gen_range(-1, 1);
            assert!((-1..=1).contains(&value));
        }
    }
}
