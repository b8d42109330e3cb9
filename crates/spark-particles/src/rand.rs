//! Sampling helpers over a small, seedable PRNG

use ::rand::rngs::SmallRng;
use ::rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

pub struct ParticleRng {
    inner: SmallRng,
}

impl ParticleRng {
    /// Deterministic generator; the same seed yields the same effect
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Returns a float in [min, max); `min` when the range is empty
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.next_f32() * (max - min)
    }

    /// Returns a float in [-width/2, width/2)
    pub fn centered(&mut self, width: f32) -> f32 {
        (self.next_f32() - 0.5) * width
    }

    /// Returns an angle in [0, 2π)
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    /// Uniformly pick one element, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.inner.random_range(0..items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(5.0, 15.0);
            assert!((5.0..15.0).contains(&v));
        }
        assert_eq!(rng.range(3.0, 3.0), 3.0);
    }

    #[test]
    fn rng_centered_bounds() {
        let mut rng = ParticleRng::new(7);
        for _ in 0..1000 {
            let v = rng.centered(10.0);
            assert!((-5.0..5.0).contains(&v));
        }
    }

    #[test]
    fn rng_angle_bounds() {
        let mut rng = ParticleRng::new(123);
        for _ in 0..1000 {
            let a = rng.angle();
            assert!((0.0..TAU).contains(&a));
        }
    }

    #[test]
    fn pick_covers_all_items() {
        let mut rng = ParticleRng::new(99);
        let items = ["a", "b", "c"];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let v = rng.pick(&items).unwrap();
            let idx = items.iter().position(|i| i == v).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert!(rng.pick::<u8>(&[]).is_none());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ParticleRng::new(5);
        let mut b = ParticleRng::new(5);
        for _ in 0..10 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }
}
