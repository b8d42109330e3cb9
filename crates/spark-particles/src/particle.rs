//! Particle records and the recycling pool that owns idle ones

use spark_core::{Color, Vec2};

/// Maximum number of positions kept in a particle's trail
pub const MAX_TRAIL_LEN: usize = 10;

/// Default number of records preallocated by a pool
pub const DEFAULT_POOL_CAPACITY: usize = 1000;

/// Orientation of a non-circular particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Current angle in radians
    pub angle: f32,
    /// Radians per frame-equivalent
    pub speed: f32,
}

/// One simulated point.
///
/// A record lives either in a [`ParticlePool`] free list or in an engine's
/// active list. Moving it between the two is the only way to change owner,
/// so it can never be in both.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining lifetime in milliseconds
    pub life: f32,
    /// Total lifetime in milliseconds
    pub max_life: f32,
    pub size: f32,
    pub color: Color,
    /// Recent positions, oldest first
    pub trail: Vec<Vec2>,
    pub gravity: bool,
    pub glow: bool,
    pub trail_enabled: bool,
    /// `life / max_life`, clamped at 0
    pub alpha: f32,
    pub rotation: Option<Rotation>,
}

impl Particle {
    /// An inert record, as stored in the pool
    pub fn dead() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            life: 0.0,
            max_life: 0.0,
            size: 0.0,
            color: Color::default(),
            trail: Vec::with_capacity(MAX_TRAIL_LEN + 1),
            gravity: false,
            glow: false,
            trail_enabled: false,
            alpha: 0.0,
            rotation: None,
        }
    }

    /// Zero every field but keep the trail's allocation
    fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.life = 0.0;
        self.max_life = 0.0;
        self.size = 0.0;
        self.trail.clear();
        self.gravity = false;
        self.glow = false;
        self.trail_enabled = false;
        self.alpha = 0.0;
        self.rotation = None;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining fraction of life in [0, 1]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    /// Append the current position to the trail, dropping the oldest entries
    /// beyond [`MAX_TRAIL_LEN`].
    pub fn record_trail(&mut self) {
        self.trail.push(self.position);
        if self.trail.len() > MAX_TRAIL_LEN {
            let excess = self.trail.len() - MAX_TRAIL_LEN;
            self.trail.drain(..excess);
        }
    }
}

/// LIFO free list of idle particle records.
///
/// `capacity` bounds how many idle records are retained, not how many can be
/// active at once: `acquire` on an empty pool builds a fresh record, and
/// `release` into a full pool drops the record.
pub struct ParticlePool {
    free: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        let mut free = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            free.push(Particle::dead());
        }
        Self { free, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of idle records ready for reuse
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Take an idle record, or build one if the free list is empty.
    pub fn acquire(&mut self) -> Particle {
        self.free.pop().unwrap_or_else(Particle::dead)
    }

    /// Return a record. Returns `false` if the pool was full and the record was dropped.
    pub fn release(&mut self, mut particle: Particle) -> bool {
        if self.free.len() >= self.capacity {
            return false;
        }
        particle.reset();
        self.free.push(particle);
        true
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_preallocates_capacity() {
        let pool = ParticlePool::new(4);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.available(), 4);
        assert_eq!(ParticlePool::default().available(), DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn pool_acquire_past_empty_builds_fresh_records() {
        let mut pool = ParticlePool::new(2);
        let a = pool.acquire();
        let b = pool.acquire();
        let c = pool.acquire();
        assert_eq!(pool.available(), 0);
        assert!(!c.is_alive());

        assert!(pool.release(a));
        assert!(pool.release(b));
        // Full again: the third record is dropped
        assert!(!pool.release(c));
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn pool_bound_holds_for_any_sequence() {
        let mut pool = ParticlePool::new(8);
        let mut held = Vec::new();
        for round in 0..50 {
            let take = (round * 7) % 13;
            for _ in 0..take {
                held.push(pool.acquire());
            }
            let give = (round * 5) % 11;
            for _ in 0..give.min(held.len()) {
                if let Some(p) = held.pop() {
                    pool.release(p);
                }
            }
            assert!(pool.available() <= pool.capacity());
        }
    }

    #[test]
    fn release_clears_trail_and_fields() {
        let mut pool = ParticlePool::new(1);
        let mut p = pool.acquire();
        p.life = 500.0;
        p.max_life = 1000.0;
        p.glow = true;
        p.rotation = Some(Rotation {
            angle: 1.0,
            speed: 0.1,
        });
        p.position = Vec2::new(3.0, 4.0);
        p.record_trail();
        p.record_trail();
        assert!(pool.release(p));

        let p = pool.acquire();
        assert!(p.trail.is_empty());
        assert!(!p.glow);
        assert!(p.rotation.is_none());
        assert_eq!(p.life, 0.0);
        assert_eq!(p.position, Vec2::ZERO);
    }

    #[test]
    fn trail_is_a_sliding_window() {
        let mut p = Particle::dead();
        for i in 0..25 {
            p.position = Vec2::new(i as f32, 0.0);
            p.record_trail();
            assert!(p.trail.len() <= MAX_TRAIL_LEN);
        }
        assert_eq!(p.trail.len(), MAX_TRAIL_LEN);
        assert_eq!(p.trail[0].x, 15.0);
        assert_eq!(p.trail[MAX_TRAIL_LEN - 1].x, 24.0);
    }

    #[test]
    fn life_ratio_guards_zero_max_life() {
        let p = Particle::dead();
        assert_eq!(p.life_ratio(), 0.0);
    }
}
