//! Particle birth: explosion, trail and flow emission patterns

use crate::particle::{Particle, ParticlePool, Rotation};
use crate::profile::EmissionProfile;
use crate::rand::ParticleRng;
use spark_core::Vec2;
use std::f32::consts::TAU;

/// Particles emitted per trail call on constrained hosts
pub const CONSTRAINED_TRAIL_COUNT: u32 = 2;

/// Half-extent of the square a trail particle's start position is jittered within
pub const TRAIL_JITTER: f32 = 5.0;

/// Explosion particles spin at up to this many radians per frame either way
const MAX_SPIN: f32 = 0.1;

/// Borrowed view of an engine's emission state
pub struct Emitter<'a> {
    pub pool: &'a mut ParticlePool,
    pub active: &'a mut Vec<Particle>,
    pub rng: &'a mut ParticleRng,
    /// Halves counts and disables glow and trails
    pub constrained: bool,
}

impl Emitter<'_> {
    /// Radial burst around `origin`. Particle `i` of `n` heads along
    /// `2π·i/n` plus jitter of up to half the profile's spread either way.
    pub fn explosion(&mut self, origin: Vec2, profile: &EmissionProfile) -> usize {
        let count = if self.constrained {
            profile.count / 2
        } else {
            profile.count
        };
        if count == 0 {
            return 0;
        }
        let spread = profile.spread_or_default();

        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + self.rng.centered(spread);
            let mut p = self.birth(origin, angle, profile);
            p.rotation = Some(Rotation {
                angle: self.rng.angle(),
                speed: self.rng.centered(MAX_SPIN * 2.0),
            });
            self.active.push(p);
        }
        count as usize
    }

    /// Small burst at random angles around a jittered `origin`, for cursor-follow effects
    pub fn trail(&mut self, origin: Vec2, profile: &EmissionProfile) -> usize {
        let count = if self.constrained {
            CONSTRAINED_TRAIL_COUNT
        } else {
            profile.count
        };

        for _ in 0..count {
            let angle = self.rng.angle();
            let jitter = Vec2::new(
                self.rng.centered(TRAIL_JITTER * 2.0),
                self.rng.centered(TRAIL_JITTER * 2.0),
            );
            let p = self.birth(origin + jitter, angle, profile);
            self.active.push(p);
        }
        count as usize
    }

    /// Exactly one particle along `angle`; never affected by gravity
    pub fn flow(&mut self, origin: Vec2, angle: f32, profile: &EmissionProfile) -> usize {
        let mut p = self.birth(origin, angle, profile);
        p.gravity = false;
        self.active.push(p);
        1
    }

    /// Acquire a record and fill the fields every pattern samples the same way
    fn birth(&mut self, position: Vec2, angle: f32, profile: &EmissionProfile) -> Particle {
        let speed = self.rng.range(profile.speed[0], profile.speed[1]);
        let size = self.rng.range(profile.size[0], profile.size[1]);

        let mut p = self.pool.acquire();
        p.position = position;
        p.velocity = Vec2::new(angle.cos() * speed, angle.sin() * speed);
        p.life = profile.lifespan as f32;
        p.max_life = profile.lifespan as f32;
        p.size = size;
        if let Some(color) = self.rng.pick(&profile.colors) {
            p.color = color.clone();
        }
        p.gravity = profile.gravity;
        p.glow = profile.glow && !self.constrained;
        p.trail_enabled = profile.trail && !self.constrained;
        p.trail.clear();
        p.alpha = 1.0;
        p.rotation = None;
        p
    }
}
