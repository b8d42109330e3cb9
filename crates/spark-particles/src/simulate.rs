//! Simulation step: integrates motion and lifetime of active particles

use crate::particle::{Particle, ParticlePool};
use serde::{Deserialize, Serialize};

/// Physics constants for one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParams {
    /// Reference frame length; motion is scaled by `delta / frame_interval_ms`
    pub frame_interval_ms: f32,
    /// Downward acceleration per frame-equivalent for gravity particles
    pub gravity: f32,
    /// Velocity multiplier applied once per step
    pub friction: f32,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16.0,
            gravity: 0.3,
            friction: 0.98,
        }
    }
}

/// Advance one particle. Returns `false` once it has expired.
///
/// Motion is time-dilated by `dt = delta_ms / frame_interval_ms`, while life
/// decays by raw `delta_ms`.
pub fn advance(p: &mut Particle, delta_ms: f32, params: &StepParams) -> bool {
    let dt = delta_ms / params.frame_interval_ms;

    p.position.x += p.velocity.x * dt;
    p.position.y += p.velocity.y * dt;

    if p.gravity {
        p.velocity.y += params.gravity * dt;
    }

    p.velocity.x *= params.friction;
    p.velocity.y *= params.friction;

    if let Some(rotation) = p.rotation.as_mut() {
        rotation.angle += rotation.speed * dt;
    }

    if p.trail_enabled {
        p.record_trail();
    }

    p.life -= delta_ms;
    p.alpha = if p.max_life > 0.0 {
        (p.life / p.max_life).max(0.0)
    } else {
        0.0
    };

    p.life > 0.0
}

/// Advance every active particle and move expired ones back to the pool.
/// Returns the number of particles that expired.
///
/// Iterates from the back so `swap_remove` only ever pulls in an element that
/// has already been stepped.
pub fn step(
    active: &mut Vec<Particle>,
    pool: &mut ParticlePool,
    delta_ms: f32,
    params: &StepParams,
) -> usize {
    let mut expired = 0;
    for i in (0..active.len()).rev() {
        if !advance(&mut active[i], delta_ms, params) {
            let dead = active.swap_remove(i);
            pool.release(dead);
            expired += 1;
        }
    }
    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Rotation, MAX_TRAIL_LEN};
    use spark_core::Vec2;

    fn live(life: f32) -> Particle {
        let mut p = Particle::dead();
        p.life = life;
        p.max_life = life;
        p.alpha = 1.0;
        p.size = 2.0;
        p
    }

    #[test]
    fn motion_is_integrated_before_gravity_and_friction() {
        let params = StepParams::default();
        let mut p = live(1000.0);
        p.velocity = Vec2::new(10.0, 0.0);
        p.gravity = true;

        assert!(advance(&mut p, 16.0, &params));
        // Position uses the velocity from before this step's forces
        assert!((p.position.x - 10.0).abs() < 1e-6);
        assert_eq!(p.position.y, 0.0);
        assert!((p.velocity.x - 9.8).abs() < 1e-5);
        assert!((p.velocity.y - 0.3 * 0.98).abs() < 1e-6);
    }

    #[test]
    fn motion_scales_with_frame_ratio_but_life_does_not() {
        let params = StepParams::default();
        let mut p = live(1000.0);
        p.velocity = Vec2::new(1.0, 0.0);
        advance(&mut p, 32.0, &params);
        assert!((p.position.x - 2.0).abs() < 1e-6);
        assert_eq!(p.life, 968.0);
    }

    #[test]
    fn friction_applies_without_gravity() {
        let params = StepParams::default();
        let mut p = live(1000.0);
        p.velocity = Vec2::new(0.0, -5.0);
        advance(&mut p, 16.0, &params);
        assert!((p.velocity.y + 4.9).abs() < 1e-5);
    }

    #[test]
    fn rotation_advances_by_dt() {
        let params = StepParams::default();
        let mut p = live(1000.0);
        p.rotation = Some(Rotation {
            angle: 0.0,
            speed: 0.1,
        });
        advance(&mut p, 48.0, &params);
        let r = p.rotation.unwrap();
        assert!((r.angle - 0.3).abs() < 1e-6);
    }

    #[test]
    fn alpha_is_monotonic_and_reaches_zero() {
        let params = StepParams::default();
        let mut p = live(100.0);
        let mut last = p.alpha;
        let mut steps = 0;
        while advance(&mut p, 16.0, &params) {
            assert!(p.alpha <= last);
            last = p.alpha;
            steps += 1;
        }
        assert_eq!(steps, 6);
        assert_eq!(p.alpha, 0.0);
        assert!(p.life <= 0.0);
    }

    #[test]
    fn trail_only_recorded_when_enabled() {
        let params = StepParams::default();
        let mut plain = live(10_000.0);
        let mut trailed = live(10_000.0);
        trailed.trail_enabled = true;
        for _ in 0..100 {
            advance(&mut plain, 16.0, &params);
            advance(&mut trailed, 16.0, &params);
            assert!(trailed.trail.len() <= MAX_TRAIL_LEN);
        }
        assert!(plain.trail.is_empty());
        assert_eq!(trailed.trail.len(), MAX_TRAIL_LEN);
    }

    #[test]
    fn step_removes_expired_without_skipping() {
        let params = StepParams::default();
        let mut pool = ParticlePool::new(10);
        // Alternate short- and long-lived particles
        let mut active: Vec<Particle> = (0..10)
            .map(|i| live(if i % 2 == 0 { 10.0 } else { 1000.0 }))
            .collect();

        let expired = step(&mut active, &mut pool, 16.0, &params);
        assert_eq!(expired, 5);
        assert_eq!(active.len(), 5);
        // Every survivor was stepped exactly once
        assert!(active.iter().all(|p| p.life == 984.0));
    }

    #[test]
    fn step_respects_pool_capacity() {
        let params = StepParams::default();
        let mut pool = ParticlePool::new(2);
        let mut active: Vec<Particle> = (0..5).map(|_| live(1.0)).collect();
        assert_eq!(step(&mut active, &mut pool, 16.0, &params), 5);
        assert!(active.is_empty());
        assert_eq!(pool.available(), 2);
    }
}
