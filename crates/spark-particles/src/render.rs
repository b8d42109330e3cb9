//! Draws active particles onto a surface: trail, then glow, then body

use crate::particle::Particle;
use crate::surface::{ColorStop, StopColor, Surface};

/// Trail opacity relative to the particle's alpha
pub const TRAIL_OPACITY: f32 = 0.3;
/// Trail stroke width relative to particle size
pub const TRAIL_WIDTH_SCALE: f32 = 0.5;
/// Glow opacity relative to the particle's alpha
pub const GLOW_OPACITY: f32 = 0.5;
/// Glow radius relative to particle size
pub const GLOW_RADIUS_SCALE: f32 = 3.0;

/// Draw every particle. Reads the particles only.
pub fn render<S: Surface + ?Sized>(particles: &[Particle], surface: &mut S) {
    for p in particles {
        render_particle(p, surface);
    }
}

pub fn render_particle<S: Surface + ?Sized>(p: &Particle, surface: &mut S) {
    if p.trail.len() >= 2 {
        surface.stroke_path(
            &p.trail,
            &p.color,
            p.alpha * TRAIL_OPACITY,
            p.size * TRAIL_WIDTH_SCALE,
        );
    }

    if p.glow {
        let stops = [
            ColorStop {
                offset: 0.0,
                color: StopColor::Solid(p.color.clone()),
            },
            ColorStop {
                offset: 1.0,
                color: StopColor::Transparent,
            },
        ];
        surface.fill_radial_gradient(
            p.position,
            p.size * GLOW_RADIUS_SCALE,
            &stops,
            p.alpha * GLOW_OPACITY,
        );
    }

    match p.rotation {
        Some(rotation) => {
            surface.fill_rect_rotated(p.position, p.size, p.size, rotation.angle, &p.color, p.alpha)
        }
        None => surface.fill_circle(p.position, p.size, &p.color, p.alpha),
    }
}
