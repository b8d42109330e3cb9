//! Headless effect-to-PNG render command

use super::{Pattern, Session, SessionOptions};
use crate::raster::ImageSurface;
use anyhow::{bail, Result};
use image::Rgba;
use std::path::{Path, PathBuf};

pub struct RenderArgs {
    pub effect: String,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub at_ms: f64,
    pub constrained: bool,
    pub config: Option<PathBuf>,
    pub pattern: Pattern,
    pub angle: f32,
    pub seed: Option<u64>,
    pub transparent: bool,
}

pub fn run(args: RenderArgs) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        bail!("--width and --height must be non-zero");
    }
    if !args.at_ms.is_finite() || args.at_ms < 0.0 {
        bail!("--at-ms must be a non-negative finite number, got {}", args.at_ms);
    }

    let surface = if args.transparent {
        ImageSurface::with_background(args.width, args.height, Rgba([0, 0, 0, 0]))
    } else {
        ImageSurface::new(args.width, args.height)
    };
    let options = SessionOptions {
        config: args.config.as_deref(),
        constrained: args.constrained,
        seed: args.seed,
    };
    let mut session = Session::open(surface, &options)?;
    let effect = session.resolve(&args.effect, args.pattern, args.angle)?;

    let emitted = session.play(&effect);
    println!("Playing '{}': {} particles", effect.label(), emitted);
    let frame = render_at(&mut session, args.at_ms);
    let engine = session.close();
    println!(
        "Rendered frame at {}ms: {} active particles",
        args.at_ms,
        engine.active_count()
    );

    write(frame.as_ref().or(engine.surface()), &args.output)?;
    println!("Saved to {}", args.output.display());
    Ok(())
}

/// Advance to `at_ms`. The surface then holds the last frame drawn at or
/// before that time; at time zero nothing has been drawn yet, so the
/// current particles are painted directly into a fresh copy.
fn render_at(session: &mut Session<ImageSurface>, at_ms: f64) -> Option<ImageSurface> {
    session.run_until(at_ms);
    if session.engine.stats().frames > 0 {
        return None;
    }
    let size = session.engine.viewport();
    let mut fresh = ImageSurface::new(size.x as u32, size.y as u32);
    spark_particles::render::render(session.engine.particles(), &mut fresh);
    Some(fresh)
}

fn write(surface: Option<&ImageSurface>, output: &Path) -> Result<()> {
    match surface {
        Some(surface) => surface.save(output),
        None => bail!("engine has no surface to save"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(output: PathBuf, effect: &str, at_ms: f64) -> RenderArgs {
        RenderArgs {
            effect: effect.to_string(),
            output,
            width: 64,
            height: 48,
            at_ms,
            constrained: false,
            config: None,
            pattern: Pattern::Explosion,
            angle: 0.0,
            seed: Some(5),
            transparent: false,
        }
    }

    fn lit_pixels(path: &Path) -> usize {
        let img = image::open(path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (64, 48));
        img.pixels().filter(|p| p[0] > 0 || p[1] > 0 || p[2] > 0).count()
    }

    #[test]
    fn renders_explosion_mid_flight() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explosion.png");
        run(args(path.clone(), "explosion", 48.0)).unwrap();
        assert!(lit_pixels(&path) > 0);
    }

    #[test]
    fn time_zero_shows_the_initial_burst() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("start.png");
        run(args(path.clone(), "explosion", 0.0)).unwrap();
        assert!(lit_pixels(&path) > 0);
    }

    #[test]
    fn after_expiry_the_frame_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.png");
        run(args(path.clone(), "hover", 2000.0)).unwrap();
        assert_eq!(lit_pixels(&path), 0);
    }

    #[test]
    fn non_finite_capture_time_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for at_ms in [f64::INFINITY, f64::NAN, -1.0] {
            let path = dir.path().join("never.png");
            let err = run(args(path.clone(), "explosion", at_ms)).unwrap_err();
            assert!(err.to_string().contains("--at-ms"), "{err}");
            assert!(!path.exists());
        }
    }

    #[test]
    fn unknown_effect_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(args(dir.path().join("x.png"), "confetti", 10.0));
        assert!(result.is_err());
    }
}
