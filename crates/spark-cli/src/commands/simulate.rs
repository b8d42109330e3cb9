//! Run an effect on a virtual clock and report particle counts over time

use super::{Effect, OutputFormat, Pattern, Session, SessionOptions};
use anyhow::{bail, Result};
use serde::Serialize;
use spark_particles::{RecordingSurface, Surface};
use std::path::PathBuf;

pub struct SimulateArgs {
    pub effect: String,
    pub config: Option<PathBuf>,
    pub constrained: bool,
    pub duration_ms: f64,
    pub sample_ms: f64,
    pub pattern: Pattern,
    pub angle: f32,
    pub seed: Option<u64>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub time_ms: f64,
    pub active: usize,
    pub pooled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub effect: String,
    pub constrained: bool,
    pub duration_ms: f64,
    /// Particles born by the initial emission
    pub initial: usize,
    pub emitted: u64,
    pub expired: u64,
    pub cleared: u64,
    pub frames: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<f64>,
    pub samples: Vec<Sample>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    for (flag, value) in [("--duration-ms", args.duration_ms), ("--sample-ms", args.sample_ms)] {
        if !value.is_finite() || value <= 0.0 {
            bail!("{flag} must be a positive finite number, got {value}");
        }
    }
    let options = SessionOptions {
        config: args.config.as_deref(),
        constrained: args.constrained,
        seed: args.seed,
    };
    let surface = RecordingSurface::new(args.width as f32, args.height as f32);
    let mut session = Session::open(surface, &options)?;
    let effect = session.resolve(&args.effect, args.pattern, args.angle)?;

    let report = simulate(&mut session, &effect, args.duration_ms, args.sample_ms);
    session.close();

    let out = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
        OutputFormat::Toml => toml::to_string_pretty(&report)?,
        OutputFormat::Text => format_text(&report),
    };
    print!("{}", out);
    Ok(())
}

/// Play `effect` at time zero and sample the engine every `sample_ms`
pub fn simulate<S: Surface>(
    session: &mut Session<S>,
    effect: &Effect,
    duration_ms: f64,
    sample_ms: f64,
) -> SimulationReport {
    let initial = session.play(effect);
    tracing::debug!("{} emitted {initial} particles", effect.label());

    let mut samples = Vec::new();
    let mut t = 0.0;
    loop {
        session.run_until(t);
        samples.push(Sample {
            time_ms: t,
            active: session.engine.active_count(),
            pooled: session.engine.pool().available(),
        });
        if t >= duration_ms {
            break;
        }
        t = (t + sample_ms).min(duration_ms);
    }

    let stats = session.engine.stats();
    SimulationReport {
        effect: effect.label().to_string(),
        constrained: session.engine.is_constrained(),
        duration_ms,
        initial,
        emitted: stats.emitted,
        expired: stats.expired,
        cleared: stats.cleared,
        frames: stats.frames,
        completed_at_ms: session.completed_at_ms(),
        samples,
    }
}

fn format_text(report: &SimulationReport) -> String {
    let mut out = format!(
        "Effect: {}{}\n",
        report.effect,
        if report.constrained { " (constrained)" } else { "" }
    );
    out.push_str(&format!("Initial emission: {} particles\n\n", report.initial));
    out.push_str(&format!("{:>8}  {:>6}  {:>6}\n", "TIME", "ACTIVE", "POOLED"));
    for s in &report.samples {
        out.push_str(&format!(
            "{:>6}ms  {:>6}  {:>6}\n",
            s.time_ms, s.active, s.pooled
        ));
    }
    out.push_str(&format!(
        "\nFrames: {}  Emitted: {}  Expired: {}  Cleared: {}\n",
        report.frames, report.emitted, report.expired, report.cleared
    ));
    if let Some(t) = report.completed_at_ms {
        out.push_str(&format!("Completed at {}ms\n", t));
    }
    out
}
