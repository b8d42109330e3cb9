//! Frame clock measuring wall-clock delta between frame callbacks

/// Tracks frame timestamps supplied by the host and derives per-frame deltas.
///
/// Times are host milliseconds (the value a frame callback receives). The clock
/// does not read the system time itself, so headless hosts can drive it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total elapsed time since `reset` in milliseconds
    pub total_ms: f64,
    /// Time between the last two ticks in milliseconds
    pub delta_ms: f64,
    /// Upper bound applied to a single delta, if any
    pub max_delta_ms: Option<f64>,
    /// Number of ticks since `reset`
    pub frames: u64,
    last_ms: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_ms: 0.0,
            delta_ms: 0.0,
            max_delta_ms: None,
            frames: 0,
            last_ms: 0.0,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock that clamps any single delta to `max_delta_ms`
    pub fn with_max_delta(max_delta_ms: f64) -> Self {
        Self {
            max_delta_ms: Some(max_delta_ms),
            ..Self::default()
        }
    }

    /// Restart measurement from `now_ms`. Call when the frame loop starts.
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = now_ms;
        self.total_ms = 0.0;
        self.delta_ms = 0.0;
        self.frames = 0;
    }

    /// Record a frame at `now_ms` and return the delta since the previous one.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let mut delta = (now_ms - self.last_ms).max(0.0);
        if let Some(max) = self.max_delta_ms {
            delta = delta.min(max);
        }
        self.last_ms = now_ms;
        self.delta_ms = delta;
        self.total_ms += delta;
        self.frames += 1;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.total_ms, 0.0);
        assert_eq!(clock.delta_ms, 0.0);
        assert_eq!(clock.frames, 0);
        assert!(clock.max_delta_ms.is_none());
    }

    #[test]
    fn test_tick_measures_from_reset() {
        let mut clock = FrameClock::new();
        clock.reset(100.0);
        assert_eq!(clock.tick(116.0), 16.0);
        assert_eq!(clock.tick(150.0), 34.0);
        assert_eq!(clock.total_ms, 50.0);
        assert_eq!(clock.frames, 2);
    }

    #[test]
    fn test_backwards_time_is_zero_delta() {
        let mut clock = FrameClock::new();
        clock.reset(100.0);
        assert_eq!(clock.tick(90.0), 0.0);
    }

    #[test]
    fn test_max_delta_clamp() {
        let mut clock = FrameClock::with_max_delta(250.0);
        clock.reset(0.0);
        assert_eq!(clock.tick(1000.0), 250.0);
    }
}
