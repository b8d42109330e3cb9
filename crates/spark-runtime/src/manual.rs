//! Deterministic scheduler driven by explicit time advancement

use crate::scheduler::{FrameHandle, FrameScheduler, TimerHandle, TimerScheduler, Wakeup};

/// Shortest interval period accepted; smaller periods are raised to this.
const MIN_PERIOD_MS: f64 = 1.0;

#[derive(Debug, Clone)]
struct PendingTimer {
    handle: TimerHandle,
    due_ms: f64,
    period_ms: Option<f64>,
}

/// Single-threaded scheduler whose clock only moves when the host polls it.
///
/// Frames fire on multiples of `frame_interval_ms` (a virtual vsync). Timers
/// fire at their exact due time. When a frame and timers are due at the same
/// instant, timers are reported first.
///
/// ```ignore
/// while let Some(wakeups) = scheduler.poll_until(deadline) {
///     for wakeup in wakeups {
///         // forward to the owner of the handle
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    now_ms: f64,
    frame_interval_ms: f64,
    next_id: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<PendingTimer>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl ManualScheduler {
    pub fn new(frame_interval_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_interval_ms: frame_interval_ms.max(MIN_PERIOD_MS),
            next_id: 1,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Number of frame requests not yet fired or cancelled
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of live intervals and unfired timeouts
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// True when no frame or timer is outstanding
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty() && self.timers.is_empty()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn next_frame_ms(&self) -> Option<f64> {
        if self.frames.is_empty() {
            return None;
        }
        let boundary = (self.now_ms / self.frame_interval_ms).floor() + 1.0;
        Some(boundary * self.frame_interval_ms)
    }

    fn next_timer_ms(&self) -> Option<f64> {
        self.timers.iter().map(|t| t.due_ms).reduce(f64::min)
    }

    /// Move the clock to the next due event, if it is no later than `deadline_ms`,
    /// and return everything that fires at that instant.
    ///
    /// Returns `None` once nothing else is due before the deadline; the clock
    /// is then left at `deadline_ms`.
    pub fn poll_until(&mut self, deadline_ms: f64) -> Option<Vec<Wakeup>> {
        let frame_at = self.next_frame_ms();
        let next = match (frame_at, self.next_timer_ms()) {
            (Some(f), Some(t)) => f.min(t),
            (Some(f), None) => f,
            (None, Some(t)) => t,
            (None, None) => {
                self.now_ms = self.now_ms.max(deadline_ms);
                return None;
            }
        };
        if next > deadline_ms {
            self.now_ms = self.now_ms.max(deadline_ms);
            return None;
        }
        self.now_ms = self.now_ms.max(next);
        let now = self.now_ms;

        let mut wakeups = Vec::new();

        self.timers
            .sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.handle.cmp(&b.handle)));
        for timer in &mut self.timers {
            if timer.due_ms <= now {
                wakeups.push(Wakeup::Timer {
                    handle: timer.handle,
                    time_ms: now,
                });
                if let Some(period) = timer.period_ms {
                    timer.due_ms += period;
                }
            }
        }
        self.timers
            .retain(|t| t.period_ms.is_some() || t.due_ms > now);

        if frame_at.is_some_and(|f| f <= now) {
            for handle in self.frames.drain(..) {
                wakeups.push(Wakeup::Frame {
                    handle,
                    time_ms: now,
                });
            }
        }

        Some(wakeups)
    }
}

impl FrameScheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
    }
}

impl TimerScheduler for ManualScheduler {
    fn set_interval(&mut self, period_ms: f64) -> TimerHandle {
        let period = period_ms.max(MIN_PERIOD_MS);
        let handle = TimerHandle(self.next_id());
        self.timers.push(PendingTimer {
            handle,
            due_ms: self.now_ms + period,
            period_ms: Some(period),
        });
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }

    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push(PendingTimer {
            handle,
            due_ms: self.now_ms + delay_ms.max(0.0),
            period_ms: None,
        });
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}
