//! Frame and timer scheduling primitives provided by the host
//!
//! Callbacks are replaced by handles: the host reports which handle fired as a
//! [`Wakeup`] and forwards it to the owner. Owners keep the handles they hold
//! and ignore wakeups for handles they have already cancelled.

use std::fmt;

/// Handle for one requested frame callback
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct FrameHandle(pub u64);

/// Handle for one interval or timeout
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct TimerHandle(pub u64);

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameHandle({})", self.0)
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerHandle({})", self.0)
    }
}

/// A fired frame or timer, reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wakeup {
    Frame { handle: FrameHandle, time_ms: f64 },
    Timer { handle: TimerHandle, time_ms: f64 },
}

/// `requestAnimationFrame`-style primitive
pub trait FrameScheduler {
    /// Current host time in milliseconds
    fn now_ms(&self) -> f64;

    /// Request a single callback on the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending frame. Cancelling a fired or unknown handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// `setInterval` / `setTimeout`-style primitive
pub trait TimerScheduler {
    /// Fire repeatedly every `period_ms` until cleared
    fn set_interval(&mut self, period_ms: f64) -> TimerHandle;

    fn clear_interval(&mut self, handle: TimerHandle);

    /// Fire once after `delay_ms`
    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle;

    fn clear_timeout(&mut self, handle: TimerHandle);
}
