//! Spark Runtime - Frame loop infrastructure
//!
//! Provides the host-facing building blocks the particle engine schedules against:
//! - `FrameClock` - measures per-frame delta time in milliseconds
//! - `FrameScheduler` / `TimerScheduler` - frame and timer primitives owned by the host
//! - `ManualScheduler` - deterministic single-threaded scheduler for headless hosts and tests
//! - `Haptics` - optional vibration collaborator, invoked best-effort

mod clock;
mod haptics;
mod manual;
mod scheduler;

pub use clock::FrameClock;
pub use haptics::{pulse, Haptics, HapticsError, NoHaptics};
pub use manual::ManualScheduler;
pub use scheduler::{FrameHandle, FrameScheduler, TimerHandle, TimerScheduler, Wakeup};
