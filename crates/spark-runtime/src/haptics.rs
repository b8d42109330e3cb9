//! Haptic feedback collaborator

use thiserror::Error;

/// Why a vibration request did not reach a device
#[derive(Debug, Error)]
pub enum HapticsError {
    #[error("haptic feedback is not supported on this host")]
    Unsupported,

    #[error("haptic device rejected the pattern: {0}")]
    Rejected(String),
}

/// A vibration device. Callers treat every failure as non-fatal.
pub trait Haptics {
    /// Play an on/off pattern in milliseconds (`[on, off, on, ...]`)
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), HapticsError>;
}

/// Host without a vibration device
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _pattern: &[u32]) -> Result<(), HapticsError> {
        Err(HapticsError::Unsupported)
    }
}

/// Vibrate and swallow any failure
pub fn pulse(haptics: &mut dyn Haptics, pattern: &[u32]) {
    if let Err(e) = haptics.vibrate(pattern) {
        tracing::debug!("haptic pulse skipped: {e}");
    }
}
