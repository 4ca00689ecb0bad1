//! Haptics handle for the app task

use camwatch_core::traits::{Haptics, VibePattern};

use crate::channels::VIBE_CMD;

/// Forwards patterns to the vibration task
pub struct SignalHaptics;

impl Haptics for SignalHaptics {
    fn vibrate(&mut self, pattern: VibePattern) {
        VIBE_CMD.signal(pattern);
    }
}
