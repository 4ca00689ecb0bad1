//! Vibration feedback

/// Vibration patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VibePattern {
    /// One short buzz
    ShortPulse,
    /// Two short buzzes
    DoublePulse,
}

const SHORT_PULSE_MS: &[u16] = &[150];
const DOUBLE_PULSE_MS: &[u16] = &[150, 150, 150];

impl VibePattern {
    /// Segment durations in milliseconds, alternating on/off, starting on
    pub fn segments(&self) -> &'static [u16] {
        match self {
            VibePattern::ShortPulse => SHORT_PULSE_MS,
            VibePattern::DoublePulse => DOUBLE_PULSE_MS,
        }
    }

    /// Total pattern length in milliseconds
    pub fn duration_ms(&self) -> u32 {
        self.segments().iter().map(|&ms| ms as u32).sum()
    }
}

/// Trait for the vibration motor
///
/// `vibrate` starts the pattern and returns immediately.
pub trait Haptics {
    fn vibrate(&mut self, pattern: VibePattern);
}
