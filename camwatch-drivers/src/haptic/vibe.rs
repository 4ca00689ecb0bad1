//! Vibration motor pattern sequencer
//!
//! A pattern is a list of alternating on/off segments. The sequencer is
//! advanced by calling `update_with_delta()` with the time elapsed since the
//! last call; it returns whether the motor should currently be running.
//!
//! ```ignore
//! let mut vibe = VibeDriver::new(pin);
//! vibe.start(VibePattern::DoublePulse)?;
//!
//! // In the vibration task:
//! while let Some(wait_ms) = vibe.time_to_next_change() {
//!     Timer::after_millis(wait_ms as u64).await;
//!     vibe.update_with_delta(wait_ms)?;
//! }
//! ```

use core::convert::Infallible;

use camwatch_core::traits::{Haptics, VibePattern};
use embedded_hal::digital::OutputPin;

/// Pattern sequencer, independent of the output pin
#[derive(Debug, Clone, Default)]
pub struct VibeMotor {
    /// Pattern being played, `None` when idle
    pattern: Option<VibePattern>,
    /// Index of the current segment
    segment: usize,
    /// Time spent in the current segment (in ms)
    elapsed_ms: u32,
}

impl VibeMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pattern, replacing any pattern already running
    pub fn start(&mut self, pattern: VibePattern) {
        self.pattern = Some(pattern);
        self.segment = 0;
        self.elapsed_ms = 0;
    }

    /// Stop immediately
    pub fn cancel(&mut self) {
        self.pattern = None;
        self.segment = 0;
        self.elapsed_ms = 0;
    }

    /// Pattern being played
    pub fn pattern(&self) -> Option<VibePattern> {
        self.pattern
    }

    /// Check if a pattern is running
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Whether the motor should be running right now
    ///
    /// Even segments are "on", odd segments are "off".
    pub fn is_on(&self) -> bool {
        self.is_active() && self.segment % 2 == 0
    }

    /// Milliseconds until the motor level next changes, `None` when idle
    pub fn time_to_next_change(&self) -> Option<u32> {
        let pattern = self.pattern?;
        let total = *pattern.segments().get(self.segment)? as u32;
        Some(total.saturating_sub(self.elapsed_ms))
    }

    /// Advance by `delta_ms` and return the motor level
    pub fn update_with_delta(&mut self, delta_ms: u32) -> bool {
        let Some(pattern) = self.pattern else {
            return false;
        };

        let segments = pattern.segments();
        self.elapsed_ms += delta_ms;

        while let Some(&length) = segments.get(self.segment) {
            if self.elapsed_ms < length as u32 {
                break;
            }
            self.elapsed_ms -= length as u32;
            self.segment += 1;
        }

        if self.segment >= segments.len() {
            self.cancel();
        }

        self.is_on()
    }
}

impl Haptics for VibeMotor {
    fn vibrate(&mut self, pattern: VibePattern) {
        self.start(pattern);
    }
}

/// Vibration motor on a GPIO pin (active high)
pub struct VibeDriver<P> {
    pin: P,
    motor: VibeMotor,
}

impl<P: OutputPin> VibeDriver<P> {
    /// Create a driver with the motor off
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self {
            pin,
            motor: VibeMotor::new(),
        })
    }

    /// Start a pattern and switch the motor on
    pub fn start(&mut self, pattern: VibePattern) -> Result<(), P::Error> {
        self.motor.start(pattern);
        self.apply()
    }

    /// Stop the motor immediately
    pub fn cancel(&mut self) -> Result<(), P::Error> {
        self.motor.cancel();
        self.apply()
    }

    /// Advance the pattern and update the pin
    pub fn update_with_delta(&mut self, delta_ms: u32) -> Result<bool, P::Error> {
        self.motor.update_with_delta(delta_ms);
        self.apply()?;
        Ok(self.motor.is_on())
    }

    /// Milliseconds until the pin next changes
    pub fn time_to_next_change(&self) -> Option<u32> {
        self.motor.time_to_next_change()
    }

    pub fn motor(&self) -> &VibeMotor {
        &self.motor
    }

    /// Release the pin
    pub fn free(self) -> P {
        self.pin
    }

    fn apply(&mut self) -> Result<(), P::Error> {
        if self.motor.is_on() {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}

impl<P: OutputPin<Error = Infallible>> Haptics for VibeDriver<P> {
    fn vibrate(&mut self, pattern: VibePattern) {
        match self.start(pattern) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}
