//! Hours/minutes clock and its fixed-width text form

use heapless::String;

/// Length of the "HH:MM" rendering
pub const FORMATTED_TIME_LEN: usize = 5;

/// Errors constructing a clock value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Hour outside 0-23
    HourOutOfRange,
    /// Minute outside 0-59
    MinuteOutOfRange,
}

/// Last known wall-clock time, 24-hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    hours: u8,
    minutes: u8,
}

impl ClockState {
    /// 00:00
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Create a clock value, checking both fields
    pub fn new(hours: u8, minutes: u8) -> Result<Self, ClockError> {
        if hours > 23 {
            return Err(ClockError::HourOutOfRange);
        }
        if minutes > 59 {
            return Err(ClockError::MinuteOutOfRange);
        }
        Ok(Self { hours, minutes })
    }

    /// Hour of day (0-23)
    pub fn hours(&self) -> u8 {
        self.hours
    }

    /// Minute of hour (0-59)
    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Render as zero-padded "HH:MM"
    pub fn format(&self) -> FormattedTime {
        FormattedTime::from(*self)
    }
}

/// Zero-padded "HH:MM" text for a `ClockState`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FormattedTime {
    text: String<FORMATTED_TIME_LEN>,
}

impl FormattedTime {
    /// Text form
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

impl Default for FormattedTime {
    fn default() -> Self {
        Self::from(ClockState::MIDNIGHT)
    }
}

impl From<ClockState> for FormattedTime {
    fn from(clock: ClockState) -> Self {
        let mut text = String::new();
        // Five ASCII characters always fit
        for ch in [
            digit(clock.hours / 10),
            digit(clock.hours % 10),
            ':',
            digit(clock.minutes / 10),
            digit(clock.minutes % 10),
        ] {
            let _ = text.push(ch);
        }
        Self { text }
    }
}

impl core::fmt::Display for FormattedTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn digit(value: u8) -> char {
    (b'0' + value) as char
}
