//! Watch face geometry
//!
//! Coordinates are in pixels with (0, 0) at the top-left corner. The
//! defaults describe a 144x168 screen with the record indicator in the
//! top-right corner and the stop indicator in the bottom-right corner,
//! next to the Up and Down buttons that trigger them.

use serde::{Deserialize, Serialize};

use super::types::ConfigError;

/// `start..start + len` inside `0..limit`, computed without overflow
fn span_fits(start: i32, len: u32, limit: u16) -> bool {
    start >= 0 && i64::from(start) + i64::from(len) <= i64::from(limit)
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Returns true if the rectangle lies entirely within `width` x `height`
    pub fn fits_within(&self, width: u16, height: u16) -> bool {
        span_fits(i32::from(self.x), u32::from(self.width), width)
            && span_fits(i32::from(self.y), u32::from(self.height), height)
    }
}

/// Filled circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Circle {
    /// Center x
    pub x: i16,
    /// Center y
    pub y: i16,
    pub radius: u16,
}

impl Circle {
    /// Returns true if the whole disc lies within `width` x `height`
    pub fn fits_within(&self, width: u16, height: u16) -> bool {
        let r = i32::from(self.radius);
        let diameter = u32::from(self.radius) * 2;
        span_fits(i32::from(self.x) - r, diameter, width)
            && span_fits(i32::from(self.y) - r, diameter, height)
    }
}

/// Filled rectangle with rounded corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoundedRect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub corner_radius: u16,
}

impl RoundedRect {
    /// Returns true if the rectangle lies within `width` x `height`
    pub fn fits_within(&self, width: u16, height: u16) -> bool {
        span_fits(i32::from(self.x), u32::from(self.width), width)
            && span_fits(i32::from(self.y), u32::from(self.height), height)
    }

    /// Returns true if both corner arcs fit along the shorter side
    pub fn corners_fit(&self) -> bool {
        u32::from(self.corner_radius) * 2 <= u32::from(self.width.min(self.height))
    }
}

/// Placement of everything drawn on the face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct Layout {
    /// Screen width in pixels
    pub screen_width: u16,
    /// Screen height in pixels
    pub screen_height: u16,
    /// Region the time text is centered in
    pub time_region: Rect,
    /// "Recording" indicator
    pub record: Circle,
    /// "Stop" indicator
    pub stop: RoundedRect,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            screen_width: 144,
            screen_height: 168,
            time_region: Rect {
                x: 0,
                y: 55,
                width: 144,
                height: 70,
            },
            record: Circle {
                x: 118,
                y: 27,
                radius: 20,
            },
            stop: RoundedRect {
                x: 99,
                y: 118,
                width: 38,
                height: 38,
                corner_radius: 4,
            },
        }
    }
}

impl Layout {
    /// Check that every element is on screen and well-formed
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.screen_width, self.screen_height);
        if w == 0 || h == 0 {
            return Err(ConfigError::InvalidLayout);
        }
        if self.time_region.height == 0 || !self.time_region.fits_within(w, h) {
            return Err(ConfigError::InvalidLayout);
        }
        if self.record.radius == 0 || !self.record.fits_within(w, h) {
            return Err(ConfigError::InvalidLayout);
        }
        let stop = &self.stop;
        if stop.width == 0 || stop.height == 0 || !stop.fits_within(w, h) {
            return Err(ConfigError::InvalidLayout);
        }
        if !stop.corners_fit() {
            return Err(ConfigError::InvalidLayout);
        }
        Ok(())
    }
}
