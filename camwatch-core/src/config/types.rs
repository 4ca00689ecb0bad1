//! Configuration type definitions
//!
//! The configuration is authored as TOML, validated at build time and
//! stored in the firmware image as postcard-serialized binary data.

use serde::{Deserialize, Serialize};

use camwatch_protocol::MAX_DICT_SIZE;

use super::layout::Layout;

/// Default inbox size in bytes
pub const DEFAULT_INBOX_SIZE: u16 = 64;

/// Default outbox size in bytes
pub const DEFAULT_OUTBOX_SIZE: u16 = 64;

/// Smallest usable message buffer: one dictionary holding one 32-bit tuple
pub const MIN_MESSAGE_BUFFER: u16 = 1 + 7 + 4;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    Parse,
    /// A face element is off screen or malformed
    InvalidLayout,
    /// Inbox or outbox size outside the supported range
    InvalidBufferSize,
    /// Binary serialization failed
    Encode,
    /// Binary deserialization failed
    Decode,
}

/// Complete watch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct WatchConfig {
    /// Face geometry
    pub layout: Layout,
    /// Largest inbound message in bytes
    pub inbox_size: u16,
    /// Largest outbound message in bytes
    pub outbox_size: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            inbox_size: DEFAULT_INBOX_SIZE,
            outbox_size: DEFAULT_OUTBOX_SIZE,
        }
    }
}

impl WatchConfig {
    /// Check layout and buffer sizes
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        let valid = MIN_MESSAGE_BUFFER..=MAX_DICT_SIZE as u16;
        if !valid.contains(&self.inbox_size) || !valid.contains(&self.outbox_size) {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(())
    }
}
