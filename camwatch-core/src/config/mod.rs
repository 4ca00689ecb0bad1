//! Configuration types and loading
//!
//! Defines the watch face layout and message buffer sizes.

pub mod layout;
pub mod loader;
pub mod types;

pub use layout::{Circle, Layout, Rect, RoundedRect};
pub use types::{ConfigError, WatchConfig, DEFAULT_INBOX_SIZE, DEFAULT_OUTBOX_SIZE};
pub use loader::{decode_config, encode_config, MAX_ENCODED_CONFIG_SIZE};

#[cfg(any(test, feature = "toml"))]
pub use loader::parse_config;
