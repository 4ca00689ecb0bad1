//! Configuration loading
//!
//! TOML is parsed on the host (tests, build script). The firmware only
//! ever sees the postcard-encoded form.

use super::types::{ConfigError, WatchConfig};

/// Upper bound for the postcard-encoded configuration
pub const MAX_ENCODED_CONFIG_SIZE: usize = 64;

/// Parse and validate a TOML configuration
///
/// Missing tables and fields take their default values.
#[cfg(any(test, feature = "toml"))]
pub fn parse_config(text: &str) -> Result<WatchConfig, ConfigError> {
    let config: WatchConfig = toml::from_str(text).map_err(|_| ConfigError::Parse)?;
    config.validate()?;
    Ok(config)
}

/// Serialize a configuration into `buf`, returning the used prefix
pub fn encode_config<'b>(config: &WatchConfig, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
    postcard::to_slice(config, buf).map_err(|_| ConfigError::Encode)
}

/// Deserialize and validate a configuration
pub fn decode_config(bytes: &[u8]) -> Result<WatchConfig, ConfigError> {
    let config: WatchConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
    config.validate()?;
    Ok(config)
}
