//! Configuration loading
//!
//! watch.toml is validated and encoded by the build script; the firmware
//! decodes the embedded blob at boot.

use defmt::*;

use camwatch_core::config::{decode_config, WatchConfig};

/// Encoded watch.toml
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/watch_config.bin"));

/// Load the embedded configuration, falling back to defaults
pub fn load_config() -> WatchConfig {
    match decode_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Loaded watch.toml: inbox={}B outbox={}B",
                config.inbox_size, config.outbox_size
            );
            config
        }
        Err(e) => {
            // Only possible if the build script and firmware disagree
            warn!("Embedded config invalid ({:?}), using defaults", e);
            WatchConfig::default()
        }
    }
}
