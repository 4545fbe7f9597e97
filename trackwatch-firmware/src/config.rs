//! Configuration loading
//!
//! `monitor.toml` is compiled into the image and already validated by the
//! build script. It is parsed again at boot; if that fails the shipped
//! defaults are used so the monitor still comes up.

use defmt::*;

use trackwatch_core::config::{parse_config, MonitorConfig};

/// Embedded configuration
/// Edit monitor.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../monitor.toml");

/// Load the embedded configuration, falling back to defaults
pub fn load_config() -> MonitorConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config loaded: classify={}ms heartbeat={}ms poll={}ms",
                config.timing.classify_interval_ms,
                config.timing.heartbeat_interval_ms,
                config.timing.poll_interval_ms
            );
            config
        }
        Err(e) => {
            error!("Embedded config rejected ({}), using defaults", e);
            MonitorConfig::default()
        }
    }
}
