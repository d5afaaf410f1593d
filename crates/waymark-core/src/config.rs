//! TOML-backed tracker configuration.
//!
//! The only tunable surface of the core is presentation: the labels attached
//! to the four interval record kinds. Hosts that localize or re-skin the
//! achievement screen override them; everything else falls back to defaults
//! via `#[serde(default)]`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Labels attached to interval record extractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalLabels {
    #[serde(default = "default_altitude_label")]
    pub altitude: String,
    #[serde(default = "default_depth_label")]
    pub depth: String,
    #[serde(default = "default_distance_label")]
    pub distance: String,
    #[serde(default = "default_speed_label")]
    pub speed: String,
}

impl Default for IntervalLabels {
    fn default() -> Self {
        Self {
            altitude: default_altitude_label(),
            depth: default_depth_label(),
            distance: default_distance_label(),
            speed: default_speed_label(),
        }
    }
}

fn default_altitude_label() -> String {
    "Altitude Record".to_string()
}

fn default_depth_label() -> String {
    "Depth Record".to_string()
}

fn default_distance_label() -> String {
    "Distance Record".to_string()
}

fn default_speed_label() -> String {
    "Speed Record".to_string()
}

/// Tracker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub labels: IntervalLabels,
}

impl TrackerConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Render the configuration back to TOML.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let cfg = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.labels.altitude, "Altitude Record");
        assert_eq!(cfg.labels.speed, "Speed Record");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = TrackerConfig::from_toml_str(
            r#"
            [labels]
            altitude = "Hoogterecord"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.labels.altitude, "Hoogterecord");
        assert_eq!(cfg.labels.depth, "Depth Record");
    }

    #[test]
    fn round_trips_through_toml() {
        let mut cfg = TrackerConfig::default();
        cfg.labels.distance = "Ground Covered".to_string();
        let rendered = cfg.to_toml_string();
        let back = TrackerConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(back.labels.distance, "Ground Covered");
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(TrackerConfig::from_toml_str("[labels").is_err());
    }
}
