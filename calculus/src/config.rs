use std::fs;

use serde::{Deserialize, Serialize};

use crate::errors::CalculusError;

/// Mean Earth radius used by the spherical curl when no spherical datum is attached.
pub const DEFAULT_SPHERICAL_EARTH_RADIUS: f64 = 6_367_470.0;

/// Unit of [`DEFAULT_SPHERICAL_EARTH_RADIUS`].
pub const DEFAULT_SPHERICAL_EARTH_RADIUS_UNIT: &str = "m";

const fn default_update_history() -> bool {
    true
}

const fn default_radius() -> f64 {
    DEFAULT_SPHERICAL_EARTH_RADIUS
}

fn default_radius_unit() -> String {
    DEFAULT_SPHERICAL_EARTH_RADIUS_UNIT.to_string()
}

const fn default_comparison_tolerance() -> f64 {
    1e-9
}

/// Calculus configuration loaded from TOML/YAML.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculusConfig {
    /// Append provenance text to derived cubes.
    #[serde(default = "default_update_history")]
    pub update_history: bool,
    /// Sphere radius for the spherical curl when the datum carries none.
    #[serde(default = "default_radius")]
    pub default_radius: f64,
    #[serde(default = "default_radius_unit")]
    pub default_radius_unit: String,
    /// Absolute tolerance used when comparing coordinate values across cubes.
    #[serde(default = "default_comparison_tolerance")]
    pub comparison_tolerance: f64,
}

impl Default for CalculusConfig {
    fn default() -> Self {
        Self {
            update_history: default_update_history(),
            default_radius: default_radius(),
            default_radius_unit: default_radius_unit(),
            comparison_tolerance: default_comparison_tolerance(),
        }
    }
}

impl CalculusConfig {
    /// Load a configuration from a TOML file on disk.
    pub fn from_toml_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, CalculusError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Load a configuration from a YAML file on disk.
    pub fn from_yaml_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, CalculusError> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&raw)?;
        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CalculusError> {
        let cfg: Self = toml::from_str(raw)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_fills_defaults() {
        let cfg = CalculusConfig::from_toml_str("update_history = false\n").unwrap();
        assert!(!cfg.update_history);
        assert_eq!(cfg.default_radius, DEFAULT_SPHERICAL_EARTH_RADIUS);
        assert_eq!(cfg.default_radius_unit, "m");
    }

    #[test]
    fn yaml_round_trip() {
        let cfg = CalculusConfig {
            default_radius: 6_371_000.0,
            ..CalculusConfig::default()
        };
        let raw = serde_yaml::to_string(&cfg).unwrap();
        let back: CalculusConfig = serde_yaml::from_str(&raw).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn yaml_path_loads() {
        let dir = std::env::temp_dir().join(format!("calculus-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("calculus.yaml");
        fs::write(&path, "comparison_tolerance: 0.5\n").unwrap();
        let cfg = CalculusConfig::from_yaml_path(&path).unwrap();
        assert_eq!(cfg.comparison_tolerance, 0.5);
        assert!(cfg.update_history);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CalculusConfig::from_toml_path("/nonexistent/calculus.toml").unwrap_err();
        assert!(matches!(err, CalculusError::Io(_)));
    }
}
