use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::engine::regression::{DEFAULT_DEGENERATE_TOLERANCE, Regressor};

pub const MAX_PRECISION: usize = 12;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_degenerate_tolerance")]
    pub degenerate_tolerance: f64,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default = "default_pressure_unit")]
    pub pressure_unit: String,
    #[serde(default = "default_permeability_unit")]
    pub permeability_unit: String,
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_degenerate_tolerance() -> f64 {
    DEFAULT_DEGENERATE_TOLERANCE
}
fn default_precision() -> usize {
    5
}
fn default_pressure_unit() -> String {
    "psi".to_string()
}
fn default_permeability_unit() -> String {
    "mD".to_string()
}
fn default_data_file() -> String {
    "klinkenberg_data.csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            degenerate_tolerance: default_degenerate_tolerance(),
            precision: default_precision(),
            pressure_unit: default_pressure_unit(),
            permeability_unit: default_permeability_unit(),
            data_file: default_data_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Missing file means defaults; a present but invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("klinkenberg")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if !self.degenerate_tolerance.is_finite() || self.degenerate_tolerance < 0.0 {
            bail!(
                "degenerate_tolerance must be finite and non-negative, got {}",
                self.degenerate_tolerance
            );
        }
        if self.precision > MAX_PRECISION {
            bail!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            );
        }
        Ok(())
    }

    pub fn regressor(&self) -> Result<Regressor> {
        Ok(Regressor::new(self.degenerate_tolerance)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.degenerate_tolerance, 1e-12);
        assert_eq!(config.precision, 5);
        assert_eq!(config.pressure_unit, "psi");
        assert_eq!(config.permeability_unit, "mD");
        assert_eq!(config.data_file, "klinkenberg_data.csv");
    }

    #[test]
    fn test_config_partial_fields() {
        let toml_str = r#"
precision = 3
pressure_unit = "atm"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.precision, 3);
        assert_eq!(config.pressure_unit, "atm");
        assert_eq!(config.permeability_unit, "mD");
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("klinkenberg").join("config.toml");
        let mut config = Config::default();
        config.precision = 7;
        config.degenerate_tolerance = 1e-9;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.precision, 7);
        assert_eq!(loaded.degenerate_tolerance, 1e-9);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.precision, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "degenerate_tolerance = -1.0\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("degenerate_tolerance"));

        let mut config = Config::default();
        config.precision = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "precision = \"five\"\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn test_regressor_uses_configured_tolerance() {
        let mut config = Config::default();
        config.degenerate_tolerance = 1e-6;
        assert_eq!(config.regressor().unwrap().tolerance(), 1e-6);
    }
}
