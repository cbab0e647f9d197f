//! Configuration shared by the marker store, the view settings and the session.
//!
//! Settings are stored as YAML under `~/.spectral_markers/config.yaml`; a missing
//! file simply means defaults.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Initial values for markers created from a chart click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerDefaults {
    pub band_width: f64,
    pub side_band_count: u32,
    pub side_band_spacing: f64,
    pub side_band_left: bool,
    pub side_band_right: bool,
}

impl Default for MarkerDefaults {
    fn default() -> Self {
        Self {
            band_width: 20.0,
            side_band_count: 2,
            side_band_spacing: 10.0,
            side_band_left: true,
            side_band_right: true,
        }
    }
}

/// Marker limits. Counts apply to every marker entering the store; name
/// lengths apply to interactive edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerLimits {
    pub max_harmonics: u32,
    pub max_sub_harmonics: u32,
    /// Side-bands per direction.
    pub max_side_bands: u32,
    pub max_marker_name_len: usize,
    pub max_analysis_name_len: usize,
}

impl Default for MarkerLimits {
    fn default() -> Self {
        Self {
            max_harmonics: 20,
            max_sub_harmonics: 10,
            max_side_bands: 10,
            max_marker_name_len: 20,
            max_analysis_name_len: 36,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub marker_defaults: MarkerDefaults,
    pub limits: MarkerLimits,
    /// Reference frequency for the order (ratio) domain.
    pub base_frequency: f64,
    /// Smallest value shown on a log-scaled Y axis.
    pub log_floor: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            marker_defaults: MarkerDefaults::default(),
            limits: MarkerLimits::default(),
            base_frequency: 100.0,
            log_floor: 0.0001,
        }
    }
}

impl AnalysisConfig {
    /// `~/.spectral_markers/config.yaml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;
        Ok(PathBuf::from(home)
            .join(".spectral_markers")
            .join("config.yaml"))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let s = serde_yaml::to_string(self)?;
        let mut f = fs::File::create(path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<AnalysisConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }
        let s = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Load from the default path, falling back to defaults when the file is
    /// absent or unreadable.
    pub fn load_or_default() -> AnalysisConfig {
        let path = match Self::default_path() {
            Ok(p) => p,
            Err(_) => return AnalysisConfig::default(),
        };
        match Self::load_from_path(&path) {
            Ok(cfg) => cfg,
            Err(ConfigError::Missing { .. }) => AnalysisConfig::default(),
            Err(e) => {
                log::warn!("Ignoring config {:?}: {e}", path);
                AnalysisConfig::default()
            }
        }
    }
}
