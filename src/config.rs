//! Application configuration
//!
//! Read once at startup from `stackview.json` in the working directory, or the
//! path in `STACKVIEW_CONFIG`. A missing file means defaults; an unreadable
//! one is logged and also falls back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::config::{CONFIG_ENV, CONFIG_FILE};
use crate::constants::sampling::DEFAULT_POINT_BUDGET;
use crate::data::{DatasetRegistry, TimestampSource};
use crate::error::{PlotError, Result};

/// What to do with an interaction payload whose shape is not recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEventPolicy {
    /// Leave the stored viewport untouched
    #[default]
    Keep,
    /// Jump back to the full view
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Maximum points per channel handed to the renderer
    pub point_budget: usize,
    pub unknown_event_policy: UnknownEventPolicy,
    pub dark_mode: bool,
    pub datasets: DatasetRegistry,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            point_budget: DEFAULT_POINT_BUDGET,
            unknown_event_policy: UnknownEventPolicy::default(),
            dark_mode: false,
            datasets: DatasetRegistry::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.point_budget == 0 {
            return Err(PlotError::Config("point_budget must be at least 1".into()));
        }
        if self.datasets.entries().is_empty() {
            return Err(PlotError::Config("at least one dataset is required".into()));
        }
        let bad_interval = self.datasets.entries().iter().find_map(|entry| match entry.timestamps {
            TimestampSource::Generated {
                interval_minutes, ..
            } if interval_minutes <= 0 => Some((entry.name.as_str(), interval_minutes)),
            _ => None,
        });
        if let Some((name, interval)) = bad_interval {
            return Err(PlotError::Config(format!(
                "dataset '{}': interval_minutes must be positive (got {})",
                name, interval
            )));
        }
        Ok(())
    }

    /// Configuration path: `$STACKVIEW_CONFIG` or `./stackview.json`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Load from `path`, falling back to defaults when absent or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
