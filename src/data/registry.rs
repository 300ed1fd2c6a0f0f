//! Named dataset catalogue and the load-with-fallback policy

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::config::SENSOR_INTERVAL_MINUTES;
use crate::data::series::TimeSeries;
use crate::data::source::{TimestampSource, load_series};
use crate::data::synthetic::fallback_series;

/// One entry of the dataset picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(default = "first_column")]
    pub timestamps: TimestampSource,
}

fn first_column() -> TimestampSource {
    TimestampSource::FirstColumn
}

impl DatasetEntry {
    /// Dataset whose first column holds the timestamps
    pub fn csv(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: PathBuf::from(path),
            timestamps: TimestampSource::FirstColumn,
        }
    }

    /// Sensor dataset without a time column, sampled every five minutes from 2020-01-01
    pub fn sensor(name: &str, path: &str) -> Self {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            path: PathBuf::from(path),
            timestamps: TimestampSource::Generated {
                start,
                interval_minutes: SENSOR_INTERVAL_MINUTES,
            },
        }
    }
}

/// Whether the loaded series came from disk or from the fallback generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    File,
    Synthetic,
}

/// Result of asking the registry for a dataset
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        series: TimeSeries,
        origin: DataOrigin,
    },
    /// Nothing to show; carries a user-facing reason
    Unavailable(String),
}

/// Ordered list of datasets offered to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetRegistry {
    entries: Vec<DatasetEntry>,
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                DatasetEntry::csv("ETTh1", "./dataset/ETTh1.csv"),
                DatasetEntry::csv("ETTh2", "./dataset/ETTh2.csv"),
                DatasetEntry::csv("ETTm1", "./dataset/ETTm1.csv"),
                DatasetEntry::csv("ETTm2", "./dataset/ETTm2.csv"),
                DatasetEntry::csv("ECL", "./dataset/electricity.csv"),
                DatasetEntry::csv("Weather", "./dataset/weather.csv"),
                DatasetEntry::csv("Traffic", "./dataset/traffic.csv"),
                DatasetEntry::csv("ILI", "./dataset/national_illness.csv"),
                DatasetEntry::csv("Exchange", "./dataset/exchange_rate.csv"),
                DatasetEntry::sensor("PEMS03", "./dataset/PEMS03.npz"),
                DatasetEntry::sensor("PEMS04", "./dataset/PEMS04.npz"),
                DatasetEntry::sensor("PEMS07", "./dataset/PEMS07.npz"),
                DatasetEntry::sensor("PEMS08", "./dataset/PEMS08.npz"),
            ],
        }
    }
}

impl DatasetRegistry {
    pub fn new(entries: Vec<DatasetEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&DatasetEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Add a file picked by the user. Returns the dataset name; re-registering
    /// the same path returns the existing entry's name.
    pub fn register_file(&mut self, path: &Path) -> String {
        if let Some(existing) = self.entries.iter().find(|e| e.path == path) {
            return existing.name.clone();
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        let mut name = stem.clone();
        let mut suffix = 2;
        while self.get(&name).is_some() {
            name = format!("{} ({})", stem, suffix);
            suffix += 1;
        }

        // NumPy archives carry no time column
        let is_npz = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("npz"));
        let entry = if is_npz {
            DatasetEntry::sensor(&name, &path.to_string_lossy())
        } else {
            DatasetEntry {
                name: name.clone(),
                path: path.to_path_buf(),
                timestamps: TimestampSource::FirstColumn,
            }
        };
        self.entries.push(entry);
        name
    }

    /// Load a dataset by name.
    ///
    /// A missing file falls back to the synthetic series; an unknown name or
    /// a file that fails to parse is unavailable.
    pub fn load(&self, name: &str) -> LoadOutcome {
        let Some(entry) = self.get(name) else {
            return LoadOutcome::Unavailable(format!("Unknown dataset '{}'", name));
        };

        if !entry.path.exists() {
            tracing::info!(
                "Dataset '{}' not found at {}, using synthetic series",
                name,
                entry.path.display()
            );
            return match fallback_series() {
                Ok(series) => LoadOutcome::Loaded {
                    series,
                    origin: DataOrigin::Synthetic,
                },
                Err(e) => LoadOutcome::Unavailable(e.user_message()),
            };
        }

        match load_series(&entry.path, &entry.timestamps) {
            Ok(series) => {
                tracing::info!(
                    "Loaded '{}': {} rows x {} channels",
                    name,
                    series.len(),
                    series.channel_names().len()
                );
                LoadOutcome::Loaded {
                    series,
                    origin: DataOrigin::File,
                }
            }
            Err(e) => {
                tracing::error!("Failed to load '{}': {}", name, e);
                LoadOutcome::Unavailable(e.user_message())
            }
        }
    }
}
