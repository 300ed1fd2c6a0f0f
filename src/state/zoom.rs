//! Per-dataset, per-selection viewport state
//!
//! The only state that outlives a render pass. Each key gets its own entry so
//! switching datasets or channel sets starts from the full view.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::chart::event::ZoomRange;
use crate::constants::zoom::{FULL_END_PCT, FULL_START_PCT};

/// Current viewport, in percent of the sampled series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomState {
    pub start_pct: f64,
    pub end_pct: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            start_pct: FULL_START_PCT,
            end_pct: FULL_END_PCT,
        }
    }
}

impl From<ZoomRange> for ZoomState {
    fn from(range: ZoomRange) -> Self {
        Self {
            start_pct: range.start,
            end_pct: range.end,
        }
    }
}

/// Dataset identity plus the selected column indices in column order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoomKey {
    dataset: String,
    channels: Vec<usize>,
}

impl ZoomKey {
    /// Selection order does not matter; duplicates are dropped
    pub fn new(dataset: &str, channels: &[usize]) -> Self {
        let mut channels = channels.to_vec();
        channels.sort_unstable();
        channels.dedup();
        Self {
            dataset: dataset.to_string(),
            channels,
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn channels(&self) -> &[usize] {
        &self.channels
    }
}

/// Key-partitioned viewport map owned by the session
#[derive(Debug, Default)]
pub struct ZoomStore {
    states: HashMap<ZoomKey, ZoomState>,
}

impl ZoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport for `key`, creating the full view on first access
    pub fn get(&mut self, key: &ZoomKey) -> ZoomState {
        *self.states.entry(key.clone()).or_default()
    }

    /// Replace the viewport for `key` wholesale
    pub fn set(&mut self, key: &ZoomKey, range: ZoomRange) {
        self.states.insert(key.clone(), range.into());
    }

    /// Back to the full view
    pub fn reset(&mut self, key: &ZoomKey) {
        self.states.insert(key.clone(), ZoomState::default());
    }

    /// Number of views seen this session
    pub fn len(&self) -> usize {
        self.states.len()
    }
}
