//! Maps the percentage viewport back onto full-resolution rows

use chrono::NaiveDateTime;

use crate::chart::downsample::DownsampledView;
use crate::constants::datetime::DISPLAY_FORMAT;
use crate::state::ZoomState;

/// Visible window, recomputed on every render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMetrics {
    pub sampled_start_idx: usize,
    pub sampled_end_idx: usize,
    pub real_start_idx: usize,
    pub real_end_idx: usize,
    pub window_length: usize,
    pub total_length: usize,
    pub start_timestamp: NaiveDateTime,
    pub end_timestamp: NaiveDateTime,
}

/// Metric strings shown above the charts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsDisplay {
    pub total_length: String,
    pub start_index: String,
    pub window_length: String,
    pub start_date: String,
    pub end_date: String,
}

impl WindowMetrics {
    pub fn display(&self) -> MetricsDisplay {
        MetricsDisplay {
            total_length: format_count(self.total_length),
            start_index: format_count(self.real_start_idx),
            window_length: format_count(self.window_length),
            start_date: self.start_timestamp.format(DISPLAY_FORMAT).to_string(),
            end_date: self.end_timestamp.format(DISPLAY_FORMAT).to_string(),
        }
    }
}

/// `floor(len * pct / 100)` limited to `[0, max]`; NaN maps to 0
fn scaled_index(len: usize, pct: f64, max: usize) -> usize {
    let raw = (len as f64 * pct / 100.0).floor();
    // `as` saturates at both ends and turns NaN into 0
    (raw.max(0.0) as usize).min(max)
}

/// Resolve `zoom` against the sampled view. Returns `None` only for an empty view.
///
/// Reported sampled indices are clamped to `[0, len-1]`. The real end is taken
/// from the exclusive sampled end bound (clamped to `[0, len]`) and capped at
/// `total_len`, so the full view `{0, 100}` covers `[0, total_len)` even when
/// the last sampled row stands for fewer than `stride` rows.
pub fn resolve(
    view: &DownsampledView,
    stride: usize,
    total_len: usize,
    zoom: ZoomState,
) -> Option<WindowMetrics> {
    if view.is_empty() {
        return None;
    }
    let len = view.len();
    let last = len - 1;

    let sampled_start_idx = scaled_index(len, zoom.start_pct, last);
    let sampled_end_idx = scaled_index(len, zoom.end_pct, last);
    let end_bound = scaled_index(len, zoom.end_pct, len);

    let real_start_idx = sampled_start_idx * stride;
    let real_end_idx = (end_bound * stride).min(total_len);

    Some(WindowMetrics {
        sampled_start_idx,
        sampled_end_idx,
        real_start_idx,
        real_end_idx,
        window_length: real_end_idx.saturating_sub(real_start_idx),
        total_length: total_len,
        start_timestamp: view.timestamps[sampled_start_idx],
        end_timestamp: view.timestamps[sampled_end_idx],
    })
}

/// `12345` -> `"12,345"`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
