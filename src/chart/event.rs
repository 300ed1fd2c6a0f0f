//! Zoom interaction events and their normalization
//!
//! The renderer reports zoom changes in two shapes: wheel zoom arrives as a
//! batch of per-axis updates, slider drags carry `start`/`end` at the top
//! level. Both collapse into one [`ZoomRange`] in percent of the sampled series.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical viewport in percent. Values are not clamped here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub start: f64,
    pub end: f64,
}

impl ZoomRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// One per-axis update inside a batched event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchEntry {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// Raw interaction payload, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum ZoomEvent {
    /// Wheel zoom; only the first entry is authoritative
    Batch(Vec<BatchEntry>),
    /// Slider drag
    Slider { start: f64, end: f64 },
    /// Anything else, kept for logging
    Unknown(Value),
}

impl ZoomEvent {
    /// Classify a renderer payload. A non-empty `batch` array wins over
    /// top-level `start`/`end`.
    pub fn from_payload(payload: &Value) -> Self {
        if let Some(batch) = payload.get("batch").and_then(Value::as_array) {
            if !batch.is_empty() {
                return ZoomEvent::Batch(
                    batch
                        .iter()
                        .map(|entry| BatchEntry {
                            start: entry.get("start").and_then(Value::as_f64),
                            end: entry.get("end").and_then(Value::as_f64),
                        })
                        .collect(),
                );
            }
        }

        let start = payload.get("start").and_then(Value::as_f64);
        let end = payload.get("end").and_then(Value::as_f64);
        match (start, end) {
            (Some(start), Some(end)) => ZoomEvent::Slider { start, end },
            _ => ZoomEvent::Unknown(payload.clone()),
        }
    }

    /// Payload a wheel zoom produces
    pub fn batch_payload(range: ZoomRange) -> Value {
        serde_json::json!({
            "type": "datazoom",
            "batch": [{ "start": range.start, "end": range.end }],
        })
    }

    /// Payload a slider drag produces
    pub fn slider_payload(range: ZoomRange) -> Value {
        serde_json::json!({
            "type": "datazoom",
            "start": range.start,
            "end": range.end,
        })
    }
}

/// Canonical range of an event, or `None` when the shape is not understood
pub fn normalize(event: &ZoomEvent) -> Option<ZoomRange> {
    match event {
        ZoomEvent::Batch(entries) => normalize_batch(entries),
        ZoomEvent::Slider { start, end } => Some(ZoomRange::new(*start, *end)),
        ZoomEvent::Unknown(_) => None,
    }
}

fn normalize_batch(entries: &[BatchEntry]) -> Option<ZoomRange> {
    let first = entries.first()?;
    Some(ZoomRange::new(first.start?, first.end?))
}
