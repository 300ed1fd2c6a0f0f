//! One render pass: pending event -> zoom store -> window -> chart spec
//!
//! Runs synchronously every time an input changes. The only state carried
//! between passes is the [`ZoomStore`] owned by the [`Session`].

use crate::chart::downsample::DownsampledView;
use crate::chart::event::{ZoomEvent, ZoomRange, normalize};
use crate::chart::spec::{ChartSpec, build};
use crate::chart::window::{WindowMetrics, resolve};
use crate::config::UnknownEventPolicy;
use crate::constants::zoom::{FULL_END_PCT, FULL_START_PCT};
use crate::data::{DataOrigin, TimeSeries};
use crate::error::Result;
use crate::state::{ZoomKey, ZoomState, ZoomStore};

/// A loaded series together with its downsampled view
#[derive(Debug)]
pub struct PreparedDataset {
    pub name: String,
    pub series: TimeSeries,
    pub view: DownsampledView,
    pub origin: DataOrigin,
}

impl PreparedDataset {
    /// Downsample once per load; the view only depends on the series and budget
    pub fn prepare(
        name: &str,
        series: TimeSeries,
        origin: DataOrigin,
        point_budget: usize,
    ) -> Result<Self> {
        let view = DownsampledView::from_series(&series, point_budget)?;
        tracing::debug!(
            "Prepared '{}': {} rows, stride {}, {} sampled",
            name,
            series.len(),
            view.stride,
            view.len()
        );
        Ok(Self {
            name: name.to_string(),
            series,
            view,
            origin,
        })
    }

    pub fn total_len(&self) -> usize {
        self.series.len()
    }

    pub fn is_sampled(&self) -> bool {
        self.view.stride > 1
    }
}

/// Output of a pass that had something to draw
#[derive(Debug, Clone)]
pub struct RenderedView {
    pub key: ZoomKey,
    pub zoom: ZoomState,
    pub spec: ChartSpec,
    pub metrics: WindowMetrics,
}

#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// Nothing can be shown; carries a user-facing reason
    Unavailable(String),
    /// No channel selected; wait for the next selection change
    NoSelection,
    Ready(Box<RenderedView>),
}

/// Session-scoped viewport state and the policy for unreadable events
#[derive(Debug, Default)]
pub struct Session {
    zooms: ZoomStore,
    policy: UnknownEventPolicy,
}

impl Session {
    pub fn new(policy: UnknownEventPolicy) -> Self {
        Self {
            zooms: ZoomStore::new(),
            policy,
        }
    }

    pub fn reset_zoom(&mut self, key: &ZoomKey) {
        self.zooms.reset(key);
    }

    /// Fold one interaction into the store for `key`
    pub fn apply_event(&mut self, key: &ZoomKey, event: &ZoomEvent) {
        match normalize(event) {
            Some(range) => self.zooms.set(key, range),
            None => match self.policy {
                UnknownEventPolicy::Keep => {
                    tracing::warn!("Ignoring unrecognized zoom event: {:?}", event);
                }
                UnknownEventPolicy::Reset => {
                    tracing::warn!("Unrecognized zoom event, resetting view: {:?}", event);
                    self.zooms
                        .set(key, ZoomRange::new(FULL_START_PCT, FULL_END_PCT));
                }
            },
        }
    }

    /// Run the pipeline for the current dataset and selection.
    ///
    /// A pending event is folded into the key of the view that emitted it,
    /// which differs from the current key when the selection changed after
    /// the event was queued.
    pub fn render_pass(
        &mut self,
        dataset: &PreparedDataset,
        selection: &[usize],
        pending: Option<(&ZoomKey, &ZoomEvent)>,
    ) -> RenderOutcome {
        profiling::scope!("render_pass");

        if let Some((origin, event)) = pending {
            self.apply_event(origin, event);
        }

        let channels = dataset.series.select_channels(selection);
        if channels.is_empty() {
            return RenderOutcome::NoSelection;
        }

        let indices: Vec<usize> = channels.iter().map(|c| c.index).collect();
        let key = ZoomKey::new(&dataset.name, &indices);

        let zoom = self.zooms.get(&key);
        let Some(metrics) = resolve(
            &dataset.view,
            dataset.view.stride,
            dataset.total_len(),
            zoom,
        ) else {
            return RenderOutcome::Unavailable(format!("'{}' has no rows", dataset.name));
        };

        let spec = build(&dataset.view, &channels, zoom);
        tracing::debug!(
            "Render pass '{}' {:?}: {:.1}%..{:.1}% -> rows {}..{} ({} stored views)",
            key.dataset(),
            key.channels(),
            zoom.start_pct,
            zoom.end_pct,
            metrics.real_start_idx,
            metrics.real_end_idx,
            self.zooms.len()
        );

        RenderOutcome::Ready(Box::new(RenderedView {
            key,
            zoom,
            spec,
            metrics,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Matrix;
    use crate::data::source::generate_timestamps;
    use chrono::NaiveDate;
    use serde_json::json;

    fn dataset(name: &str, n: usize, budget: usize) -> PreparedDataset {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts = generate_timestamps(start, 60, n).unwrap();
        let cols: Vec<Vec<f64>> = (0..3)
            .map(|c| (0..n).map(|r| (r + c) as f64).collect())
            .collect();
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let series = TimeSeries::new(ts, Matrix::from_columns(&cols).unwrap(), names).unwrap();
        PreparedDataset::prepare(name, series, DataOrigin::File, budget).unwrap()
    }

    fn key(dataset: &str, channels: &[usize]) -> ZoomKey {
        ZoomKey::new(dataset, channels)
    }

    fn ready(outcome: RenderOutcome) -> RenderedView {
        match outcome {
            RenderOutcome::Ready(view) => *view,
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_selection_halts() {
        let ds = dataset("d", 10, 5000);
        let mut session = Session::default();
        assert!(matches!(
            session.render_pass(&ds, &[], None),
            RenderOutcome::NoSelection
        ));
        assert_eq!(session.zooms.len(), 0);
    }

    #[test]
    fn test_first_pass_shows_full_window() {
        let ds = dataset("d", 10_000, 5000);
        let mut session = Session::default();
        let view = ready(session.render_pass(&ds, &[0, 1], None));
        assert_eq!(view.zoom, ZoomState::default());
        assert_eq!(view.metrics.real_start_idx, 0);
        assert_eq!(view.metrics.real_end_idx, 10_000);
        assert_eq!(view.spec.panel_count(), 2);
    }

    #[test]
    fn test_event_persists_across_passes() {
        let ds = dataset("d", 10_000, 5000);
        let mut session = Session::default();
        let wheel = ZoomEvent::from_payload(&json!({"batch": [{"start": 25.0, "end": 75.0}]}));

        let first = ready(session.render_pass(&ds, &[0], Some((&key("d", &[0]), &wheel))));
        assert_eq!(first.metrics.window_length, 5000);

        let rerun = ready(session.render_pass(&ds, &[0], None));
        assert_eq!(rerun.zoom, first.zoom);
        assert_eq!(rerun.spec, first.spec);
        assert_eq!(rerun.metrics.real_start_idx, 2500);
    }

    #[test]
    fn test_selection_change_starts_fresh() {
        let ds = dataset("d", 100, 5000);
        let mut session = Session::default();
        let slider = ZoomEvent::Slider { start: 10.0, end: 20.0 };
        session.render_pass(&ds, &[0, 1], Some((&key("d", &[0, 1]), &slider)));

        let other = ready(session.render_pass(&ds, &[0, 2], None));
        assert_eq!(other.zoom, ZoomState::default());

        let back = ready(session.render_pass(&ds, &[1, 0], None));
        assert_eq!(back.zoom.start_pct, 10.0);
    }

    #[test]
    fn test_dataset_change_starts_fresh() {
        let a = dataset("a", 100, 5000);
        let b = dataset("b", 100, 5000);
        let mut session = Session::default();
        let slider = ZoomEvent::Slider { start: 50.0, end: 60.0 };
        session.render_pass(&a, &[0], Some((&key("a", &[0]), &slider)));
        let view = ready(session.render_pass(&b, &[0], None));
        assert_eq!(view.zoom, ZoomState::default());
    }

    #[test]
    fn test_unknown_event_keep_policy() {
        let ds = dataset("d", 100, 5000);
        let mut session = Session::new(UnknownEventPolicy::Keep);
        let k = key("d", &[0]);
        session.render_pass(&ds, &[0], Some((&k, &ZoomEvent::Slider { start: 30.0, end: 40.0 })));
        let junk = ZoomEvent::from_payload(&json!({"what": "ever"}));
        let view = ready(session.render_pass(&ds, &[0], Some((&k, &junk))));
        assert_eq!(view.zoom.start_pct, 30.0);
        assert_eq!(view.zoom.end_pct, 40.0);
    }

    #[test]
    fn test_unknown_event_reset_policy() {
        let ds = dataset("d", 100, 5000);
        let mut session = Session::new(UnknownEventPolicy::Reset);
        let k = key("d", &[0]);
        session.render_pass(&ds, &[0], Some((&k, &ZoomEvent::Slider { start: 30.0, end: 40.0 })));
        let junk = ZoomEvent::from_payload(&json!({"what": "ever"}));
        let view = ready(session.render_pass(&ds, &[0], Some((&k, &junk))));
        assert_eq!(view.zoom, ZoomState::default());
    }

    #[test]
    fn test_out_of_range_event_is_clamped() {
        let ds = dataset("d", 100, 5000);
        let mut session = Session::default();
        let wild = ZoomEvent::Slider { start: -50.0, end: 400.0 };
        let view = ready(session.render_pass(&ds, &[0], Some((&key("d", &[0]), &wild))));
        assert_eq!(view.zoom.start_pct, -50.0);
        assert_eq!(view.metrics.sampled_start_idx, 0);
        assert_eq!(view.metrics.sampled_end_idx, 99);
        assert_eq!(view.metrics.real_end_idx, 100);
    }

    #[test]
    fn test_invalid_selection_indices_ignored() {
        let ds = dataset("d", 10, 5000);
        let mut session = Session::default();
        assert!(matches!(
            session.render_pass(&ds, &[7, 9], None),
            RenderOutcome::NoSelection
        ));
    }

    #[test]
    fn test_reset_zoom() {
        let ds = dataset("d", 100, 5000);
        let mut session = Session::default();
        let slider = ZoomEvent::Slider { start: 5.0, end: 6.0 };
        let view = ready(session.render_pass(&ds, &[0], Some((&key("d", &[0]), &slider))));
        session.reset_zoom(&view.key);
        let view = ready(session.render_pass(&ds, &[0], None));
        assert_eq!(view.zoom, ZoomState::default());
    }

    #[test]
    fn test_event_lands_on_emitting_key() {
        let ds = dataset("d", 100, 5000);
        let mut session = Session::default();
        let emitted_for = key("d", &[0]);
        let slider = ZoomEvent::Slider { start: 40.0, end: 60.0 };

        // Selection moved to [0, 1] after the event was queued for [0]
        let view = ready(session.render_pass(&ds, &[0, 1], Some((&emitted_for, &slider))));
        assert_eq!(view.zoom, ZoomState::default());

        let back = ready(session.render_pass(&ds, &[0], None));
        assert_eq!(back.zoom.start_pct, 40.0);
        assert_eq!(back.zoom.end_pct, 60.0);
    }

    #[test]
    fn test_event_kept_when_selection_emptied() {
        let ds = dataset("d", 100, 5000);
        let mut session = Session::default();
        let slider = ZoomEvent::Slider { start: 10.0, end: 30.0 };
        assert!(matches!(
            session.render_pass(&ds, &[], Some((&key("d", &[2]), &slider))),
            RenderOutcome::NoSelection
        ));
        assert_eq!(session.zooms.len(), 1);
    }
}
