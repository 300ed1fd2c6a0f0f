//! Application state management
//!
//! `AppState` owns everything that lives longer than one frame: the loaded
//! dataset, the user's selection, the zoom session and the last render outcome.

mod ui;
mod view;
mod zoom;

pub use ui::UiState;
pub use view::ViewState;
pub use zoom::{ZoomKey, ZoomState, ZoomStore};

use std::path::Path;

use crate::chart::{PreparedDataset, RenderOutcome, Session, ZoomEvent};
use crate::config::AppConfig;
use crate::data::{DatasetRegistry, LoadOutcome};

/// Currently loaded dataset, or why there is none
#[derive(Debug)]
pub enum DatasetSlot {
    Ready(PreparedDataset),
    Unavailable(String),
}

/// Main application state container
pub struct AppState {
    /// Point budget handed to the downsampler
    pub point_budget: usize,

    /// Datasets offered in the picker
    pub datasets: DatasetRegistry,

    /// Dataset and channel selection
    pub view: ViewState,

    /// UI interaction state
    pub ui: UiState,

    /// Zoom state per (dataset, selection)
    pub session: Session,

    pub current: DatasetSlot,

    /// Result of the last render pass
    pub outcome: RenderOutcome,
}

impl AppState {
    /// Build the state and load the first configured dataset
    pub fn new(config: AppConfig) -> Self {
        let first = config
            .datasets
            .names()
            .first()
            .map(|s| s.to_string())
            .unwrap_or_default();

        let mut state = Self {
            point_budget: config.point_budget,
            datasets: config.datasets,
            view: ViewState::new(&first, config.dark_mode),
            ui: UiState::new(),
            session: Session::new(config.unknown_event_policy),
            current: DatasetSlot::Unavailable("No dataset selected".into()),
            outcome: RenderOutcome::NoSelection,
        };
        state.select_dataset(&first);
        state
    }

    /// Load `name` and make it current. The previous dataset is dropped.
    pub fn select_dataset(&mut self, name: &str) {
        profiling::scope!("select_dataset");

        self.ui.clear_error();
        self.ui.pending_event = None;

        let slot = match self.datasets.load(name) {
            LoadOutcome::Loaded { series, origin } => {
                match PreparedDataset::prepare(name, series, origin, self.point_budget) {
                    Ok(prepared) => DatasetSlot::Ready(prepared),
                    Err(e) => {
                        tracing::error!("Cannot prepare '{}': {}", name, e);
                        self.ui.report(&e);
                        DatasetSlot::Unavailable(e.user_message())
                    }
                }
            }
            LoadOutcome::Unavailable(reason) => {
                self.ui.set_error("Data Unavailable", reason.clone());
                DatasetSlot::Unavailable(reason)
            }
        };

        let selection = match &slot {
            DatasetSlot::Ready(ds) => ds.series.default_selection(),
            DatasetSlot::Unavailable(_) => Vec::new(),
        };
        self.view.switch_dataset(name, selection);
        self.current = slot;
        self.ui.invalidate();
    }

    /// Register a file from disk as a dataset and switch to it
    pub fn open_file(&mut self, path: &Path) {
        let name = self.datasets.register_file(path);
        tracing::info!("Opening {} as '{}'", path.display(), name);
        self.select_dataset(&name);
    }

    /// Tick or untick a channel
    pub fn toggle_channel(&mut self, column: usize) {
        self.view.toggle_channel(column);
        self.ui.invalidate();
    }

    /// Full view for the current dataset and selection
    pub fn reset_zoom(&mut self) {
        if let RenderOutcome::Ready(rendered) = &self.outcome {
            let key = rendered.key.clone();
            self.session.reset_zoom(&key);
            self.ui.invalidate();
        }
    }

    /// Re-run the pipeline if any input changed since the last pass
    pub fn render(&mut self) -> &RenderOutcome {
        if self.ui.needs_render {
            self.ui.needs_render = false;
            let pending = self
                .ui
                .take_event()
                .map(|(key, payload)| (key, ZoomEvent::from_payload(&payload)));
            self.outcome = match &self.current {
                DatasetSlot::Ready(ds) => self.session.render_pass(
                    ds,
                    &self.view.selected,
                    pending.as_ref().map(|(key, event)| (key, event)),
                ),
                DatasetSlot::Unavailable(reason) => RenderOutcome::Unavailable(reason.clone()),
            };
        }
        &self.outcome
    }

    pub fn prepared(&self) -> Option<&PreparedDataset> {
        match &self.current {
            DatasetSlot::Ready(ds) => Some(ds),
            DatasetSlot::Unavailable(_) => None,
        }
    }

    /// Column names of the current dataset
    pub fn channel_names(&self) -> &[String] {
        self.prepared()
            .map(|ds| ds.series.channel_names())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataOrigin;
    use crate::data::registry::DatasetEntry;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(rows: usize) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "date,HUFL,HULL,OT").unwrap();
        for i in 0..rows {
            writeln!(
                file,
                "2016-07-{:02} {:02}:00:00,{},{},{}",
                1 + i / 24,
                i % 24,
                i,
                i * 2,
                i * 3
            )
            .unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn state_for(file: &tempfile::NamedTempFile, point_budget: usize) -> AppState {
        let config = AppConfig {
            point_budget,
            datasets: DatasetRegistry::new(vec![DatasetEntry {
                name: "ETTh1".into(),
                path: file.path().to_path_buf(),
                timestamps: crate::data::TimestampSource::FirstColumn,
            }]),
            ..AppConfig::default()
        };
        AppState::new(config)
    }

    fn ready(state: &mut AppState) -> crate::chart::pipeline::RenderedView {
        match state.render() {
            RenderOutcome::Ready(view) => (**view).clone(),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_loads_first_dataset_with_default_selection() {
        let file = csv_file(48);
        let mut state = state_for(&file, 5000);
        assert_eq!(state.view.dataset, "ETTh1");
        assert_eq!(state.view.selected, vec![0, 1]);
        assert_eq!(state.channel_names(), ["HUFL", "HULL", "OT"]);
        assert_eq!(state.prepared().unwrap().origin, DataOrigin::File);

        let view = ready(&mut state);
        assert_eq!(view.spec.panel_count(), 2);
        assert_eq!(view.metrics.total_length, 48);
        assert_eq!(view.metrics.window_length, 48);
    }

    #[test]
    fn test_renderer_payload_round_trip() {
        let file = csv_file(48);
        let mut state = state_for(&file, 24);
        assert_eq!(state.prepared().unwrap().view.stride, 2);

        let key = ready(&mut state).key;
        state.ui.push_event(
            key,
            json!({"type": "datazoom", "batch": [{"start": 25.0, "end": 75.0}]}),
        );
        let view = ready(&mut state);
        assert_eq!(view.metrics.sampled_start_idx, 6);
        assert_eq!(view.metrics.real_start_idx, 12);
        assert_eq!(view.metrics.real_end_idx, 36);
        assert_eq!(view.metrics.display().start_date, "2016-07-01 12:00");

        // the next pass without an event keeps the viewport
        state.ui.invalidate();
        assert_eq!(ready(&mut state).zoom, view.zoom);
    }

    #[test]
    fn test_no_rerun_without_changes() {
        let file = csv_file(10);
        let mut state = state_for(&file, 5000);
        ready(&mut state);
        state.outcome = RenderOutcome::NoSelection;
        assert!(matches!(state.render(), RenderOutcome::NoSelection));
    }

    #[test]
    fn test_empty_selection() {
        let file = csv_file(10);
        let mut state = state_for(&file, 5000);
        state.toggle_channel(0);
        state.toggle_channel(1);
        assert!(matches!(state.render(), RenderOutcome::NoSelection));
    }

    #[test]
    fn test_reset_zoom() {
        let file = csv_file(10);
        let mut state = state_for(&file, 5000);
        let key = ready(&mut state).key;
        state.ui.push_event(key, json!({"start": 20.0, "end": 30.0}));
        assert_eq!(ready(&mut state).zoom.start_pct, 20.0);

        state.reset_zoom();
        assert_eq!(ready(&mut state).zoom, ZoomState::default());
    }

    #[test]
    fn test_payload_follows_emitting_selection() {
        let file = csv_file(20);
        let mut state = state_for(&file, 5000);
        let key = ready(&mut state).key;
        state.ui.push_event(key, json!({"start": 20.0, "end": 30.0}));

        // OT is ticked before the queued payload is consumed
        state.toggle_channel(2);
        let widened = ready(&mut state);
        assert_eq!(widened.key, ZoomKey::new("ETTh1", &[0, 1, 2]));
        assert_eq!(widened.zoom, ZoomState::default());

        state.toggle_channel(2);
        let back = ready(&mut state);
        assert_eq!(back.zoom.start_pct, 20.0);
        assert_eq!(back.zoom.end_pct, 30.0);
    }

    #[test]
    fn test_unavailable_dataset() {
        let file = csv_file(10);
        let mut state = state_for(&file, 5000);
        state.select_dataset("missing");
        assert!(state.ui.error.is_some());
        assert!(state.view.selected.is_empty());
        assert!(matches!(state.render(), RenderOutcome::Unavailable(_)));
    }

    #[test]
    fn test_open_file_registers_dataset() {
        let first = csv_file(10);
        let second = csv_file(30);
        let mut state = state_for(&first, 5000);
        state.open_file(second.path());

        assert_eq!(state.datasets.entries().len(), 2);
        assert_eq!(ready(&mut state).metrics.total_length, 30);
    }
}
