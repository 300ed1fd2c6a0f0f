//! Dataset and channel selection

/// What the user has picked in the sidebar
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Name of the dataset in the registry
    pub dataset: String,

    /// Selected column indices, in the order they were ticked
    pub selected: Vec<usize>,

    /// Dark mode theme toggle
    pub dark_mode: bool,
}

impl ViewState {
    pub fn new(dataset: &str, dark_mode: bool) -> Self {
        Self {
            dataset: dataset.to_string(),
            selected: Vec::new(),
            dark_mode,
        }
    }

    pub fn is_selected(&self, column: usize) -> bool {
        self.selected.contains(&column)
    }

    /// Tick or untick a channel
    pub fn toggle_channel(&mut self, column: usize) {
        if self.is_selected(column) {
            self.selected.retain(|&c| c != column);
        } else {
            self.selected.push(column);
        }
    }

    /// Switch dataset and replace the selection
    pub fn switch_dataset(&mut self, dataset: &str, selection: Vec<usize>) {
        self.dataset = dataset.to_string();
        self.selected = selection;
    }

    /// Toggle dark mode
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_channel() {
        let mut view = ViewState::new("ETTh1", false);
        view.toggle_channel(3);
        view.toggle_channel(1);
        assert_eq!(view.selected, vec![3, 1]);
        view.toggle_channel(3);
        assert_eq!(view.selected, vec![1]);
        assert!(view.is_selected(1));
        assert!(!view.is_selected(3));
    }

    #[test]
    fn test_switch_dataset_replaces_selection() {
        let mut view = ViewState::new("ETTh1", false);
        view.toggle_channel(4);
        view.switch_dataset("Weather", vec![0, 1]);
        assert_eq!(view.dataset, "Weather");
        assert_eq!(view.selected, vec![0, 1]);
    }
}
