mod toolbar;
mod series_panel;
mod plot;
mod metrics_panel;
mod help_dialog;

pub use toolbar::{render_error_banner, render_toolbar};
pub use series_panel::render_series_panel;
pub use plot::render_panels;
pub use metrics_panel::render_metrics_panel;
pub use help_dialog::render_help_dialog;
