use eframe::egui;
use egui_extras::{Size, StripBuilder};

use crate::app::StackView;
use crate::chart::RenderOutcome;
use crate::chart::window::MetricsDisplay;

/// Header row with the window metrics of the last render pass
pub fn render_metrics_panel(app: &StackView, ui: &mut egui::Ui) {
    let RenderOutcome::Ready(rendered) = &app.state.outcome else {
        return;
    };
    let display = rendered.metrics.display();

    StripBuilder::new(ui)
        .sizes(Size::remainder(), 5)
        .horizontal(|mut strip| {
            for (caption, value) in metric_cells(&display) {
                strip.cell(|ui| {
                    ui.vertical(|ui| {
                        ui.small(caption);
                        ui.strong(value);
                    });
                });
            }
        });
}

/// Caption and value for each header cell, left to right
fn metric_cells(display: &MetricsDisplay) -> [(&'static str, &str); 5] {
    [
        ("Total Data Length", &display.total_length),
        ("Start Index", &display.start_index),
        ("Current Window Size", &display.window_length),
        ("Start Date", &display.start_date),
        ("End Date", &display.end_date),
    ]
}
