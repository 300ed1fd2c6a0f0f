use eframe::egui::{self, ComboBox};

use crate::app::StackView;
use crate::chart::window::format_count;
use crate::constants::palette;
use crate::data::DataOrigin;
use crate::ui::plot::hex_color;

/// Render the dataset picker and channel selection (left sidebar)
pub fn render_series_panel(app: &mut StackView, ui: &mut egui::Ui) {
    ui.heading("Dataset");
    ui.separator();

    let current = app.state.view.dataset.clone();
    let mut picked: Option<String> = None;
    ComboBox::from_id_salt("dataset_picker")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for name in app.state.datasets.names() {
                if ui.selectable_label(name == current, name).clicked() && name != current {
                    picked = Some(name.to_string());
                }
            }
        });
    if let Some(name) = picked {
        app.state.select_dataset(&name);
    }

    if ui.button("📂 Open file…").on_hover_text("CSV or Parquet").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &["csv", "parquet", "npz"])
            .pick_file()
        {
            app.state.open_file(&path);
        }
    }

    let Some(prepared) = app.state.prepared() else {
        return;
    };
    let total = prepared.total_len();
    let sampled = prepared.view.len();
    let stride = prepared.view.stride;
    let sampled_view = prepared.is_sampled();
    let synthetic = prepared.origin == DataOrigin::Synthetic;
    let names = app.state.channel_names().to_vec();

    if synthetic {
        ui.add_space(4.0);
        ui.colored_label(
            egui::Color32::from_rgb(255, 165, 0),
            "⚠ File not found, showing generated sample data",
        );
    }

    ui.add_space(8.0);
    ui.heading("Channels");
    ui.separator();

    let mut toggled: Option<usize> = None;
    egui::ScrollArea::vertical()
        .max_height(ui.available_height() * 0.6)
        .show(ui, |ui| {
            for (i, name) in names.iter().enumerate() {
                let mut checked = app.state.view.is_selected(i);
                if ui.checkbox(&mut checked, name).changed() {
                    toggled = Some(i);
                }
            }
        });
    if let Some(column) = toggled {
        app.state.toggle_channel(column);
    }

    // Legend follows panel order: selected columns ascending
    let mut selected: Vec<usize> = app
        .state
        .view
        .selected
        .iter()
        .copied()
        .filter(|&c| c < names.len())
        .collect();
    selected.sort_unstable();
    selected.dedup();

    if !selected.is_empty() {
        ui.add_space(8.0);
        ui.label("Legend");
        for (position, &column) in selected.iter().enumerate() {
            ui.horizontal(|ui| {
                let color = hex_color(palette::color_for(position));
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 4.0, color);
                ui.label(&names[column]);
            });
        }
    }

    ui.add_space(8.0);
    ui.separator();
    if sampled_view {
        ui.small(format!(
            "Sampled {} → {} points (every {})",
            format_count(total),
            format_count(sampled),
            stride
        ));
    } else {
        ui.small(format!("{} points, not sampled", format_count(total)));
    }
}

