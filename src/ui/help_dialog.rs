use crate::app::StackView;

pub fn render_help_dialog(app: &mut StackView, ctx: &eframe::egui::Context) {
    if app.state.ui.show_help {
        eframe::egui::Window::new("⌨ Keyboard Shortcuts")
            .anchor(eframe::egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Navigation");
                ui.label("R - Reset zoom for the current selection");
                ui.label("T - Toggle dark/light theme");
                ui.label("H / F1 - Toggle help");
                ui.label("ESC - Close help");

                ui.separator();
                ui.heading("Mouse Controls");
                ui.label("Scroll - Pan along time");
                ui.label("Ctrl + Scroll - Zoom time axis");
                ui.label("Drag chart - Pan view");
                ui.label("Drag slider handle - Move window edge");
                ui.label("Drag slider window - Shift window");
                ui.label("Click slider - Center window");

                ui.separator();
                ui.heading("Data");
                ui.label("Every panel shares one time window");
                ui.label("Each dataset/channel set keeps its own zoom");
                ui.label("Drop a CSV or Parquet file to open it");

                ui.separator();
                if ui.button("Close").clicked() {
                    app.state.ui.show_help = false;
                }
            });
    }
}
