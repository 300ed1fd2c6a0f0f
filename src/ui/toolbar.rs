use eframe::egui;
use std::time::Instant;

use crate::app::StackView;
use crate::chart::RenderOutcome;
use crate::constants::status::STATUS_DURATION;
use crate::error::{PlotError, Result};

/// Render the compact toolbar above the charts and handle dropped files
pub fn render_toolbar(app: &mut StackView, ctx: &egui::Context, ui: &mut egui::Ui) {
    let ready = matches!(app.state.outcome, RenderOutcome::Ready(_));
    app.state.ui.expire_status(Instant::now());

    ui.horizontal(|ui| {
        if ui
            .add_enabled(ready, egui::Button::new("🔄"))
            .on_hover_text("Reset zoom (R)")
            .clicked()
        {
            app.state.reset_zoom();
        }

        if ui
            .add_enabled(ready, egui::Button::new("📋"))
            .on_hover_text("Copy chart spec as JSON")
            .clicked()
        {
            match copy_spec(app) {
                Ok(()) => {
                    app.state
                        .ui
                        .set_status("Chart spec copied to clipboard", Instant::now());
                    ctx.request_repaint_after(STATUS_DURATION);
                }
                Err(e) => {
                    tracing::warn!("Copy failed: {}", e);
                    app.state.ui.report(&e);
                }
            }
        }

        let theme_icon = if app.state.view.dark_mode { "☀" } else { "🌙" };
        if ui.button(theme_icon).on_hover_text("Toggle theme (T)").clicked() {
            app.state.view.toggle_dark_mode();
        }

        if ui.button("❓").on_hover_text("Help (H)").clicked() {
            app.state.ui.show_help = !app.state.ui.show_help;
        }

        if let Some(status) = &app.state.ui.status {
            ui.separator();
            ui.weak(&status.text);
        }
    });

    // Handle drag and drop using Option combinators
    let dropped = ctx.input(|i| {
        i.raw
            .dropped_files
            .first()
            .and_then(|f| f.path.clone())
    });
    if let Some(path) = dropped {
        app.state.open_file(&path);
    }
}

/// Error banner with a dismiss button
pub fn render_error_banner(app: &mut StackView, ui: &mut egui::Ui) {
    let Some(banner) = &app.state.ui.error else {
        return;
    };

    let mut dismissed = false;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(ui.visuals().error_fg_color, format!("⚠ {}", banner.title));
                ui.label(&banner.message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismissed = ui.small_button("✖").clicked();
                });
            });
        });

    if dismissed {
        app.state.ui.clear_error();
    }
}

fn copy_spec(app: &StackView) -> Result<()> {
    let RenderOutcome::Ready(rendered) = &app.state.outcome else {
        return Ok(());
    };
    let json = rendered.spec.to_json_pretty()?;
    arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(json))
        .map_err(|e| PlotError::Clipboard(e.to_string()))
}
