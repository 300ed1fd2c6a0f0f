use eframe::App;
use eframe::egui::{self, CentralPanel, SidePanel, TopBottomPanel};

mod app;
mod chart;
mod config;
mod constants;
mod data;
mod error;
mod perf;
mod state;
mod ui;
mod widgets;

use app::StackView;
use chart::RenderOutcome;
use config::AppConfig;
use constants::layout::{HEADER_HEIGHT, SIDEBAR_WIDTH};

impl App for StackView {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame_timer.begin_frame();

        // Set theme
        if self.state.view.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        self.handle_shortcuts(ctx);

        SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                ui::render_series_panel(self, ui);
            });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("📁 {}", self.state.view.dataset));
                if let Some(prepared) = self.state.prepared() {
                    ui.separator();
                    ui.label(format!(
                        "Rows: {} | Channels: {}",
                        prepared.total_len(),
                        prepared.series.channel_names().len()
                    ));
                }
                if let RenderOutcome::Ready(rendered) = &self.state.outcome {
                    ui.separator();
                    ui.label(format!("Panels: {}", rendered.spec.panel_count()));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("{:.1} ms", self.frame_timer.avg_frame_ms()));
                });
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            ui::render_toolbar(self, ctx, ui);
            ui::render_error_banner(self, ui);

            // Sidebar and toolbar actions above are folded in before drawing
            self.state.render();
            let notice = match &self.state.outcome {
                RenderOutcome::Unavailable(reason) => Some(("Data unavailable", reason.clone())),
                RenderOutcome::NoSelection => Some((
                    "No channel selected",
                    "Tick at least one channel in the sidebar".to_string(),
                )),
                RenderOutcome::Ready(_) => None,
            };

            if let Some((heading, detail)) = notice {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading(heading);
                    ui.label(detail);
                });
                return;
            }

            ui.separator();
            ui.allocate_ui(egui::vec2(ui.available_width(), HEADER_HEIGHT), |ui| {
                ui::render_metrics_panel(self, ui);
            });
            ui.separator();
            ui::render_panels(self, ctx, ui);
        });

        // Help dialog
        ui::render_help_dialog(self, ctx);
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    #[cfg(feature = "profile-with-puffin")]
    let _profiler = perf::start_profiler();

    let config = AppConfig::load_or_default(&AppConfig::default_path());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("StackView")
            .with_inner_size([1280.0, 860.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "StackView - Synchronized Time Series",
        options,
        Box::new(|_| Ok(Box::new(StackView::new(config)))),
    )
}
