use crate::config::AppConfig;
use crate::perf::FrameTimer;
use crate::state;

pub struct StackView {
    pub state: state::AppState,
    pub frame_timer: FrameTimer,
}

impl StackView {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: state::AppState::new(config),
            frame_timer: FrameTimer::new(),
        }
    }

    /// Keyboard shortcuts. Ignored while a text field has focus.
    pub fn handle_shortcuts(&mut self, ctx: &eframe::egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (reset, theme, help, close) = ctx.input(|i| {
            (
                i.key_pressed(eframe::egui::Key::R),
                i.key_pressed(eframe::egui::Key::T),
                i.key_pressed(eframe::egui::Key::H) || i.key_pressed(eframe::egui::Key::F1),
                i.key_pressed(eframe::egui::Key::Escape),
            )
        });

        if reset {
            self.state.reset_zoom();
        }
        if theme {
            self.state.view.toggle_dark_mode();
        }
        if help {
            self.state.ui.show_help = !self.state.ui.show_help;
        }
        if close {
            self.state.ui.show_help = false;
        }
    }
}
