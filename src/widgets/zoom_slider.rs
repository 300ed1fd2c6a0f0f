//! Range slider drawn under each chart panel

use egui::{Color32, CornerRadius, Id, Pos2, Rect, Response, Sense, Stroke, StrokeKind, Ui};

use crate::chart::ZoomRange;
use crate::constants::zoom::{FULL_END_PCT, FULL_START_PCT};

/// Half width of the grab area around each handle, in points
const HANDLE_GRAB: f32 = 8.0;

/// Part of the slider a drag started on
#[derive(Debug, Clone, Copy, PartialEq)]
enum Grab {
    Start,
    End,
    Window { anchor_pct: f64, start: f64, end: f64 },
}

/// Dual-handle slider over `[0, 100]` percent with a data shadow behind it
pub struct ZoomSlider<'a> {
    id: Id,
    start: f64,
    end: f64,
    shadow: &'a [f64],
    labels: (&'a str, &'a str),
    height: f32,
    accent: Color32,
    background: Color32,
}

impl<'a> ZoomSlider<'a> {
    pub fn new(id: impl std::hash::Hash, start: f64, end: f64) -> Self {
        Self {
            id: Id::new(id),
            start,
            end,
            shadow: &[],
            labels: ("", ""),
            height: 40.0,
            accent: Color32::from_rgb(0x1f, 0x77, 0xb4),
            background: Color32::from_gray(0xf5),
        }
    }

    /// Series drawn faintly behind the window
    pub fn shadow(mut self, values: &'a [f64]) -> Self {
        self.shadow = values;
        self
    }

    /// Labels shown next to the start and end handles
    pub fn labels(mut self, start: &'a str, end: &'a str) -> Self {
        self.labels = (start, end);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn accent(mut self, color: Color32) -> Self {
        self.accent = color;
        self
    }

    pub fn background(mut self, color: Color32) -> Self {
        self.background = color;
        self
    }

    /// Draw the slider. Returns the new range when the user moved it this frame.
    pub fn show(self, ui: &mut Ui) -> (Response, Option<ZoomRange>) {
        let size = egui::vec2(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        let start = self.start.clamp(FULL_START_PCT, FULL_END_PCT);
        let end = self.end.clamp(start, FULL_END_PCT);
        let changed = self.interact(&response, rect, start, end);

        if ui.is_rect_visible(rect) {
            let (start, end) = changed.map(|r| (r.start, r.end)).unwrap_or((start, end));
            self.paint(ui, rect, start, end);
        }

        (response, changed)
    }

    fn interact(&self, response: &Response, rect: Rect, start: f64, end: f64) -> Option<ZoomRange> {
        let pointer = response.interact_pointer_pos()?;
        let pct = pct_at(rect, pointer.x);

        if response.drag_started() {
            let start_x = x_at(rect, start);
            let end_x = x_at(rect, end);
            let grab = if (pointer.x - start_x).abs() <= HANDLE_GRAB {
                Grab::Start
            } else if (pointer.x - end_x).abs() <= HANDLE_GRAB {
                Grab::End
            } else if pointer.x > start_x && pointer.x < end_x {
                Grab::Window {
                    anchor_pct: pct,
                    start,
                    end,
                }
            } else if pointer.x <= start_x {
                Grab::Start
            } else {
                Grab::End
            };
            response.ctx.data_mut(|d| d.insert_temp(self.id, grab));
        }

        if response.dragged() {
            let grab = response.ctx.data(|d| d.get_temp::<Grab>(self.id))?;
            let range = match grab {
                Grab::Start => ZoomRange::new(pct.min(end), end),
                Grab::End => ZoomRange::new(start, pct.max(start)),
                Grab::Window {
                    anchor_pct,
                    start: s0,
                    end: e0,
                } => {
                    let shift = (pct - anchor_pct).clamp(FULL_START_PCT - s0, FULL_END_PCT - e0);
                    ZoomRange::new(s0 + shift, e0 + shift)
                }
            };
            return (range.start != start || range.end != end).then_some(range);
        }

        if response.drag_stopped() {
            response.ctx.data_mut(|d| d.remove::<Grab>(self.id));
            return None;
        }

        // Plain click: center the current window on the pointer
        if response.clicked() {
            let half = (end - start) / 2.0;
            let center = pct.clamp(FULL_START_PCT + half, FULL_END_PCT - half);
            let range = ZoomRange::new(center - half, center + half);
            return (range.start != start).then_some(range);
        }

        None
    }

    fn paint(&self, ui: &Ui, rect: Rect, start: f64, end: f64) {
        let painter = ui.painter_at(rect.expand(2.0));
        let border = ui.visuals().widgets.noninteractive.bg_stroke;

        painter.rect_filled(rect, CornerRadius::same(2), self.background);
        self.paint_shadow(&painter, rect);

        let window = Rect::from_x_y_ranges(x_at(rect, start)..=x_at(rect, end), rect.y_range());
        painter.rect_filled(window, CornerRadius::ZERO, self.accent.gamma_multiply(0.2));
        painter.rect_stroke(rect, CornerRadius::same(2), border, StrokeKind::Inside);

        for x in [window.left(), window.right()] {
            let handle = Rect::from_center_size(Pos2::new(x, rect.center().y), egui::vec2(6.0, rect.height() * 0.7));
            painter.rect_filled(handle, CornerRadius::same(2), self.accent);
        }

        let text_color = ui.visuals().weak_text_color();
        let font = egui::FontId::proportional(10.0);
        painter.text(
            Pos2::new(window.left() - 4.0, rect.center().y),
            egui::Align2::RIGHT_CENTER,
            self.labels.0,
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(window.right() + 4.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            self.labels.1,
            font,
            text_color,
        );
    }

    fn paint_shadow(&self, painter: &egui::Painter, rect: Rect) {
        let (min, max) = self
            .shadow
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if self.shadow.len() < 2 || !min.is_finite() {
            return;
        }
        let span = if max > min { max - min } else { 1.0 };
        let last = (self.shadow.len() - 1) as f32;

        let points: Vec<Pos2> = self
            .shadow
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| {
                let x = rect.left() + rect.width() * i as f32 / last;
                let y = rect.bottom() - 2.0 - (rect.height() - 4.0) * ((v - min) / span) as f32;
                Pos2::new(x, y)
            })
            .collect();
        painter.add(egui::Shape::line(points, Stroke::new(1.0, Color32::from_gray(0xaa))));
    }
}

fn x_at(rect: Rect, pct: f64) -> f32 {
    rect.left() + rect.width() * (pct / FULL_END_PCT) as f32
}

fn pct_at(rect: Rect, x: f32) -> f64 {
    if rect.width() <= 0.0 {
        return FULL_START_PCT;
    }
    (((x - rect.left()) / rect.width()) as f64 * FULL_END_PCT).clamp(FULL_START_PCT, FULL_END_PCT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 0.0), egui::vec2(200.0, 40.0))
    }

    #[test]
    fn test_pct_mapping() {
        let r = rect();
        assert_eq!(x_at(r, 0.0), 100.0);
        assert_eq!(x_at(r, 50.0), 200.0);
        assert_eq!(pct_at(r, 300.0), 100.0);
        assert_eq!(pct_at(r, 150.0), 25.0);
    }

    #[test]
    fn test_pct_clamped_outside_track() {
        let r = rect();
        assert_eq!(pct_at(r, 0.0), 0.0);
        assert_eq!(pct_at(r, 900.0), 100.0);
    }

    #[test]
    fn test_degenerate_track() {
        let r = Rect::from_min_size(Pos2::ZERO, egui::vec2(0.0, 40.0));
        assert_eq!(pct_at(r, 10.0), 0.0);
    }
}
