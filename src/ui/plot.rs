use std::sync::Arc;

use eframe::egui::{self, Color32};
use egui_plot::{Line, Plot, PlotBounds};
use serde_json::Value;

use crate::app::StackView;
use crate::chart::spec::Panel;
use crate::chart::{RenderOutcome, ZoomEvent, ZoomRange};
use crate::constants::layout::{CHART_HEIGHT, GAP_BETWEEN, MARGIN_BOTTOM, SLIDER_HEIGHT};
use crate::constants::zoom::{FULL_END_PCT, FULL_START_PCT};
use crate::state::ZoomState;
use crate::widgets::ZoomSlider;

/// Smallest x movement, in sampled points, treated as a viewport change
const MOVE_EPSILON: f64 = 1e-6;

/// Parse a `#rrggbb` color from the chart spec
pub fn hex_color(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(Color32::GRAY)
}

/// Render every panel of the current chart spec: one plot plus its zoom slider.
///
/// Interactions are not applied here. Wheel and drag on a chart produce a
/// batch payload, slider movement a flat one; both are queued on the UI state
/// and picked up by the next render pass.
pub fn render_panels(app: &mut StackView, ctx: &egui::Context, ui: &mut egui::Ui) {
    profiling::scope!("render_panels");

    let RenderOutcome::Ready(rendered) = &app.state.outcome else {
        return;
    };
    let spec = &rendered.spec;
    let zoom = rendered.zoom;
    let visible = rendered.metrics.sampled_start_idx..=rendered.metrics.sampled_end_idx;
    let display = rendered.metrics.display();
    let dark_mode = app.state.view.dark_mode;

    let mut emitted: Option<Value> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Reserve the full stack so the scroll extent matches the layout
            ui.set_min_height(spec.canvas_height() as f32);
            for panel in spec.panels() {
                let labels = spec
                    .x_axis
                    .get(panel.index)
                    .map(|axis| Arc::clone(&axis.data))
                    .unwrap_or_default();

                if let Some(range) = chart(ui, &panel, labels, zoom, visible.clone()) {
                    emitted = Some(ZoomEvent::batch_payload(range));
                }

                ui.add_space(GAP_BETWEEN as f32);

                let background = match (dark_mode, panel.slider) {
                    (false, Some(slider)) => hex_color(&slider.background_color),
                    _ => ui.visuals().extreme_bg_color,
                };
                let (start, end) = panel
                    .slider
                    .map(|s| (s.start, s.end))
                    .unwrap_or((zoom.start_pct, zoom.end_pct));
                let (_, moved) = ZoomSlider::new(("stack_slider", panel.index), start, end)
                    .shadow(&panel.series.data)
                    .labels(&display.start_date, &display.end_date)
                    .height(SLIDER_HEIGHT as f32)
                    .accent(hex_color(&panel.series.line_style.color))
                    .background(background)
                    .show(ui);
                if let Some(range) = moved {
                    emitted = Some(ZoomEvent::slider_payload(range));
                }

                ui.add_space(MARGIN_BOTTOM as f32);
            }
        });

    if let Some(payload) = emitted {
        tracing::trace!("Renderer event: {}", payload);
        let key = rendered.key.clone();
        app.state.ui.push_event(key, payload);
        ctx.request_repaint();
    }
}

/// One chart panel. Returns the new range if the user wheeled or dragged it.
fn chart(
    ui: &mut egui::Ui,
    panel: &Panel<'_>,
    labels: Arc<Vec<String>>,
    zoom: ZoomState,
    visible: std::ops::RangeInclusive<usize>,
) -> Option<ZoomRange> {
    let len = labels.len();
    let x_min = x_for(len, zoom.start_pct);
    let x_max = x_for(len, zoom.end_pct);
    let (y_min, y_max) = value_bounds(panel.series.data.get(visible).unwrap_or(&[]));

    let color = hex_color(&panel.series.line_style.color);
    let points: Vec<[f64; 2]> = panel
        .series
        .data
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| [i as f64, v])
        .collect();

    ui.colored_label(color, &panel.y_axis.name);

    let plot = Plot::new(("stack_panel", panel.index))
        .height(CHART_HEIGHT as f32)
        .allow_zoom([true, false])
        .allow_drag([true, false])
        .allow_scroll([true, false])
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_axes([false, true])
        .y_axis_label(panel.y_axis.name.clone())
        .label_formatter(move |name, value| {
            let idx = value.x.round();
            let date = (idx >= 0.0)
                .then(|| labels.get(idx as usize))
                .flatten()
                .map(String::as_str)
                .unwrap_or("");
            if name.is_empty() {
                format!("{}\n{:.4}", date, value.y)
            } else {
                format!("{}\n{}\n{:.4}", name, date, value.y)
            }
        });

    let response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
        plot_ui.line(
            Line::new(panel.series.name.as_str(), points)
                .color(color)
                .width(panel.series.line_style.width as f32),
        );
    });

    let interacted = response.response.dragged() || response.response.hovered();
    let bounds = response.transform.bounds();
    let (new_min, new_max) = (bounds.min()[0], bounds.max()[0]);
    if !interacted || ((new_min - x_min).abs() < MOVE_EPSILON && (new_max - x_max).abs() < MOVE_EPSILON) {
        return None;
    }
    range_from_x(len, new_min, new_max)
}

/// X coordinate of a percentage over `len` sampled points
fn x_for(len: usize, pct: f64) -> f64 {
    len as f64 * pct / FULL_END_PCT
}

/// Percent range for an x interval, clamped to the series
fn range_from_x(len: usize, x_min: f64, x_max: f64) -> Option<ZoomRange> {
    if len == 0 {
        return None;
    }
    let start = (x_min / len as f64 * FULL_END_PCT).clamp(FULL_START_PCT, FULL_END_PCT);
    let end = (x_max / len as f64 * FULL_END_PCT).clamp(FULL_START_PCT, FULL_END_PCT);
    (end > start).then(|| ZoomRange::new(start, end))
}

/// Y range of the finite values, padded by 5%
fn value_bounds(values: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !min.is_finite() {
        return (-1.0, 1.0);
    }
    if max - min < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#1f77b4"), Color32::from_rgb(0x1f, 0x77, 0xb4));
        assert_eq!(hex_color("nope"), Color32::GRAY);
    }

    #[test]
    fn test_x_round_trip() {
        let x0 = x_for(200, 25.0);
        let x1 = x_for(200, 75.0);
        assert_eq!((x0, x1), (50.0, 150.0));
        assert_eq!(range_from_x(200, x0, x1), Some(ZoomRange::new(25.0, 75.0)));
    }

    #[test]
    fn test_range_from_x_clamps() {
        assert_eq!(range_from_x(100, -20.0, 50.0), Some(ZoomRange::new(0.0, 50.0)));
        assert_eq!(range_from_x(100, 90.0, 300.0), Some(ZoomRange::new(90.0, 100.0)));
        assert_eq!(range_from_x(100, 120.0, 300.0), None);
        assert_eq!(range_from_x(0, 0.0, 1.0), None);
    }

    #[test]
    fn test_value_bounds() {
        assert_eq!(value_bounds(&[]), (-1.0, 1.0));
        assert_eq!(value_bounds(&[f64::NAN, 3.0]), (2.0, 4.0));
        let (lo, hi) = value_bounds(&[0.0, 10.0, f64::INFINITY]);
        assert!((lo + 0.5).abs() < 1e-9);
        assert!((hi - 10.5).abs() < 1e-9);
    }
}
