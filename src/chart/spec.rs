//! Declarative layout for N stacked channel panels sharing one horizontal zoom
//!
//! Field names follow the ECharts option format so the document can be handed
//! to a web renderer as-is; the native renderer in `ui::plot` reads the same
//! structure.

use serde::Serialize;
use std::sync::Arc;

use crate::chart::downsample::DownsampledView;
use crate::constants::datetime::DISPLAY_FORMAT;
use crate::constants::layout::{
    CHART_HEIGHT, GAP_BETWEEN, GRID_LEFT, GRID_RIGHT, HOVER_LAYER_THRESHOLD, SLIDER_HEIGHT,
    UNIT_HEIGHT, Y_NAME_GAP,
};
use crate::constants::palette::{AXIS_NAME_COLOR, SLIDER_BACKGROUND, color_for};
use crate::data::Channel;
use crate::state::ZoomState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub animation: bool,
    pub hover_layer_threshold: u32,
    pub tooltip: Tooltip,
    pub grid: Vec<Grid>,
    pub x_axis: Vec<XAxis>,
    pub y_axis: Vec<YAxis>,
    pub series: Vec<LineSeries>,
    pub data_zoom: Vec<DataZoom>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: String,
    pub axis_pointer: AxisPointer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPointer {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub left: String,
    pub right: String,
    pub top: u32,
    pub height: u32,
    pub contain_label: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub show: bool,
}

/// Shared time axis of one panel; every panel points at the same labels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub boundary_gap: bool,
    pub data: Arc<Vec<String>>,
    pub grid_index: usize,
    pub axis_label: Toggle,
    pub axis_tick: Toggle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub color: String,
    pub font_weight: String,
    pub font_size: u32,
    pub align: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashStyle {
    #[serde(rename = "type")]
    pub kind: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    pub show: bool,
    pub line_style: DashStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub grid_index: usize,
    pub name: String,
    pub name_location: String,
    pub name_rotate: u32,
    pub name_gap: u32,
    pub name_text_style: TextStyle,
    pub split_line: SplitLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x_axis_index: usize,
    pub y_axis_index: usize,
    /// Sampled values; NaN serializes as `null`
    pub data: Vec<f64>,
    pub show_symbol: bool,
    pub line_style: StrokeStyle,
    pub item_style: ItemStyle,
    pub sampling: String,
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataZoom {
    Inside(InsideZoom),
    Slider(SliderZoom),
}

/// Wheel zoom over every panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsideZoom {
    pub x_axis_index: Vec<usize>,
    pub zoom_on_mouse_wheel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBackground {
    pub line_style: Fill,
    pub area_style: Fill,
}

/// Slider under one panel; drives every panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderZoom {
    pub x_axis_index: Vec<usize>,
    pub top: u32,
    pub height: u32,
    pub start: f64,
    pub end: f64,
    pub show_data_shadow: bool,
    pub data_background: DataBackground,
    pub border_color: String,
    pub background_color: String,
    pub handle_size: String,
}

/// Everything the renderer needs for one panel
#[derive(Debug, Clone, Copy)]
pub struct Panel<'a> {
    pub index: usize,
    pub y_axis: &'a YAxis,
    pub series: &'a LineSeries,
    pub slider: Option<&'a SliderZoom>,
}

impl ChartSpec {
    pub fn panel_count(&self) -> usize {
        self.grid.len()
    }

    /// Canvas height hint for the renderer
    pub fn canvas_height(&self) -> u32 {
        self.panel_count() as u32 * UNIT_HEIGHT
    }

    pub fn sliders(&self) -> impl Iterator<Item = &SliderZoom> {
        self.data_zoom.iter().filter_map(|z| match z {
            DataZoom::Slider(s) => Some(s),
            DataZoom::Inside(_) => None,
        })
    }

    pub fn panels(&self) -> Vec<Panel<'_>> {
        let sliders: Vec<&SliderZoom> = self.sliders().collect();
        self.y_axis
            .iter()
            .zip(&self.series)
            .take(self.panel_count())
            .enumerate()
            .map(|(index, (y_axis, series))| Panel {
                index,
                y_axis,
                series,
                slider: sliders.get(index).copied(),
            })
            .collect()
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the stacked layout for `channels` over `view`, with every slider at `zoom`.
///
/// Panels follow column order regardless of the order `channels` arrive in.
pub fn build(view: &DownsampledView, channels: &[Channel], zoom: ZoomState) -> ChartSpec {
    profiling::scope!("build_chart_spec");

    let mut ordered = channels.to_vec();
    ordered.sort_by_key(|c| c.index);
    ordered.dedup_by_key(|c| c.index);

    let panel_count = ordered.len();
    let all_axes: Vec<usize> = (0..panel_count).collect();
    let categories: Arc<Vec<String>> = Arc::new(
        view.timestamps
            .iter()
            .map(|t| t.format(DISPLAY_FORMAT).to_string())
            .collect(),
    );

    let mut spec = ChartSpec {
        animation: false,
        hover_layer_threshold: HOVER_LAYER_THRESHOLD,
        tooltip: Tooltip {
            trigger: "axis".into(),
            axis_pointer: AxisPointer {
                kind: "cross".into(),
            },
        },
        grid: Vec::with_capacity(panel_count),
        x_axis: Vec::with_capacity(panel_count),
        y_axis: Vec::with_capacity(panel_count),
        series: Vec::with_capacity(panel_count),
        data_zoom: vec![DataZoom::Inside(InsideZoom {
            x_axis_index: all_axes.clone(),
            zoom_on_mouse_wheel: true,
        })],
    };

    for (i, channel) in ordered.iter().enumerate() {
        let color = color_for(i).to_string();
        let top = i as u32 * UNIT_HEIGHT;

        spec.grid.push(Grid {
            left: GRID_LEFT.into(),
            right: GRID_RIGHT.into(),
            top,
            height: CHART_HEIGHT,
            contain_label: false,
        });

        spec.x_axis.push(XAxis {
            kind: AxisKind::Category,
            boundary_gap: false,
            data: Arc::clone(&categories),
            grid_index: i,
            axis_label: Toggle { show: false },
            axis_tick: Toggle { show: false },
        });

        spec.y_axis.push(YAxis {
            kind: AxisKind::Value,
            grid_index: i,
            name: channel.name.clone(),
            name_location: "middle".into(),
            name_rotate: 0,
            name_gap: Y_NAME_GAP,
            name_text_style: TextStyle {
                color: AXIS_NAME_COLOR.into(),
                font_weight: "bold".into(),
                font_size: 14,
                align: "right".into(),
            },
            split_line: SplitLine {
                show: true,
                line_style: DashStyle {
                    kind: "dashed".into(),
                    opacity: 0.5,
                },
            },
        });

        spec.series.push(LineSeries {
            name: channel.name.clone(),
            kind: "line".into(),
            x_axis_index: i,
            y_axis_index: i,
            data: view.matrix.column(channel.index).unwrap_or_default(),
            show_symbol: false,
            line_style: StrokeStyle {
                width: 1.5,
                color: color.clone(),
            },
            item_style: ItemStyle {
                color: color.clone(),
            },
            sampling: "lttb".into(),
            silent: true,
        });

        spec.data_zoom.push(DataZoom::Slider(SliderZoom {
            x_axis_index: all_axes.clone(),
            top: top + CHART_HEIGHT + GAP_BETWEEN,
            height: SLIDER_HEIGHT,
            start: zoom.start_pct,
            end: zoom.end_pct,
            show_data_shadow: true,
            data_background: DataBackground {
                line_style: Fill {
                    color: color.clone(),
                    opacity: 0.6,
                },
                area_style: Fill {
                    color,
                    opacity: 0.2,
                },
            },
            border_color: "transparent".into(),
            background_color: SLIDER_BACKGROUND.into(),
            handle_size: "100%".into(),
        }));
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::downsample::downsample;
    use crate::data::Matrix;
    use crate::data::source::generate_timestamps;
    use chrono::NaiveDate;

    fn view(n: usize, cols: usize) -> DownsampledView {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts = generate_timestamps(start, 60, n).unwrap();
        let columns: Vec<Vec<f64>> = (0..cols)
            .map(|c| (0..n).map(|r| (r * 10 + c) as f64).collect())
            .collect();
        downsample(&ts, &Matrix::from_columns(&columns).unwrap(), 5000).unwrap()
    }

    fn channel(name: &str, index: usize) -> Channel {
        Channel {
            name: name.to_string(),
            index,
        }
    }

    #[test]
    fn test_panel_count_and_height() {
        let v = view(20, 4);
        for n in 0..=4 {
            let channels: Vec<Channel> = (0..n).map(|i| channel(&format!("c{}", i), i)).collect();
            let spec = build(&v, &channels, ZoomState::default());
            assert_eq!(spec.panel_count(), n);
            assert_eq!(spec.x_axis.len(), n);
            assert_eq!(spec.y_axis.len(), n);
            assert_eq!(spec.series.len(), n);
            assert_eq!(spec.sliders().count(), n);
            assert_eq!(spec.data_zoom.len(), n + 1);
            assert_eq!(spec.canvas_height(), n as u32 * (220 + 10 + 40 + 40));
        }
    }

    #[test]
    fn test_panels_follow_column_order() {
        let v = view(10, 3);
        let forward = build(&v, &[channel("a", 0), channel("c", 2)], ZoomState::default());
        let reversed = build(&v, &[channel("c", 2), channel("a", 0)], ZoomState::default());
        assert_eq!(forward, reversed);
        assert_eq!(forward.series[0].name, "a");
        assert_eq!(forward.series[1].name, "c");
        assert_eq!(forward.series[1].data[1], 12.0);
    }

    #[test]
    fn test_layout_offsets() {
        let v = view(10, 2);
        let spec = build(&v, &[channel("a", 0), channel("b", 1)], ZoomState::default());
        assert_eq!(spec.grid[1].top, 310);
        assert_eq!(spec.grid[1].height, 220);
        let sliders: Vec<&SliderZoom> = spec.sliders().collect();
        assert_eq!(sliders[0].top, 230);
        assert_eq!(sliders[1].top, 540);
        assert_eq!(sliders[1].x_axis_index, vec![0, 1]);
    }

    #[test]
    fn test_sliders_show_zoom_state() {
        let v = view(10, 2);
        let zoom = ZoomState {
            start_pct: 12.5,
            end_pct: 62.5,
        };
        let channels = [channel("a", 0), channel("b", 1)];
        let first = build(&v, &channels, zoom);
        let second = build(&v, &channels, zoom);
        assert_eq!(first, second);
        for slider in first.sliders() {
            assert_eq!((slider.start, slider.end), (12.5, 62.5));
        }
    }

    #[test]
    fn test_colors_cycle_by_position() {
        let v = view(5, 12);
        let channels: Vec<Channel> = (0..12).map(|i| channel(&format!("c{}", i), i)).collect();
        let spec = build(&v, &channels, ZoomState::default());
        assert_eq!(spec.series[0].line_style.color, "#1f77b4");
        assert_eq!(spec.series[10].line_style.color, "#1f77b4");
        assert_eq!(spec.series[11].item_style.color, "#ff7f0e");
    }

    #[test]
    fn test_shared_category_labels() {
        let v = view(3, 2);
        let spec = build(&v, &[channel("a", 0), channel("b", 1)], ZoomState::default());
        assert_eq!(
            spec.x_axis[0].data.as_slice(),
            ["2020-01-01 00:00", "2020-01-01 01:00", "2020-01-01 02:00"]
        );
        assert!(Arc::ptr_eq(&spec.x_axis[0].data, &spec.x_axis[1].data));
    }

    #[test]
    fn test_json_shape() {
        let v = view(3, 1);
        let spec = build(&v, &[channel("OT", 0)], ZoomState::default());
        let json: serde_json::Value = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["animation"], false);
        assert_eq!(json["hoverLayerThreshold"], 3000);
        assert_eq!(json["xAxis"][0]["type"], "category");
        assert_eq!(json["yAxis"][0]["nameGap"], 80);
        assert_eq!(json["dataZoom"][0]["type"], "inside");
        assert_eq!(json["dataZoom"][0]["zoomOnMouseWheel"], true);
        assert_eq!(json["dataZoom"][1]["type"], "slider");
        assert_eq!(json["dataZoom"][1]["end"], 100.0);
        assert_eq!(json["series"][0]["lineStyle"]["width"], 1.5);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts = generate_timestamps(start, 60, 2).unwrap();
        let m = Matrix::from_columns(&[vec![1.0, f64::NAN]]).unwrap();
        let v = downsample(&ts, &m, 10).unwrap();
        let spec = build(&v, &[channel("x", 0)], ZoomState::default());
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json["series"][0]["data"][1].is_null());
    }

    #[test]
    fn test_panels_accessor() {
        let v = view(4, 2);
        let spec = build(&v, &[channel("a", 0), channel("b", 1)], ZoomState::default());
        let panels = spec.panels();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[1].y_axis.name, "b");
        assert_eq!(panels[1].slider.map(|s| s.top), Some(540));
    }
}
