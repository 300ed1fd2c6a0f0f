//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the application, making them easier to maintain and configure.

/// Downsampling defaults
pub mod sampling {
    /// Maximum number of points handed to the renderer per channel
    pub const DEFAULT_POINT_BUDGET: usize = 5000;
}

/// Viewport defaults (percentages of the sampled series)
pub mod zoom {
    pub const FULL_START_PCT: f64 = 0.0;
    pub const FULL_END_PCT: f64 = 100.0;
}

/// Stacked panel layout, in canvas pixels
pub mod layout {
    /// Height of a single channel chart
    pub const CHART_HEIGHT: u32 = 220;

    /// Height of the zoom slider under each chart
    pub const SLIDER_HEIGHT: u32 = 40;

    /// Gap between a chart and its own slider
    pub const GAP_BETWEEN: u32 = 10;

    /// Space below each slider
    pub const MARGIN_BOTTOM: u32 = 40;

    /// Vertical footprint of one panel
    pub const UNIT_HEIGHT: u32 = CHART_HEIGHT + GAP_BETWEEN + SLIDER_HEIGHT + MARGIN_BOTTOM;

    /// Left inset of every grid, leaves room for the channel name
    pub const GRID_LEFT: &str = "130px";

    pub const GRID_RIGHT: &str = "1%";

    /// Distance between the value axis and its name
    pub const Y_NAME_GAP: u32 = 80;

    /// Hover layer threshold passed to the renderer
    pub const HOVER_LAYER_THRESHOLD: u32 = 3000;

    /// Sidebar width in the native window
    pub const SIDEBAR_WIDTH: f32 = 240.0;

    /// Header (metrics) height in the native window
    pub const HEADER_HEIGHT: f32 = 70.0;
}

/// Panel colors, assigned cyclically by panel position
pub mod palette {
    pub const COLORS: [&str; 10] = [
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
        "#bcbd22", "#17becf",
    ];

    pub const SLIDER_BACKGROUND: &str = "#f5f5f5";

    pub const AXIS_NAME_COLOR: &str = "#000000";

    /// Color assigned to the panel at `index`
    pub fn color_for(index: usize) -> &'static str {
        COLORS[index % COLORS.len()]
    }
}

/// Date/time formatting and parsing
pub mod datetime {
    /// Format used for category labels and metric display
    pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Formats tried, in order, when a timestamp column arrives as text
    pub const PARSE_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M",
    ];

    /// Date-only formats (midnight is assumed)
    pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
}

/// Synthetic fallback series used when a dataset file is missing
pub mod synthetic {
    pub const ROWS: usize = 1000;

    pub const CHANNELS: usize = 5;

    pub const INTERVAL_MINUTES: i64 = 60;

    /// First timestamp, `YYYY-MM-DD`
    pub const START_DATE: &str = "2020-01-01";
}

/// Transient messages in the toolbar
pub mod status {
    use std::time::Duration;

    /// How long a confirmation stays visible
    pub const STATUS_DURATION: Duration = Duration::from_secs(3);
}

/// Configuration file lookup
pub mod config {
    /// Configuration file name, looked up in the working directory
    pub const CONFIG_FILE: &str = "stackview.json";

    /// Environment variable overriding the configuration path
    pub const CONFIG_ENV: &str = "STACKVIEW_CONFIG";

    /// Interval of generated timestamps for sensor datasets without a time column
    pub const SENSOR_INTERVAL_MINUTES: i64 = 5;
}
