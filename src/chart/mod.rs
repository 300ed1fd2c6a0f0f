//! Windowed-view engine: downsampling, event normalization, window resolution
//! and the stacked chart layout.

pub mod downsample;
pub mod event;
pub mod pipeline;
pub mod spec;
pub mod window;

pub use event::{ZoomEvent, ZoomRange};
pub use pipeline::{PreparedDataset, RenderOutcome, Session};
