//! Reusable UI widgets

mod zoom_slider;

pub use zoom_slider::ZoomSlider;
