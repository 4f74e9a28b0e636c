//! Deterministic renderers: value formatting, text regions and the price chart.

pub mod chart;
pub mod format;
pub mod region;

pub use chart::{draw_chart, DrawCall, GridSurface, Point, RecordingSurface, Surface};
pub use format::{format_compact, format_fixed2, format_signed_percent, format_volume, Tone};
pub use region::{Line, Region, Render, ViewState, EMPTY_TEXT, LOADING_STATUS};
