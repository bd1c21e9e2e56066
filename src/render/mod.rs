//! Progress-bar rasterization on top of the plotters bitmap backend.

pub mod bar;
pub mod bitmap;
pub mod color;
pub mod glyph;

pub use bar::{render, BarLayout, BarSpec};
pub use bitmap::Bitmap;
pub use color::HexColor;
pub use glyph::MarkerGlyph;

use crate::error::GaugeError;

pub(crate) fn render_err<E: std::fmt::Debug>(e: E) -> GaugeError {
    GaugeError::Render(format!("{:?}", e))
}
