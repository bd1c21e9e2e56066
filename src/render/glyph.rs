use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::GaugeError;

use super::render_err;

/// Marker shapes drawn without any font backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerGlyph {
    Coin,
    Dot,
    Diamond,
    Triangle,
}

impl MarkerGlyph {
    /// Emoji and other glyphs we cannot rasterize become a coin.
    pub fn from_glyph(glyph: &str) -> Self {
        match glyph.trim() {
            "●" | "•" | "dot" => Self::Dot,
            "◆" | "♦" | "diamond" => Self::Diamond,
            "▼" | "▾" | "triangle" => Self::Triangle,
            _ => Self::Coin,
        }
    }
}

pub(super) fn draw_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    glyph: MarkerGlyph,
    (x, y): (u32, u32),
    size: u32,
    color: RGBColor,
    background: RGBColor,
) -> Result<(), GaugeError> {
    if size == 0 {
        return Ok(());
    }
    let (x, y, s) = (x as i32, y as i32, size as i32);
    let r = s / 2;
    let center = (x + r, y + r);

    match glyph {
        MarkerGlyph::Dot => {
            area.draw(&Circle::new(center, r, color.filled())).map_err(render_err)?;
        }
        MarkerGlyph::Coin => {
            area.draw(&Circle::new(center, r, color.filled())).map_err(render_err)?;
            area.draw(&Circle::new(center, r * 3 / 4, background.filled()))
                .map_err(render_err)?;
            area.draw(&Circle::new(center, r / 2, color.filled())).map_err(render_err)?;
        }
        MarkerGlyph::Diamond => {
            let points = vec![(x + r, y), (x + s - 1, y + r), (x + r, y + s - 1), (x, y + r)];
            area.draw(&Polygon::new(points, color.filled())).map_err(render_err)?;
        }
        MarkerGlyph::Triangle => {
            let points = vec![(x, y), (x + s - 1, y), (x + r, y + s - 1)];
            area.draw(&Polygon::new(points, color.filled())).map_err(render_err)?;
        }
    }
    Ok(())
}
