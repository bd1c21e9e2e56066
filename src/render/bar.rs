use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::GaugeError;
use crate::ratio::clamp_unit;

use super::bitmap::Bitmap;
use super::color::HexColor;
use super::glyph::{draw_marker, MarkerGlyph};
use super::render_err;

/// Static bar geometry and palette. Sizes are canvas pixels; the canvas is
/// `display_scale` times larger than its on-screen size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSpec {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub track_thickness: u32,
    /// Stub width beyond the track thickness shown at zero progress.
    pub min_fill_extra: u32,
    pub fill_color: HexColor,
    pub track_color: HexColor,
    pub background_color: HexColor,
    pub marker_color: HexColor,
    pub marker_glyph: String,
    pub marker_size: u32,
    /// How many glyph widths the marker sits behind the fill edge.
    pub marker_lead: f64,
    pub marker_gap: u32,
    pub display_scale: u32,
}

impl Default for BarSpec {
    fn default() -> Self {
        Self {
            canvas_width: 600,
            canvas_height: 60,
            track_thickness: 12,
            min_fill_extra: 10,
            fill_color: HexColor::rgb(0xF7, 0x93, 0x1A),
            track_color: HexColor::rgb(0x3A, 0x3A, 0x3A),
            background_color: HexColor::rgb(0x1A, 0x1A, 0x1A),
            marker_color: HexColor::rgb(0xFF, 0xD7, 0x00),
            marker_glyph: "₿".to_string(),
            marker_size: 36,
            marker_lead: 1.25,
            marker_gap: 4,
            display_scale: 2,
        }
    }
}

impl BarSpec {
    pub fn min_stub_width(&self) -> u32 {
        self.track_thickness.saturating_add(self.min_fill_extra)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err("canvas must not be empty".to_string());
        }
        if self.track_thickness == 0 || self.track_thickness > self.canvas_height {
            return Err(format!(
                "track_thickness {} must be within 1..={}",
                self.track_thickness, self.canvas_height
            ));
        }
        if self.marker_size == 0 || self.marker_size > self.canvas_width {
            return Err(format!(
                "marker_size {} must be within 1..={}",
                self.marker_size, self.canvas_width
            ));
        }
        if !self.marker_lead.is_finite() || self.marker_lead < 0.0 {
            return Err(format!("marker_lead {} must be >= 0", self.marker_lead));
        }
        if self.display_scale == 0 {
            return Err("display_scale must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Pixel geometry of one bar, independent of any drawing backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    /// Progress after clamping to `[0, 1]`.
    pub progress: f64,
    pub fill_width: u32,
    pub track_y: u32,
    pub marker_x: u32,
    pub marker_y: u32,
}

impl BarLayout {
    pub fn compute(spec: &BarSpec, progress: f64) -> Self {
        let p = clamp_unit(progress);
        let width = spec.canvas_width;
        let max_marker_x = width.saturating_sub(spec.marker_size);

        let proportional = (width as f64 * p).round() as u32;
        let fill_width = proportional.max(spec.min_stub_width()).min(width);

        // Empty and saturated bars pin the marker to the edges.
        let marker_x = if p <= 0.0 {
            0
        } else if p >= 1.0 {
            max_marker_x
        } else {
            let lead = fill_width as f64 - spec.marker_lead * spec.marker_size as f64;
            lead.round().clamp(0.0, max_marker_x as f64) as u32
        };

        let track_y = spec.canvas_height.saturating_sub(spec.track_thickness);
        let marker_y = track_y.saturating_sub(spec.marker_size.saturating_add(spec.marker_gap));

        Self {
            progress: p,
            fill_width,
            track_y,
            marker_x,
            marker_y,
        }
    }
}

/// Paint track, fill and marker for `progress`. Out-of-range progress is
/// clamped, never rejected.
pub fn render(spec: &BarSpec, progress: f64) -> Result<Bitmap, GaugeError> {
    spec.validate().map_err(GaugeError::Render)?;
    let layout = BarLayout::compute(spec, progress);
    let (width, height) = (spec.canvas_width, spec.canvas_height);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&RGBColor::from(spec.background_color))
            .map_err(render_err)?;

        rounded_bar(
            &root,
            layout.track_y,
            width,
            spec.track_thickness,
            spec.track_color.into(),
        )?;
        rounded_bar(
            &root,
            layout.track_y,
            layout.fill_width,
            spec.track_thickness,
            spec.fill_color.into(),
        )?;
        draw_marker(
            &root,
            MarkerGlyph::from_glyph(&spec.marker_glyph),
            (layout.marker_x, layout.marker_y),
            spec.marker_size,
            spec.marker_color.into(),
            spec.background_color.into(),
        )?;
        root.present().map_err(render_err)?;
    }

    tracing::debug!(
        progress = layout.progress,
        fill_width = layout.fill_width,
        marker_x = layout.marker_x,
        "Bar rendered"
    );
    Ok(Bitmap::from_rgb(width, height, pixels))
}

/// Horizontal bar from x=0 with fully rounded ends (radius = thickness / 2).
fn rounded_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    y: u32,
    width: u32,
    thickness: u32,
    color: RGBColor,
) -> Result<(), GaugeError> {
    if width == 0 || thickness == 0 {
        return Ok(());
    }
    let r = (thickness / 2) as i32;
    let (x0, y0) = (0, y as i32);
    let x1 = width as i32 - 1;
    let y1 = y0 + thickness as i32 - 1;

    if x1 - r >= x0 + r {
        area.draw(&Rectangle::new([(x0 + r, y0), (x1 - r, y1)], color.filled()))
            .map_err(render_err)?;
    }
    area.draw(&Circle::new((x0 + r, y0 + r), r, color.filled()))
        .map_err(render_err)?;
    area.draw(&Circle::new((x1 - r, y0 + r), r, color.filled()))
        .map_err(render_err)?;
    Ok(())
}
