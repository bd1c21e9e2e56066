use image::ImageEncoder;
use std::path::Path;

use crate::error::GaugeError;

/// Packed RGB8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// On-screen size after the caller scales the canvas down.
    pub fn display_size(&self, scale: u32) -> (u32, u32) {
        let scale = scale.max(1);
        (self.width / scale, self.height / scale)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, GaugeError> {
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out).write_image(
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;
        Ok(out)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), GaugeError> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }
}
