use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{EverimageError, Result};

/// A decoded raster image.
/// Pixels are straight (non-premultiplied) RGBA8, row-major.
///
/// Transforms never mutate their input; they return a new `Bitmap`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub pixels: RgbaImage,
}

impl Bitmap {
    /// Fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            pixels: RgbaImage::new(width, height),
        })
    }

    /// Bitmap filled with a single colour.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(color)),
        })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Result<Self> {
        check_dimensions(pixels.width(), pixels.height())?;
        Ok(Self { pixels })
    }

    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        Self::from_rgba(image.to_rgba8())
    }

    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.pixels.clone())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn put(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.pixels.put_pixel(x, y, Rgba(color));
    }

    /// True if any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels.pixels().any(|p| p.0[3] < 255)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(EverimageError::InvalidDimensions { width, height });
    }
    Ok(())
}
