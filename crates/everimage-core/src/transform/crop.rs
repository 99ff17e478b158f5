use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::consts::{INITIAL_CROP_FRACTION, MIN_CROP_SIZE};
use crate::error::{EverimageError, Result};

/// A rectangle in display (on-screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A rectangle in natural image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn full(bitmap: &Bitmap) -> Self {
        Self {
            x: 0,
            y: 0,
            width: bitmap.width(),
            height: bitmap.height(),
        }
    }

    /// Reject empty rects and rects that leave the source.
    pub fn validated(&self, src_w: u32, src_h: u32) -> Result<PixelRect> {
        if self.width == 0 || self.height == 0 {
            return Err(EverimageError::InvalidCrop(
                "Crop width and height must be > 0".into(),
            ));
        }
        if self.x as u64 + self.width as u64 > src_w as u64
            || self.y as u64 + self.height as u64 > src_h as u64
        {
            return Err(EverimageError::InvalidCrop(format!(
                "Crop region ({},{} {}x{}) exceeds source dimensions ({src_w}x{src_h})",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(*self)
    }
}

/// How an image is laid out inside its on-screen box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayFit {
    /// Uniform scale, centred with letterbox bars (`object-fit: contain`).
    Contain,
    /// Independent horizontal and vertical scale filling the box.
    Stretch,
}

/// Relationship between an image's natural size and its rendered box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMapping {
    pub natural_width: u32,
    pub natural_height: u32,
    pub render_width: f64,
    pub render_height: f64,
    pub fit: DisplayFit,
}

impl DisplayMapping {
    /// Rendered at natural size: display coordinates are image coordinates.
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            natural_width: width,
            natural_height: height,
            render_width: width as f64,
            render_height: height as f64,
            fit: DisplayFit::Stretch,
        }
    }

    /// Map a display rect to natural pixels, clamped to the image.
    pub fn to_source(&self, rect: &CropRect) -> Result<PixelRect> {
        let nw = self.natural_width as f64;
        let nh = self.natural_height as f64;
        if self.natural_width == 0
            || self.natural_height == 0
            || self.render_width <= 0.0
            || self.render_height <= 0.0
        {
            return Err(EverimageError::InvalidCrop(
                "Image has no natural or rendered size".into(),
            ));
        }

        let (x0, y0, x1, y1) = match self.fit {
            DisplayFit::Contain => {
                let scale = (self.render_width / nw).min(self.render_height / nh);
                let off_x = (self.render_width - nw * scale) / 2.0;
                let off_y = (self.render_height - nh * scale) / 2.0;
                (
                    (rect.x - off_x) / scale,
                    (rect.y - off_y) / scale,
                    (rect.x + rect.width - off_x) / scale,
                    (rect.y + rect.height - off_y) / scale,
                )
            }
            DisplayFit::Stretch => {
                let sx = nw / self.render_width;
                let sy = nh / self.render_height;
                (
                    rect.x * sx,
                    rect.y * sy,
                    (rect.x + rect.width) * sx,
                    (rect.y + rect.height) * sy,
                )
            }
        };

        let sx = x0.clamp(0.0, nw);
        let sy = y0.clamp(0.0, nh);
        let ex = x1.clamp(0.0, nw);
        let ey = y1.clamp(0.0, nh);

        let x = (sx.floor() as u32).min(self.natural_width - 1);
        let y = (sy.floor() as u32).min(self.natural_height - 1);
        let width = ((ex - x as f64).max(1.0).round() as u32).clamp(1, self.natural_width - x);
        let height = ((ey - y as f64).max(1.0).round() as u32).clamp(1, self.natural_height - y);

        Ok(PixelRect {
            x,
            y,
            width,
            height,
        })
    }
}

/// Extract a region into a new bitmap sized to the region.
pub fn crop(bitmap: &Bitmap, rect: &PixelRect) -> Result<Bitmap> {
    let r = rect.validated(bitmap.width(), bitmap.height())?;
    let region = image::imageops::crop_imm(&bitmap.pixels, r.x, r.y, r.width, r.height).to_image();
    debug!(x = r.x, y = r.y, width = r.width, height = r.height, "Cropped");
    Bitmap::from_rgba(region)
}

/// Crop using a display-space rect.
pub fn crop_display(bitmap: &Bitmap, rect: &CropRect, mapping: &DisplayMapping) -> Result<Bitmap> {
    let source = mapping.to_source(rect)?;
    crop(bitmap, &source)
}

/// Which part of the crop overlay is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropHandle {
    Move,
    Nw,
    Ne,
    Sw,
    Se,
}

/// An in-progress drag of the crop overlay inside its container.
#[derive(Clone, Copy, Debug)]
pub struct CropDrag {
    pub start_x: f64,
    pub start_y: f64,
    pub start_rect: CropRect,
    pub handle: CropHandle,
    pub container_width: f64,
    pub container_height: f64,
}

impl CropDrag {
    /// Rect after the pointer moved to (`x`, `y`).
    ///
    /// Resizing never shrinks a side below `MIN_CROP_SIZE` and never leaves
    /// the container.
    pub fn update(&self, x: f64, y: f64) -> CropRect {
        let dx = x - self.start_x;
        let dy = y - self.start_y;
        let start = self.start_rect;
        let CropRect {
            x: mut rx,
            y: mut ry,
            width: mut rw,
            height: mut rh,
        } = start;

        match self.handle {
            CropHandle::Move => {
                rx = (start.x + dx).max(0.0).min(self.container_width - start.width);
                ry = (start.y + dy).max(0.0).min(self.container_height - start.height);
            }
            CropHandle::Se => {
                rw = self.grow_width(dx);
                rh = self.grow_height(dy);
            }
            CropHandle::Sw => {
                let cdx = dx.max(-start.x).min(start.width - MIN_CROP_SIZE);
                rx = start.x + cdx;
                rw = start.width - cdx;
                rh = self.grow_height(dy);
            }
            CropHandle::Ne => {
                let cdy = dy.max(-start.y).min(start.height - MIN_CROP_SIZE);
                ry = start.y + cdy;
                rh = start.height - cdy;
                rw = self.grow_width(dx);
            }
            CropHandle::Nw => {
                let cdx = dx.max(-start.x).min(start.width - MIN_CROP_SIZE);
                let cdy = dy.max(-start.y).min(start.height - MIN_CROP_SIZE);
                rx = start.x + cdx;
                ry = start.y + cdy;
                rw = start.width - cdx;
                rh = start.height - cdy;
            }
        }

        CropRect {
            x: rx,
            y: ry,
            width: rw,
            height: rh,
        }
    }

    fn grow_width(&self, dx: f64) -> f64 {
        (self.start_rect.width + dx)
            .min(self.container_width - self.start_rect.x)
            .max(MIN_CROP_SIZE)
    }

    fn grow_height(&self, dy: f64) -> f64 {
        (self.start_rect.height + dy)
            .min(self.container_height - self.start_rect.y)
            .max(MIN_CROP_SIZE)
    }
}

/// Centred square covering most of the container.
pub fn initial_crop_rect(container_width: f64, container_height: f64) -> CropRect {
    let size = container_width.min(container_height) * INITIAL_CROP_FRACTION;
    CropRect {
        x: (container_width - size) / 2.0,
        y: (container_height - size) / 2.0,
        width: size,
        height: size,
    }
}

/// Aspect ratio choices offered by the crop tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectPreset {
    Wide,
    Square,
    Portrait,
    #[default]
    Custom,
}

impl AspectPreset {
    pub fn label(&self) -> &'static str {
        match self {
            AspectPreset::Wide => "16:9",
            AspectPreset::Square => "1:1",
            AspectPreset::Portrait => "4:5",
            AspectPreset::Custom => "Custom",
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        match self {
            AspectPreset::Wide => Some(16.0 / 9.0),
            AspectPreset::Square => Some(1.0),
            AspectPreset::Portrait => Some(4.0 / 5.0),
            AspectPreset::Custom => None,
        }
    }

    /// Largest centred crop with this ratio, in percent of the image.
    /// `Custom` selects the whole image.
    pub fn initial_percent_crop(&self, image_width: f64, image_height: f64) -> CropRect {
        let Some(target) = self.ratio() else {
            return CropRect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            };
        };
        let image_aspect = image_width / image_height;
        let (width, height) = if image_aspect > target {
            ((target / image_aspect) * 100.0, 100.0)
        } else {
            (100.0, (image_aspect / target) * 100.0)
        };
        CropRect {
            x: (100.0 - width) / 2.0,
            y: (100.0 - height) / 2.0,
            width,
            height,
        }
    }
}

/// Convert a percentage rect to display pixels of a `width` x `height` box.
pub fn percent_to_display(rect: &CropRect, width: f64, height: f64) -> CropRect {
    CropRect {
        x: rect.x / 100.0 * width,
        y: rect.y / 100.0 * height,
        width: rect.width / 100.0 * width,
        height: rect.height / 100.0 * height,
    }
}
