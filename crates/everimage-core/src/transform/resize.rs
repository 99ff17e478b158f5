use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::{EverimageError, Result};

/// Resampling filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    pub fn to_filter(&self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Scale to exactly `width` x `height`. Aspect ratio is not preserved.
pub fn resize(bitmap: &Bitmap, width: u32, height: u32, filter: ResizeFilter) -> Result<Bitmap> {
    if width == 0 || height == 0 {
        return Err(EverimageError::InvalidDimensions { width, height });
    }
    if bitmap.dimensions() == (width, height) {
        return Ok(bitmap.clone());
    }
    let scaled = imageops::resize(&bitmap.pixels, width, height, filter.to_filter());
    debug!(
        from_w = bitmap.width(),
        from_h = bitmap.height(),
        width,
        height,
        "Resized"
    );
    Bitmap::from_rgba(scaled)
}

/// Fill in a missing side from the source aspect ratio.
pub fn fit_dimensions(
    src_w: u32,
    src_h: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<(u32, u32)> {
    let dims = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let h = (w as f64 * src_h as f64 / src_w as f64).round().max(1.0) as u32;
            (w, h)
        }
        (None, Some(h)) => {
            let w = (h as f64 * src_w as f64 / src_h as f64).round().max(1.0) as u32;
            (w, h)
        }
        (None, None) => (src_w, src_h),
    };
    if dims.0 == 0 || dims.1 == 0 {
        return Err(EverimageError::InvalidDimensions {
            width: dims.0,
            height: dims.1,
        });
    }
    Ok(dims)
}
