use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::convert::svg::rasterize_svg;
use crate::error::{EverimageError, Result};

/// Encoding of a user-supplied file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Raster(ImageFormat),
    Svg,
}

impl SourceFormat {
    pub fn is_vector(&self) -> bool {
        matches!(self, SourceFormat::Svg)
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime(&self) -> &'static str {
        match self {
            SourceFormat::Svg => "image/svg+xml",
            SourceFormat::Raster(f) => f.to_mime_type(),
        }
    }
}

/// An uploaded file: its name, raw bytes and detected encoding.
#[derive(Clone, Debug)]
pub struct InputImage {
    pub name: String,
    pub bytes: Vec<u8>,
    pub format: SourceFormat,
}

impl InputImage {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Self::from_bytes(name, bytes)
    }

    /// Detect the encoding from the file name first, then from the content.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let format = detect_format(&name, &bytes)?;
        debug!(name = %name, mime = format.mime(), size = bytes.len(), "Input detected");
        Ok(Self {
            name,
            bytes,
            format,
        })
    }

    pub fn decode(&self) -> Result<Bitmap> {
        match self.format {
            SourceFormat::Svg => rasterize_svg(&self.bytes),
            SourceFormat::Raster(format) => {
                let img = image::load_from_memory_with_format(&self.bytes, format)?;
                Bitmap::from_dynamic(&img)
            }
        }
    }
}

fn detect_format(name: &str, bytes: &[u8]) -> Result<SourceFormat> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if ext.as_deref() == Some("svg") || looks_like_svg(bytes) {
        return Ok(SourceFormat::Svg);
    }
    if let Ok(format) = image::guess_format(bytes) {
        return Ok(SourceFormat::Raster(format));
    }
    ext.as_deref()
        .and_then(ImageFormat::from_extension)
        .map(SourceFormat::Raster)
        .ok_or_else(|| EverimageError::UnknownFormat(name.to_string()))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    (trimmed.starts_with("<?xml") || trimmed.starts_with("<svg")) && text.contains("<svg")
}

/// Load and decode an image file (raster or SVG).
pub fn load_bitmap(path: &Path) -> Result<Bitmap> {
    InputImage::open(path)?.decode()
}

/// Encode a bitmap as PNG bytes.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    bitmap.pixels.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Save a bitmap, choosing the format from the file extension (PNG otherwise).
pub fn save_bitmap(bitmap: &Bitmap, path: &Path) -> Result<()> {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .unwrap_or(ImageFormat::Png);
    match format {
        ImageFormat::Jpeg | ImageFormat::Bmp => {
            let flat = crate::composite::flatten_on_white(bitmap);
            image::DynamicImage::ImageRgba8(flat.pixels)
                .to_rgb8()
                .save_with_format(path, format)?;
        }
        _ => bitmap.pixels.save_with_format(path, format)?,
    }
    debug!(path = %path.display(), "Bitmap saved");
    Ok(())
}
