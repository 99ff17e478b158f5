use std::fmt;
use std::str::FromStr;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Encodings the converter can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Bmp,
    Tiff,
    Ico,
    Tga,
    Pnm,
    Qoi,
    Avif,
    Svg,
}

impl OutputFormat {
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Png,
            OutputFormat::Jpeg,
            OutputFormat::WebP,
            OutputFormat::Gif,
            OutputFormat::Bmp,
            OutputFormat::Tiff,
            OutputFormat::Ico,
            OutputFormat::Tga,
            OutputFormat::Pnm,
            OutputFormat::Qoi,
            OutputFormat::Avif,
            OutputFormat::Svg,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG/JPG",
            OutputFormat::WebP => "WebP",
            OutputFormat::Gif => "GIF",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Tiff => "TIFF",
            OutputFormat::Ico => "ICO",
            OutputFormat::Tga => "TGA/TARGA",
            OutputFormat::Pnm => "PPM",
            OutputFormat::Qoi => "QOI",
            OutputFormat::Avif => "AVIF",
            OutputFormat::Svg => "SVG",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::Tiff => "image/tiff",
            OutputFormat::Ico => "image/x-icon",
            OutputFormat::Tga => "image/x-tga",
            OutputFormat::Pnm => "image/x-portable-pixmap",
            OutputFormat::Qoi => "image/x-qoi",
            OutputFormat::Avif => "image/avif",
            OutputFormat::Svg => "image/svg+xml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Ico => "ico",
            OutputFormat::Tga => "tga",
            OutputFormat::Pnm => "ppm",
            OutputFormat::Qoi => "qoi",
            OutputFormat::Avif => "avif",
            OutputFormat::Svg => "svg",
        }
    }

    /// Formats without an alpha channel get an opaque white background.
    pub fn supports_alpha(&self) -> bool {
        !matches!(
            self,
            OutputFormat::Jpeg | OutputFormat::Bmp | OutputFormat::Pnm
        )
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, OutputFormat::Svg)
    }

    pub fn is_lossy(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Avif)
    }

    /// Codec used for raster formats; `None` for SVG.
    pub fn image_format(&self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
            OutputFormat::WebP => Some(ImageFormat::WebP),
            OutputFormat::Gif => Some(ImageFormat::Gif),
            OutputFormat::Bmp => Some(ImageFormat::Bmp),
            OutputFormat::Tiff => Some(ImageFormat::Tiff),
            OutputFormat::Ico => Some(ImageFormat::Ico),
            OutputFormat::Tga => Some(ImageFormat::Tga),
            OutputFormat::Pnm => Some(ImageFormat::Pnm),
            OutputFormat::Qoi => Some(ImageFormat::Qoi),
            OutputFormat::Avif => Some(ImageFormat::Avif),
            OutputFormat::Svg => None,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.image_format() == Some(format))
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.mime() == mime)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    /// Accepts an extension (`jpg`, `jpeg`, `tif`), a MIME type or a label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match lower.as_str() {
            "jpeg" | "jpg" => return Ok(OutputFormat::Jpeg),
            "tif" | "tiff" => return Ok(OutputFormat::Tiff),
            "targa" | "tga" => return Ok(OutputFormat::Tga),
            "ppm" | "pnm" | "pbm" | "pgm" => return Ok(OutputFormat::Pnm),
            _ => {}
        }
        Self::all()
            .iter()
            .copied()
            .find(|f| {
                f.extension() == lower
                    || f.mime() == lower
                    || f.label().to_ascii_lowercase() == lower
            })
            .ok_or_else(|| format!("unknown output format '{s}'"))
    }
}
