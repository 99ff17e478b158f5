//! Size-budgeted re-encoding.
//!
//! Strategy: cap the longest side, encode in the source's format, then step
//! the JPEG quality down (or the dimensions, for lossless formats) until the
//! payload fits the budget. A result larger than the input is discarded.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bitmap::Bitmap;
use crate::consts::{
    COMPRESS_MAX_DIMENSION, COMPRESS_MAX_ITERATIONS, COMPRESS_MIN_QUALITY, COMPRESS_QUALITY_STEP,
};
use crate::convert::{encode, OutputFormat};
use crate::error::Result;
use crate::io::export::{export_name, ExportSuffix};
use crate::io::image_io::{InputImage, SourceFormat};
use crate::transform::resize::{resize, ResizeFilter};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Upper bound on output size plus the starting quality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressionBudget {
    pub max_size_mb: f64,
    /// Initial quality in (0, 1].
    pub quality: f32,
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

fn default_max_dimension() -> u32 {
    COMPRESS_MAX_DIMENSION
}

impl CompressionBudget {
    /// User-supplied budget: size in MB, quality in percent.
    pub fn custom(max_size_mb: f64, quality_percent: u32) -> Self {
        Self {
            max_size_mb: max_size_mb.max(0.01),
            quality: (quality_percent.clamp(1, 100) as f32) / 100.0,
            max_dimension: COMPRESS_MAX_DIMENSION,
        }
    }

    pub fn max_size_bytes(&self) -> usize {
        (self.max_size_mb * BYTES_PER_MB) as usize
    }
}

impl Default for CompressionBudget {
    fn default() -> Self {
        CompressionPreset::default().budget()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionPreset {
    Light,
    #[default]
    Medium,
    Heavy,
    Maximum,
}

impl CompressionPreset {
    pub fn all() -> &'static [CompressionPreset] {
        &[
            CompressionPreset::Light,
            CompressionPreset::Medium,
            CompressionPreset::Heavy,
            CompressionPreset::Maximum,
        ]
    }

    pub fn budget(&self) -> CompressionBudget {
        let (max_size_mb, quality) = match self {
            CompressionPreset::Light => (2.0, 0.9),
            CompressionPreset::Medium => (1.0, 0.8),
            CompressionPreset::Heavy => (0.5, 0.7),
            CompressionPreset::Maximum => (0.2, 0.6),
        };
        CompressionBudget {
            max_size_mb,
            quality,
            max_dimension: COMPRESS_MAX_DIMENSION,
        }
    }
}

impl fmt::Display for CompressionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CompressionPreset::Light => "Light (High Quality)",
            CompressionPreset::Medium => "Medium (Balanced)",
            CompressionPreset::Heavy => "Heavy (Small Size)",
            CompressionPreset::Maximum => "Maximum (Tiny)",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug)]
pub struct Compressed {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub original_size: usize,
    pub file_name: String,
}

impl Compressed {
    pub fn compressed_size(&self) -> usize {
        self.bytes.len()
    }

    /// Saved space as a percentage string, e.g. `"42.5%"`.
    pub fn ratio(&self) -> String {
        compression_ratio(self.original_size, self.compressed_size())
    }
}

/// `(original - compressed) / original` formatted with one decimal.
pub fn compression_ratio(original: usize, compressed: usize) -> String {
    if original == 0 || compressed == 0 {
        return "0%".to_string();
    }
    let ratio = (original as f64 - compressed as f64) / original as f64 * 100.0;
    format!("{ratio:.1}%")
}

/// Human-readable size with two decimals at most: `"1.5 MB"`.
pub fn format_file_size(bytes: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let k = 1024f64;
    let i = ((bytes as f64).ln() / k.ln()).floor().min(3.0) as usize;
    let value = (bytes as f64 / k.powi(i as i32) * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[i])
}

/// Compress an upload to fit `budget`.
pub fn compress(input: &InputImage, budget: &CompressionBudget) -> Result<Compressed> {
    let original_size = input.bytes.len();
    let mut bitmap = cap_dimensions(input.decode()?, budget.max_dimension)?;

    let format = match input.format {
        SourceFormat::Raster(f) => OutputFormat::from_image_format(f)
            .filter(|f| !f.is_vector())
            .unwrap_or(OutputFormat::Jpeg),
        SourceFormat::Svg if bitmap.has_transparency() => OutputFormat::Png,
        SourceFormat::Svg => OutputFormat::Jpeg,
    };
    let uses_quality = format == OutputFormat::Jpeg;
    let limit = budget.max_size_bytes();

    let mut quality = budget.quality.clamp(COMPRESS_MIN_QUALITY, 1.0);
    let mut bytes = encode(&bitmap, format, to_percent(quality))?;
    let mut iterations = 0;
    while bytes.len() > limit && iterations < COMPRESS_MAX_ITERATIONS {
        iterations += 1;
        if uses_quality {
            if quality <= COMPRESS_MIN_QUALITY {
                break;
            }
            quality = (quality - COMPRESS_QUALITY_STEP).max(COMPRESS_MIN_QUALITY);
        } else {
            let w = ((bitmap.width() as f32) * 0.9).round().max(1.0) as u32;
            let h = ((bitmap.height() as f32) * 0.9).round().max(1.0) as u32;
            if (w, h) == bitmap.dimensions() {
                break;
            }
            bitmap = resize(&bitmap, w, h, ResizeFilter::Bilinear)?;
        }
        bytes = encode(&bitmap, format, to_percent(quality))?;
        debug!(iterations, quality, size = bytes.len(), limit, "Compression retry");
    }

    let same_format = format.mime() == input.format.mime();
    if same_format && bytes.len() >= original_size {
        bytes = input.bytes.clone();
    }

    let ext = if same_format {
        input
            .format
            .mime()
            .split('/')
            .nth(1)
            .unwrap_or("jpg")
            .to_string()
    } else {
        format.extension().to_string()
    };

    info!(
        original = original_size,
        compressed = bytes.len(),
        iterations,
        "Compressed"
    );
    Ok(Compressed {
        bytes,
        format,
        original_size,
        file_name: export_name(&input.name, ExportSuffix::Compressed, &ext),
    })
}

fn to_percent(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn cap_dimensions(bitmap: Bitmap, max_dimension: u32) -> Result<Bitmap> {
    let (w, h) = bitmap.dimensions();
    let longest = w.max(h);
    if max_dimension == 0 || longest <= max_dimension {
        return Ok(bitmap);
    }
    let scale = max_dimension as f64 / longest as f64;
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    resize(&bitmap, nw, nh, ResizeFilter::Bilinear)
}
