pub mod format;
pub mod svg;

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::info;

use crate::bitmap::Bitmap;
use crate::composite::flatten_on_white;
use crate::consts::JPEG_QUALITY;
use crate::error::{EverimageError, Result};
use crate::io::export::{export_name, ExportSuffix};
use crate::io::image_io::{InputImage, SourceFormat};

pub use format::OutputFormat;

/// Result of a conversion: encoded bytes plus the download name.
#[derive(Clone, Debug)]
pub struct Converted {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub file_name: String,
}

/// Encode a bitmap. `jpeg_quality` is 1-100 and only used by lossy codecs.
///
/// Formats without alpha are flattened onto white first.
pub fn encode(bitmap: &Bitmap, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let Some(codec) = format.image_format() else {
        return Err(EverimageError::UnsupportedConversion {
            from: "raster".into(),
            to: format.label().into(),
        });
    };

    let mut out = Cursor::new(Vec::new());
    if !format.supports_alpha() {
        let rgb = DynamicImage::ImageRgba8(flatten_on_white(bitmap).pixels).to_rgb8();
        if format == OutputFormat::Jpeg {
            let encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)?;
        } else {
            rgb.write_to(&mut out, codec)?;
        }
    } else {
        bitmap.pixels.write_to(&mut out, codec)?;
    }
    Ok(out.into_inner())
}

/// Re-encode an uploaded image into `target`.
///
/// Raster input cannot become SVG. SVG input is rasterised at its intrinsic
/// size, or passed through unchanged when the target is also SVG.
pub fn convert(input: &InputImage, target: OutputFormat) -> Result<Converted> {
    convert_with_quality(input, target, JPEG_QUALITY)
}

/// [`convert`] with an explicit JPEG quality (1-100).
pub fn convert_with_quality(
    input: &InputImage,
    target: OutputFormat,
    jpeg_quality: u8,
) -> Result<Converted> {
    let bytes = match (input.format, target.is_vector()) {
        (SourceFormat::Raster(_), true) => {
            return Err(EverimageError::UnsupportedConversion {
                from: "raster".into(),
                to: target.label().into(),
            });
        }
        (SourceFormat::Svg, true) => input.bytes.clone(),
        (_, false) => {
            let bitmap = input.decode()?;
            encode(&bitmap, target, jpeg_quality)?
        }
    };

    info!(
        source = input.format.mime(),
        target = target.mime(),
        size = bytes.len(),
        "Converted"
    );
    Ok(Converted {
        bytes,
        format: target,
        file_name: export_name(&input.name, ExportSuffix::Converted, target.extension()),
    })
}
