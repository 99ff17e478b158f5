#![allow(dead_code)]

use std::io::Cursor;

use everimage_core::bitmap::Bitmap;
use everimage_core::layers::TextMeasure;
use image::ImageFormat;

/// Opaque bitmap of one colour.
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Bitmap {
    Bitmap::filled(width, height, [rgb[0], rgb[1], rgb[2], 255]).unwrap()
}

/// Opaque bitmap whose red channel encodes x and green encodes y, so every
/// pixel is distinguishable on images up to 256x256.
pub fn coordinate_map(width: u32, height: u32) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            bitmap.put(x, y, [x as u8, y as u8, 0, 255]);
        }
    }
    bitmap
}

/// Black and white squares of `cell` pixels.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let v = if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 };
            bitmap.put(x, y, [v, v, v, 255]);
        }
    }
    bitmap
}

/// Horizontal grey ramp with some noise-like variation for codecs.
pub fn gradient(width: u32, height: u32) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 255) / width.max(1)) as u8;
            let n = ((x * 31 + y * 17) % 23) as u8;
            bitmap.put(x, y, [v, v.wrapping_add(n), 255 - v, 255]);
        }
    }
    bitmap
}

pub fn encode(bitmap: &Bitmap, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => bitmap
            .to_dynamic()
            .to_rgb8()
            .write_to(&mut out, format)
            .unwrap(),
        _ => bitmap.pixels.write_to(&mut out, format).unwrap(),
    }
    out.into_inner()
}

/// Every character is `0.5 * font_size` wide.
pub struct FixedWidth;

impl TextMeasure for FixedWidth {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.5
    }
}

const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
];

/// Path of an installed DejaVu face such as `"DejaVuSans.ttf"`.
pub fn dejavu_path(file: &str) -> Option<std::path::PathBuf> {
    FONT_DIRS
        .iter()
        .map(|dir| std::path::Path::new(dir).join(file))
        .find(|p| p.exists())
}

/// A system TrueType font file, when one is installed.
pub fn system_font_path() -> Option<std::path::PathBuf> {
    dejavu_path("DejaVuSans.ttf").or_else(|| {
        let arial = std::path::PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf");
        arial.exists().then_some(arial)
    })
}

/// A system TrueType font, when one is installed.
pub fn system_font() -> Option<ab_glyph::FontArc> {
    system_font_path().and_then(|p| everimage_core::layers::load_font(&p).ok())
}
