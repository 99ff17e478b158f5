mod common;

use everimage_core::bitmap::Bitmap;
use everimage_core::convert::{convert, convert_with_quality, encode, OutputFormat};
use everimage_core::error::EverimageError;
use everimage_core::io::export::{base_name, export_name, ExportSuffix};
use everimage_core::io::image_io::{load_bitmap, save_bitmap, InputImage, SourceFormat};
use image::ImageFormat;

const RED_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#ff0000"/></svg>"##;

const HALF_SVG: &str = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="10" height="10" fill="#0000ff"/></svg>"##;

fn png_input(name: &str, bitmap: &Bitmap) -> InputImage {
    InputImage::from_bytes(name, common::encode(bitmap, ImageFormat::Png)).unwrap()
}

// ---------------------------------------------------------------------------
// Format parsing
// ---------------------------------------------------------------------------

#[test]
fn test_output_format_from_str() {
    assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    assert_eq!(".JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    assert_eq!("image/webp".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
    assert_eq!("tif".parse::<OutputFormat>().unwrap(), OutputFormat::Tiff);
    assert_eq!("svg".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
    assert!("heic".parse::<OutputFormat>().is_err());
}

#[test]
fn test_output_format_mime_roundtrip() {
    for f in OutputFormat::all() {
        assert_eq!(OutputFormat::from_mime(f.mime()), Some(*f));
    }
}

#[test]
fn test_alpha_support() {
    assert!(OutputFormat::Png.supports_alpha());
    assert!(!OutputFormat::Jpeg.supports_alpha());
    assert!(!OutputFormat::Bmp.supports_alpha());
}

// ---------------------------------------------------------------------------
// Input detection
// ---------------------------------------------------------------------------

#[test]
fn test_detects_raster_by_content() {
    let input = png_input("upload.bin", &common::solid(3, 3, [1, 2, 3]));
    assert_eq!(input.format, SourceFormat::Raster(ImageFormat::Png));
    assert_eq!(input.format.mime(), "image/png");
}

#[test]
fn test_detects_svg_by_content() {
    let input = InputImage::from_bytes("drawing", HALF_SVG.as_bytes().to_vec()).unwrap();
    assert!(input.format.is_vector());
}

#[test]
fn test_unknown_bytes_fail() {
    let result = InputImage::from_bytes("notes.txt", b"hello world".to_vec());
    assert!(matches!(result, Err(EverimageError::UnknownFormat(_))));
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[test]
fn test_raster_to_svg_is_rejected() {
    let input = png_input("photo.png", &common::solid(4, 4, [0, 0, 0]));
    assert!(matches!(
        convert(&input, OutputFormat::Svg),
        Err(EverimageError::UnsupportedConversion { .. })
    ));
}

#[test]
fn test_svg_to_svg_passes_through() {
    let input = InputImage::from_bytes("icon.svg", RED_SVG.as_bytes().to_vec()).unwrap();
    let out = convert(&input, OutputFormat::Svg).unwrap();
    assert_eq!(out.bytes, RED_SVG.as_bytes());
    assert_eq!(out.file_name, "icon-converted.svg");
}

#[test]
fn test_svg_rasterises_at_intrinsic_size() {
    let input = InputImage::from_bytes("icon.svg", RED_SVG.as_bytes().to_vec()).unwrap();
    let out = convert(&input, OutputFormat::Png).unwrap();
    let decoded = InputImage::from_bytes("x.png", out.bytes).unwrap().decode().unwrap();
    assert_eq!(decoded.dimensions(), (20, 10));
    assert_eq!(decoded.get(10, 5), [255, 0, 0, 255]);
}

#[test]
fn test_svg_keeps_transparency() {
    let bitmap = InputImage::from_bytes("half.svg", HALF_SVG.as_bytes().to_vec())
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(bitmap.get(5, 5), [0, 0, 255, 255]);
    assert_eq!(bitmap.get(15, 5)[3], 0);
}

#[test]
fn test_transparent_to_jpeg_is_white() {
    let input = png_input("clear.png", &Bitmap::new(16, 16).unwrap());
    let out = convert(&input, OutputFormat::Jpeg).unwrap();
    assert_eq!(out.file_name, "clear-converted.jpg");
    let decoded = InputImage::from_bytes("x.jpg", out.bytes).unwrap().decode().unwrap();
    let p = decoded.get(8, 8);
    assert!(p[0] >= 250 && p[1] >= 250 && p[2] >= 250, "{p:?}");
}

#[test]
fn test_jpeg_quality_affects_size() {
    let input = png_input("ramp.png", &common::gradient(128, 128));
    let high = convert_with_quality(&input, OutputFormat::Jpeg, 95).unwrap();
    let low = convert_with_quality(&input, OutputFormat::Jpeg, 10).unwrap();
    assert!(low.bytes.len() < high.bytes.len());
}

#[test]
fn test_encode_roundtrips_lossless_formats() {
    let img = common::coordinate_map(9, 7);
    for format in [OutputFormat::Png, OutputFormat::Bmp, OutputFormat::Tiff, OutputFormat::Qoi] {
        let bytes = encode(&img, format, 90).unwrap();
        let decoded = InputImage::from_bytes(format!("x.{}", format.extension()), bytes)
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!(decoded, img, "{format}");
    }
}

#[test]
fn test_encode_svg_is_rejected() {
    let img = common::solid(2, 2, [0, 0, 0]);
    assert!(encode(&img, OutputFormat::Svg, 90).is_err());
}

// ---------------------------------------------------------------------------
// Files and names
// ---------------------------------------------------------------------------

#[test]
fn test_export_names() {
    assert_eq!(base_name("my.holiday.photo.png"), "my");
    assert_eq!(
        export_name("a.png", ExportSuffix::Compressed, "jpeg"),
        "a-compressed.jpeg"
    );
    assert_eq!(
        export_name("", ExportSuffix::Converted, "png"),
        "image-converted.png"
    );
}

#[test]
fn test_save_and_load_bitmap() {
    let dir = tempfile::tempdir().unwrap();
    let img = common::coordinate_map(12, 8);

    let png = dir.path().join("out.png");
    save_bitmap(&img, &png).unwrap();
    assert_eq!(load_bitmap(&png).unwrap(), img);

    let mut clear = img.clone();
    clear.put(0, 0, [10, 10, 10, 0]);
    let jpg = dir.path().join("out.jpg");
    save_bitmap(&clear, &jpg).unwrap();
    let loaded = load_bitmap(&jpg).unwrap();
    assert_eq!(loaded.dimensions(), (12, 8));
    assert!(!loaded.has_transparency());
}
