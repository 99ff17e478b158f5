/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Smallest side (display pixels) an interactively resized crop rect may have.
pub const MIN_CROP_SIZE: f64 = 20.0;

/// Fraction of the smaller container side used for the initial playground crop.
pub const INITIAL_CROP_FRACTION: f64 = 0.6;

/// Playground zoom bounds and wheel step.
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 4.0;
pub const ZOOM_STEP: f32 = 0.1;

/// Cut-out view zoom, in percent.
pub const CUTOUT_MIN_ZOOM: u32 = 50;
pub const CUTOUT_MAX_ZOOM: u32 = 300;
pub const CUTOUT_ZOOM_STEP: u32 = 10;

/// Eraser radius bounds for the cut-out editor.
pub const ERASER_MIN_SIZE: u32 = 5;
pub const ERASER_MAX_SIZE: u32 = 100;
pub const DEFAULT_ERASER_SIZE: u32 = 20;

/// JPEG quality used by format conversion.
pub const JPEG_QUALITY: u8 = 95;

/// Brush radius bounds (pixels).
pub const BRUSH_MIN_SIZE: u32 = 5;
pub const BRUSH_MAX_SIZE: u32 = 100;

/// Feather upper bound (pixels).
pub const BRUSH_MAX_FEATHER: u32 = 50;

/// Blur strength and mosaic block bounds.
pub const EFFECT_MIN: u32 = 5;
pub const EFFECT_MAX: u32 = 50;

/// Distance from the canvas edge for non-custom overlay positions.
pub const OVERLAY_PADDING: f32 = 20.0;

/// Longest side a compressed image may keep.
pub const COMPRESS_MAX_DIMENSION: u32 = 4096;

/// Quality decrement per lossy compression retry.
pub const COMPRESS_QUALITY_STEP: f32 = 0.05;

/// Lowest quality the compressor will try.
pub const COMPRESS_MIN_QUALITY: f32 = 0.05;

/// Maximum re-encode attempts while searching for the size budget.
pub const COMPRESS_MAX_ITERATIONS: usize = 10;

/// Font size range for text layers and text watermarks.
pub const MIN_FONT_SIZE: f32 = 12.0;
pub const MAX_FONT_SIZE: f32 = 1000.0;

/// Drop shadow for text: offset, blur radius and opacity.
pub const TEXT_SHADOW_OFFSET: f32 = 2.0;
pub const TEXT_SHADOW_BLUR: u32 = 4;
pub const TEXT_SHADOW_ALPHA: f32 = 0.5;

/// Tolerance when snapping rotated canvas sizes to whole pixels.
pub const DIMENSION_EPSILON: f64 = 1e-6;

/// Watermark scale slider bounds, in percent.
pub const WATERMARK_MIN_SCALE: f32 = 10.0;
pub const WATERMARK_MAX_SCALE: f32 = 1000.0;

/// Overlay rotation slider bounds, in degrees.
pub const MAX_OVERLAY_ROTATION: f32 = 180.0;

/// Download name of the cut-out editor result.
pub const CUTOUT_EXPORT_NAME: &str = "removed-background.png";
