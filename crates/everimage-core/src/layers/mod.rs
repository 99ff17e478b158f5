pub mod position;
pub mod stack;
pub mod text;
pub mod watermark;

use crate::bitmap::Bitmap;
use crate::composite::draw_over;

pub use position::Position;
pub use stack::{LayerStack, TextLayer};
pub use text::{clamp_font_size, load_font, parse_color, FontBook, TextMeasure, TextStyle};
pub use watermark::{TextMark, Watermark, WatermarkKind, WatermarkSettings};

/// Draw `sprite` with its centre at (`cx`, `cy`), snapped to whole pixels.
pub(crate) fn draw_centered(canvas: &mut Bitmap, sprite: &Bitmap, cx: f32, cy: f32, alpha: f32) {
    let dx = (cx - sprite.width() as f32 / 2.0).round() as i64;
    let dy = (cy - sprite.height() as f32 / 2.0).round() as i64;
    draw_over(canvas, sprite, dx, dy, alpha);
}
