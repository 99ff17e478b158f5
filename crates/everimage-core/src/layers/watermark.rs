use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bitmap::Bitmap;
use crate::consts::{MAX_OVERLAY_ROTATION, WATERMARK_MAX_SCALE, WATERMARK_MIN_SCALE};
use crate::error::{EverimageError, Result};
use crate::io::export::{export_name, ExportSuffix};
use crate::layers::draw_centered;
use crate::layers::position::Position;
use crate::layers::text::{
    clamp_font_size, draw_text, parse_color, FontBook, TextMeasure, TextStyle,
};
use crate::transform::resize::{resize, ResizeFilter};
use crate::transform::rotate::rotate;

/// Controls shared by image and text watermarks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkSettings {
    /// 0-100.
    pub opacity: f32,
    /// Percent of the mark's natural size, 10-1000.
    pub scale: f32,
    /// Degrees clockwise about the mark's own centre, -180..=180.
    pub rotation: f32,
    pub position: Position,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            opacity: 50.0,
            scale: 100.0,
            rotation: 0.0,
            position: Position::BottomRight,
        }
    }
}

impl WatermarkSettings {
    pub fn clamped(&self) -> Self {
        Self {
            opacity: self.opacity.clamp(0.0, 100.0),
            scale: self.scale.clamp(WATERMARK_MIN_SCALE, WATERMARK_MAX_SCALE),
            rotation: self.rotation.clamp(-MAX_OVERLAY_ROTATION, MAX_OVERLAY_ROTATION),
            position: match self.position {
                Position::Custom { x_pct, y_pct } => Position::Custom {
                    x_pct: x_pct.clamp(0.0, 100.0),
                    y_pct: y_pct.clamp(0.0, 100.0),
                },
                p => p,
            },
        }
    }
}

/// A text watermark before scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMark {
    pub text: String,
    /// Font family; `None` uses the fallback face.
    pub font: Option<String>,
    /// Clamped to 12-1000 before scaling.
    pub font_size: f32,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub shadow: bool,
}

impl Default for TextMark {
    fn default() -> Self {
        Self {
            text: "WATERMARK".into(),
            font: None,
            font_size: 64.0,
            color: "#ffffff".into(),
            bold: true,
            italic: false,
            shadow: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub enum WatermarkKind {
    #[default]
    None,
    Image(Bitmap),
    Text(TextMark),
}

#[derive(Clone, Debug, Default)]
pub struct Watermark {
    pub kind: WatermarkKind,
    pub settings: WatermarkSettings,
    dragging: bool,
}

impl Watermark {
    pub fn new(kind: WatermarkKind, settings: WatermarkSettings) -> Self {
        Self {
            kind,
            settings: settings.clamped(),
            dragging: false,
        }
    }

    /// Size of the mark's unrotated box after scaling. Text marks are
    /// `measured width x scaled font size`.
    pub fn box_size(&self, measure: Option<&dyn TextMeasure>) -> Option<(f32, f32)> {
        let scale = self.settings.scale / 100.0;
        match &self.kind {
            WatermarkKind::None => None,
            WatermarkKind::Image(mark) => {
                Some((mark.width() as f32 * scale, mark.height() as f32 * scale))
            }
            WatermarkKind::Text(mark) => {
                let size = clamp_font_size(mark.font_size) * scale;
                measure.map(|m| (m.family_width(mark.font.as_deref(), &mark.text, size), size))
            }
        }
    }

    /// Top-left of the unrotated box on a `canvas_w` x `canvas_h` canvas.
    pub fn placement(
        &self,
        canvas_w: u32,
        canvas_h: u32,
        measure: Option<&dyn TextMeasure>,
    ) -> Option<(f32, f32)> {
        let (w, h) = self.box_size(measure)?;
        Some(
            self.settings
                .position
                .compute(canvas_w as f32, canvas_h as f32, w, h),
        )
    }

    /// Draw the mark onto a copy of `base`. Text marks take their face from
    /// `fonts`; image marks ignore it.
    pub fn apply(&self, base: &Bitmap, fonts: &FontBook) -> Result<Bitmap> {
        let mut out = base.clone();
        let (cw, ch) = base.dimensions();
        let s = &self.settings;
        let alpha = s.opacity / 100.0;
        let scale = s.scale / 100.0;

        match &self.kind {
            WatermarkKind::None => {}
            WatermarkKind::Image(mark) => {
                let (w, h) = (mark.width() as f32 * scale, mark.height() as f32 * scale);
                let (x, y) = s.position.compute(cw as f32, ch as f32, w, h);
                let scaled = resize(
                    mark,
                    (w.round() as u32).max(1),
                    (h.round() as u32).max(1),
                    ResizeFilter::Bilinear,
                )?;
                let sprite = if s.rotation != 0.0 {
                    rotate(&scaled, s.rotation as f64)?
                } else {
                    scaled
                };
                draw_centered(&mut out, &sprite, x + w / 2.0, y + h / 2.0, alpha);
            }
            WatermarkKind::Text(mark) => {
                if fonts.is_empty() {
                    return Err(EverimageError::Font(
                        "A font is required for text watermarks".into(),
                    ));
                }
                let font = fonts.get(mark.font.as_deref())?;
                let size = clamp_font_size(mark.font_size) * scale;
                let style = TextStyle {
                    font_size: size,
                    color: parse_color(&mark.color)?,
                    bold: mark.bold,
                    italic: mark.italic,
                };
                let w = font.text_width(&mark.text, size);
                let (x, y) = s.position.compute(cw as f32, ch as f32, w, size);
                draw_text(
                    &mut out,
                    font,
                    &mark.text,
                    &style,
                    x + w / 2.0,
                    y + size / 2.0,
                    s.rotation,
                    alpha,
                    mark.shadow,
                )?;
            }
        }
        info!(
            position = ?s.position,
            opacity = s.opacity,
            scale = s.scale,
            rotation = s.rotation,
            "Watermark applied"
        );
        Ok(out)
    }

    /// Dragging only moves custom-positioned marks.
    pub fn pointer_down(&mut self) {
        self.dragging = self.settings.position.is_custom();
    }

    /// The custom position follows the pointer, stored as clamped
    /// percentages of the canvas.
    pub fn pointer_move(&mut self, x: f32, y: f32, canvas_w: u32, canvas_h: u32) {
        if !self.dragging || !self.settings.position.is_custom() {
            return;
        }
        self.settings.position = Position::custom_at(x, y, canvas_w as f32, canvas_h as f32);
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn export_name(original_name: &str) -> String {
        export_name(original_name, ExportSuffix::Watermarked, "png")
    }
}
