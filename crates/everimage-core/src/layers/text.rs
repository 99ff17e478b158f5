use std::collections::BTreeMap;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::brush::stack_blur::stack_blur;
use crate::consts::{
    MAX_FONT_SIZE, MIN_FONT_SIZE, TEXT_SHADOW_ALPHA, TEXT_SHADOW_BLUR, TEXT_SHADOW_OFFSET,
};
use crate::error::{EverimageError, Result};
use crate::layers::draw_centered;
use crate::transform::rotate::rotate;

/// Horizontal shear applied to glyph pixels for synthetic italics.
const ITALIC_SHEAR: f32 = 0.2;

/// Measures the advance width of a single line of text.
///
/// Hit testing and overlay placement only need widths, so they take this
/// rather than a concrete font.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Width in the named font family. Measures that only know one face
    /// ignore the family.
    fn family_width(&self, _family: Option<&str>, text: &str, font_size: f32) -> f32 {
        self.text_width(text, font_size)
    }
}

impl TextMeasure for FontArc {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let scaled = self.as_scaled(PxScale::from(font_size));
        let mut width = 0.0f32;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.glyph_id(ch);
            if let Some(prev) = last {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            last = Some(id);
        }
        width
    }
}

/// Fonts by family name, with a fallback for unnamed or unknown families.
#[derive(Clone, Default)]
pub struct FontBook {
    fallback: Option<FontArc>,
    families: BTreeMap<String, FontArc>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(font: FontArc) -> Self {
        Self {
            fallback: Some(font),
            families: BTreeMap::new(),
        }
    }

    pub fn set_fallback(&mut self, font: FontArc) {
        self.fallback = Some(font);
    }

    pub fn insert(&mut self, family: impl Into<String>, font: FontArc) {
        self.families.insert(family.into(), font);
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    pub fn is_empty(&self) -> bool {
        self.fallback.is_none() && self.families.is_empty()
    }

    /// The face for `family`, or the fallback when the family is unnamed
    /// or not in the book.
    pub fn get(&self, family: Option<&str>) -> Result<&FontArc> {
        family
            .and_then(|name| self.families.get(name))
            .or(self.fallback.as_ref())
            .ok_or_else(|| match family {
                Some(name) => EverimageError::Font(format!("No font for family '{name}'")),
                None => EverimageError::Font("No fallback font configured".into()),
            })
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("fallback", &self.fallback.is_some())
            .field("families", &self.families.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TextMeasure for FontBook {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.family_width(None, text, font_size)
    }

    fn family_width(&self, family: Option<&str>, text: &str, font_size: f32) -> f32 {
        self.get(family)
            .map(|font| font.text_width(text, font_size))
            .unwrap_or(0.0)
    }
}

/// Clamp a requested font size to the supported range.
pub fn clamp_font_size(size: f32) -> f32 {
    if size.is_nan() {
        return MIN_FONT_SIZE;
    }
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

pub fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = std::fs::read(path)?;
    let font = FontArc::try_from_vec(bytes)
        .map_err(|e| EverimageError::Font(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "Font loaded");
    Ok(font)
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(value: &str) -> Result<[u8; 4]> {
    let hex = value.trim().trim_start_matches('#');
    let bad = || EverimageError::InvalidColor(value.to_string());
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| bad());
    match hex.len() {
        3 => {
            let mut out = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16).ok_or_else(bad)? as u8;
                out[i] = v * 17;
            }
            Ok(out)
        }
        6 | 8 => {
            let mut out = [255u8; 4];
            for i in 0..hex.len() / 2 {
                out[i] = channel(hex.get(i * 2..i * 2 + 2).ok_or_else(bad)?)?;
            }
            Ok(out)
        }
        _ => Err(bad()),
    }
}

/// How a line of text is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: [u8; 4],
    pub bold: bool,
    pub italic: bool,
}

/// Rasterise one line into a sprite whose centre is the text's centre
/// (centre alignment, middle baseline). `None` for empty text.
pub fn render_text(font: &FontArc, text: &str, style: &TextStyle) -> Option<Bitmap> {
    let size = style.font_size;
    if text.is_empty() || size <= 0.0 {
        return None;
    }
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let (ascent, descent) = (scaled.ascent(), scaled.descent());
    let text_width = font.text_width(text, size);
    if text_width <= 0.0 {
        return None;
    }

    let pad = (size * 0.25).ceil() + 2.0;
    let w = (text_width + pad * 2.0).ceil() as u32;
    let h = ((ascent - descent) + pad * 2.0).ceil() as u32;
    let baseline = h as f32 / 2.0 + (ascent + descent) / 2.0;
    let start_x = w as f32 / 2.0 - text_width / 2.0;

    let mut coverage = vec![0.0f32; w as usize * h as usize];
    let mut cursor = start_x;
    let mut last: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(cursor, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, cov| {
                let y = bounds.min.y + gy as f32;
                let mut x = bounds.min.x + gx as f32;
                if style.italic {
                    x += (baseline - y) * ITALIC_SHEAR;
                }
                let (ix, iy) = (x.round() as i64, y.round() as i64);
                if ix < 0 || iy < 0 || ix >= w as i64 || iy >= h as i64 {
                    return;
                }
                let idx = iy as usize * w as usize + ix as usize;
                coverage[idx] = (coverage[idx] + cov).min(1.0);
            });
        }
        cursor += scaled.h_advance(id);
        last = Some(id);
    }

    if style.bold {
        embolden(&mut coverage, w as usize, (size / 24.0).round().max(1.0) as usize);
    }

    let mut sprite = Bitmap::new(w, h).ok()?;
    let [r, g, b, a] = style.color;
    for (pixel, &cov) in sprite.pixels.pixels_mut().zip(&coverage) {
        if cov > 0.0 {
            pixel.0 = [r, g, b, (a as f32 * cov).round() as u8];
        }
    }
    Some(sprite)
}

/// Smear coverage to the right by `amount` pixels.
fn embolden(coverage: &mut [f32], width: usize, amount: usize) {
    for row in coverage.chunks_mut(width) {
        let source = row.to_vec();
        for x in 0..width {
            for o in 1..=amount.min(x) {
                row[x] = row[x].max(source[x - o]);
            }
        }
    }
}

/// Blurred translucent black copy of a sprite, padded so the blur is not
/// clipped. The padding is symmetric so the centre is unchanged.
pub fn shadow_sprite(sprite: &Bitmap) -> Bitmap {
    let pad = TEXT_SHADOW_BLUR * 2;
    let (w, h) = (sprite.width() + pad * 2, sprite.height() + pad * 2);
    let Ok(mut shadow) = Bitmap::new(w, h) else {
        return sprite.clone();
    };
    for (x, y, px) in sprite.pixels.enumerate_pixels() {
        let a = (px.0[3] as f32 * TEXT_SHADOW_ALPHA).round() as u8;
        if a > 0 {
            shadow.put(x + pad, y + pad, [0, 0, 0, a]);
        }
    }
    stack_blur(&shadow, TEXT_SHADOW_BLUR)
}

/// Draw a line of text centred at (`cx`, `cy`), rotated clockwise by
/// `rotation` degrees about that point.
///
/// The drop shadow offset is applied after rotation, in canvas space.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    canvas: &mut Bitmap,
    font: &FontArc,
    text: &str,
    style: &TextStyle,
    cx: f32,
    cy: f32,
    rotation: f32,
    opacity: f32,
    shadow: bool,
) -> Result<()> {
    let Some(sprite) = render_text(font, text, style) else {
        return Ok(());
    };
    let sprite = if rotation != 0.0 {
        rotate(&sprite, rotation as f64)?
    } else {
        sprite
    };
    if shadow {
        let s = shadow_sprite(&sprite);
        draw_centered(
            canvas,
            &s,
            cx + TEXT_SHADOW_OFFSET,
            cy + TEXT_SHADOW_OFFSET,
            opacity,
        );
    }
    draw_centered(canvas, &sprite, cx, cy, opacity);
    Ok(())
}
