use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::io::export::{export_name, ExportSuffix};
use crate::layers::position::to_percent;
use crate::layers::text::{
    clamp_font_size, draw_text, parse_color, FontBook, TextMeasure, TextStyle,
};

/// A text overlay. The anchor (`x`, `y`, percent of the canvas) is the
/// centre of the text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayer {
    pub id: u32,
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Font family; `None` uses the fallback face.
    pub font: Option<String>,
    /// Clamped to 12-1000 when measured or drawn.
    pub font_size: f32,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    /// 0-100.
    pub opacity: f32,
    /// Degrees clockwise about the anchor.
    pub rotation: f32,
    pub shadow: bool,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            id: 0,
            text: "New Text".into(),
            x: 50.0,
            y: 50.0,
            font: None,
            font_size: 64.0,
            color: "#ffffff".into(),
            bold: true,
            italic: false,
            opacity: 100.0,
            rotation: 0.0,
            shadow: true,
        }
    }
}

impl TextLayer {
    /// Anchor in canvas pixels.
    pub fn anchor(&self, canvas_w: u32, canvas_h: u32) -> (f32, f32) {
        (
            self.x / 100.0 * canvas_w as f32,
            self.y / 100.0 * canvas_h as f32,
        )
    }

    pub fn effective_font_size(&self) -> f32 {
        clamp_font_size(self.font_size)
    }

    /// Unrotated hit box: measured width x font size, centred on the anchor.
    pub fn contains(
        &self,
        px: f32,
        py: f32,
        canvas_w: u32,
        canvas_h: u32,
        measure: &dyn TextMeasure,
    ) -> bool {
        let (ax, ay) = self.anchor(canvas_w, canvas_h);
        let size = self.effective_font_size();
        let half_w = measure.family_width(self.font.as_deref(), &self.text, size) / 2.0;
        let half_h = size / 2.0;
        px >= ax - half_w && px <= ax + half_w && py >= ay - half_h && py <= ay + half_h
    }

    fn style(&self) -> Result<TextStyle> {
        Ok(TextStyle {
            font_size: self.effective_font_size(),
            color: parse_color(&self.color)?,
            bold: self.bold,
            italic: self.italic,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Grab {
    dx: f32,
    dy: f32,
}

/// Ordered text layers; later layers draw on top.
#[derive(Clone, Debug)]
pub struct LayerStack {
    layers: Vec<TextLayer>,
    selected: Option<u32>,
    next_id: u32,
    grab: Option<Grab>,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStack {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            selected: None,
            next_id: 1,
            grab: None,
        }
    }

    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn selected_layer(&self) -> Option<&TextLayer> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: Option<u32>) {
        self.selected = id;
    }

    /// Add a default layer on top and select it.
    pub fn add(&mut self) -> u32 {
        self.add_layer(TextLayer::default())
    }

    /// Add `layer` on top with a fresh id and select it.
    pub fn add_layer(&mut self, mut layer: TextLayer) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        layer.id = id;
        debug!(id, text = %layer.text, "Text layer added");
        self.layers.push(layer);
        self.selected = Some(id);
        id
    }

    pub fn delete(&mut self, id: u32) {
        self.layers.retain(|l| l.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Apply `edit` to the layer with `id`. The id itself cannot change.
    pub fn update(&mut self, id: u32, edit: impl FnOnce(&mut TextLayer)) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        edit(layer);
        layer.id = id;
        true
    }

    /// Topmost layer whose box contains the point.
    pub fn hit_test(
        &self,
        x: f32,
        y: f32,
        canvas_w: u32,
        canvas_h: u32,
        measure: &dyn TextMeasure,
    ) -> Option<u32> {
        self.layers
            .iter()
            .rev()
            .find(|l| l.contains(x, y, canvas_w, canvas_h, measure))
            .map(|l| l.id)
    }

    /// Select the layer under the pointer and start dragging it, keeping
    /// the offset between pointer and anchor. A miss changes nothing.
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        canvas_w: u32,
        canvas_h: u32,
        measure: &dyn TextMeasure,
    ) -> Option<u32> {
        let id = self.hit_test(x, y, canvas_w, canvas_h, measure)?;
        let (ax, ay) = self.get(id)?.anchor(canvas_w, canvas_h);
        self.selected = Some(id);
        self.grab = Some(Grab {
            dx: x - ax,
            dy: y - ay,
        });
        Some(id)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, canvas_w: u32, canvas_h: u32) {
        let (Some(grab), Some(id)) = (self.grab, self.selected) else {
            return;
        };
        let nx = to_percent(x - grab.dx, canvas_w as f32);
        let ny = to_percent(y - grab.dy, canvas_h as f32);
        self.update(id, |l| {
            l.x = nx;
            l.y = ny;
        });
    }

    pub fn pointer_up(&mut self) {
        self.grab = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Draw every layer onto a copy of `base`, bottom to top, each in its
    /// own font family.
    pub fn render(&self, base: &Bitmap, fonts: &FontBook) -> Result<Bitmap> {
        let mut out = base.clone();
        let (w, h) = base.dimensions();
        for layer in &self.layers {
            let (ax, ay) = layer.anchor(w, h);
            draw_text(
                &mut out,
                fonts.get(layer.font.as_deref())?,
                &layer.text,
                &layer.style()?,
                ax,
                ay,
                layer.rotation,
                layer.opacity.clamp(0.0, 100.0) / 100.0,
                layer.shadow,
            )?;
        }
        info!(layers = self.layers.len(), "Text layers rendered");
        Ok(out)
    }

    pub fn export_name(original_name: &str) -> String {
        export_name(original_name, ExportSuffix::WithText, "png")
    }
}
