use tracing::debug;

use crate::bitmap::Bitmap;
use crate::brush::stamp::{blur_stamp, mosaic_stamp};
use crate::brush::stroke::Stroke;
use crate::brush::{BrushMode, BrushSettings};
use crate::io::export::export_name;

/// The blur/mosaic editing surface: an untouched original and the live
/// bitmap strokes are painted on.
#[derive(Clone, Debug)]
pub struct BrushCanvas {
    original: Bitmap,
    live: Bitmap,
    settings: BrushSettings,
    stroke: Stroke,
    stamps: usize,
}

impl BrushCanvas {
    pub fn new(image: Bitmap, settings: BrushSettings) -> Self {
        let settings = settings.clamped();
        Self {
            live: image.clone(),
            original: image,
            stroke: Stroke::new(settings.spacing),
            settings,
            stamps: 0,
        }
    }

    pub fn original(&self) -> &Bitmap {
        &self.original
    }

    pub fn live(&self) -> &Bitmap {
        &self.live
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    /// Number of stamps applied since load or the last reset.
    pub fn stamp_count(&self) -> usize {
        self.stamps
    }

    /// Replace the settings; values are clamped to their slider ranges.
    /// Takes effect from the next stroke.
    pub fn set_settings(&mut self, settings: BrushSettings) {
        self.settings = settings.clamped();
        if !self.stroke.is_drawing() {
            self.stroke = Stroke::new(self.settings.spacing);
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_drawing()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        for (px, py) in self.stroke.pointer_down(x, y) {
            self.stamp(px, py);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        for (px, py) in self.stroke.pointer_move(x, y) {
            self.stamp(px, py);
        }
    }

    pub fn pointer_up(&mut self) {
        self.stroke.pointer_up();
        self.stroke = Stroke::new(self.settings.spacing);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Apply one stamp of the current effect.
    pub fn stamp(&mut self, x: f32, y: f32) {
        let s = &self.settings;
        match s.mode {
            BrushMode::Blur => blur_stamp(
                &self.original,
                &mut self.live,
                x,
                y,
                s.size,
                s.feather,
                s.blur_strength,
            ),
            BrushMode::Mosaic => mosaic_stamp(
                &self.original,
                &mut self.live,
                x,
                y,
                s.size,
                s.feather,
                s.mosaic_size,
            ),
        }
        self.stamps += 1;
    }

    /// Paint a whole stroke: down at the first point, moves, up.
    pub fn stroke_path(&mut self, points: &[(f32, f32)]) {
        let Some((&(x, y), rest)) = points.split_first() else {
            return;
        };
        self.pointer_down(x, y);
        for &(px, py) in rest {
            self.pointer_move(px, py);
        }
        self.pointer_up();
        debug!(
            mode = ?self.settings.mode,
            points = points.len(),
            stamps = self.stamps,
            "Stroke applied"
        );
    }

    /// Discard all edits.
    pub fn reset(&mut self) {
        self.live = self.original.clone();
        self.stroke = Stroke::new(self.settings.spacing);
        self.stamps = 0;
    }

    /// `<basename>-blur.png` or `<basename>-mosaic.png`.
    pub fn export_name(&self, original_name: &str) -> String {
        export_name(original_name, self.settings.mode.suffix(), "png")
    }

    pub fn into_live(self) -> Bitmap {
        self.live
    }
}
