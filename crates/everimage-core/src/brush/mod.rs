pub mod canvas;
pub mod stack_blur;
pub mod stamp;
pub mod stroke;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{BRUSH_MAX_FEATHER, BRUSH_MAX_SIZE, BRUSH_MIN_SIZE, EFFECT_MAX, EFFECT_MIN};
use crate::io::export::ExportSuffix;

pub use canvas::BrushCanvas;
pub use stroke::{Stroke, StrokeState};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushMode {
    #[default]
    Blur,
    Mosaic,
}

impl BrushMode {
    pub fn suffix(&self) -> ExportSuffix {
        match self {
            BrushMode::Blur => ExportSuffix::Blur,
            BrushMode::Mosaic => ExportSuffix::Mosaic,
        }
    }
}

impl fmt::Display for BrushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrushMode::Blur => write!(f, "Blur"),
            BrushMode::Mosaic => write!(f, "Mosaic"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub mode: BrushMode,
    /// Brush radius in pixels.
    pub size: u32,
    /// Width of the soft edge in pixels; 0 for a hard edge.
    pub feather: u32,
    /// Blur radius, also used as the padding around the sampled patch.
    pub blur_strength: u32,
    /// Mosaic cell size in pixels.
    pub mosaic_size: u32,
    /// Maximum distance between stamps along a drag. `None` stamps only at
    /// the reported pointer positions.
    pub spacing: Option<f32>,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            mode: BrushMode::Blur,
            size: 30,
            feather: 10,
            blur_strength: 20,
            mosaic_size: 15,
            spacing: None,
        }
    }
}

impl BrushSettings {
    /// Clamp every value to its slider range.
    pub fn clamped(&self) -> Self {
        Self {
            mode: self.mode,
            size: self.size.clamp(BRUSH_MIN_SIZE, BRUSH_MAX_SIZE),
            feather: self.feather.min(BRUSH_MAX_FEATHER),
            blur_strength: self.blur_strength.clamp(EFFECT_MIN, EFFECT_MAX),
            mosaic_size: self.mosaic_size.clamp(EFFECT_MIN, EFFECT_MAX),
            spacing: self.spacing.filter(|s| *s > 0.0),
        }
    }
}
