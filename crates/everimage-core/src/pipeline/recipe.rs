use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::brush::BrushMode;
use crate::error::{EverimageError, Result};
use crate::layers::stack::TextLayer;
use crate::layers::watermark::{TextMark, WatermarkSettings};
use crate::transform::resize::ResizeFilter;

/// An ordered list of edits applied to one input file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Font for text steps; falls back to the configured default.
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub steps: Vec<EditStep>,
}

impl Recipe {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut recipe: Recipe =
            toml::from_str(&contents).map_err(|e| EverimageError::Recipe(e.to_string()))?;
        if let Some(dir) = path.parent() {
            recipe.resolve_relative_to(dir);
        }
        Ok(recipe)
    }

    /// Make relative paths relative to `dir` (the recipe's folder).
    pub fn resolve_relative_to(&mut self, dir: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        fix(&mut self.input);
        fix(&mut self.output);
        if let Some(font) = self.font.as_mut() {
            fix(font);
        }
        for step in &mut self.steps {
            if let EditStep::Watermark {
                image: Some(image), ..
            } = step
            {
                fix(image);
            }
        }
    }

    pub fn needs_font(&self) -> bool {
        self.steps.iter().any(|s| match s {
            EditStep::Text { .. } => true,
            EditStep::Watermark { image, text, .. } => image.is_none() && text.is_some(),
            _ => false,
        })
    }

    /// Font families named by text layers and text watermarks.
    pub fn font_families(&self) -> Vec<&str> {
        let mut families = Vec::new();
        for step in &self.steps {
            match step {
                EditStep::Text { layers } => {
                    families.extend(layers.iter().filter_map(|l| l.font.as_deref()));
                }
                EditStep::Watermark {
                    image: None,
                    text: Some(mark),
                    ..
                } => families.extend(mark.font.as_deref()),
                _ => {}
            }
        }
        families.sort_unstable();
        families.dedup();
        families
    }
}

/// One edit. Coordinates are natural image pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum EditStep {
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    Rotate {
        degrees: f64,
    },
    Resize {
        width: Option<u32>,
        height: Option<u32>,
        #[serde(default)]
        filter: ResizeFilter,
    },
    /// A blur or mosaic stroke through `points`. Unset values come from
    /// the configured brush.
    Brush {
        #[serde(default)]
        mode: BrushMode,
        points: Vec<[f32; 2]>,
        size: Option<u32>,
        feather: Option<u32>,
        /// Blur radius or mosaic cell size, depending on `mode`.
        strength: Option<u32>,
        spacing: Option<f32>,
    },
    Erase {
        points: Vec<[f32; 2]>,
        radius: Option<u32>,
    },
    /// Image watermark when `image` is set, text watermark otherwise.
    Watermark {
        image: Option<PathBuf>,
        text: Option<TextMark>,
        #[serde(default)]
        settings: WatermarkSettings,
    },
    Text {
        layers: Vec<TextLayer>,
    },
}

impl fmt::Display for EditStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditStep::Crop {
                x,
                y,
                width,
                height,
            } => write!(f, "Crop {width}x{height} at ({x}, {y})"),
            EditStep::Rotate { degrees } => write!(f, "Rotate {degrees}°"),
            EditStep::Resize { width, height, .. } => {
                let side = |v: &Option<u32>| v.map_or("auto".to_string(), |v| v.to_string());
                write!(f, "Resize {}x{}", side(width), side(height))
            }
            EditStep::Brush { mode, points, .. } => {
                write!(f, "{mode} stroke ({} points)", points.len())
            }
            EditStep::Erase { points, .. } => write!(f, "Erase ({} points)", points.len()),
            EditStep::Watermark { image, text, .. } => match (image, text) {
                (Some(path), _) => write!(f, "Watermark image {}", path.display()),
                (None, Some(mark)) => write!(f, "Watermark text \"{}\"", mark.text),
                (None, None) => write!(f, "Watermark (none)"),
            },
            EditStep::Text { layers } => write!(f, "Text ({} layers)", layers.len()),
        }
    }
}
