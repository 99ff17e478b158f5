use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::brush::BrushSettings;
use crate::compress::{CompressionBudget, CompressionPreset};
use crate::consts::JPEG_QUALITY;
use crate::error::{EverimageError, Result};
use crate::layers::text::{load_font, FontBook};
use crate::removebg::RemoveBgConfig;

/// Tool defaults, read from a TOML file. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EverimageConfig {
    pub brush: BrushSettings,
    pub compression: CompressionConfig,
    pub convert: ConvertConfig,
    pub fonts: FontConfig,
    pub removebg: RemoveBgConfig,
}

impl EverimageConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| EverimageError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EverimageError::Config(e.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub preset: CompressionPreset,
    /// Overrides the preset's size limit.
    pub max_size_mb: Option<f64>,
    /// Overrides the preset's quality, in percent.
    pub quality: Option<u32>,
}

impl CompressionConfig {
    pub fn budget(&self) -> CompressionBudget {
        let base = self.preset.budget();
        match (self.max_size_mb, self.quality) {
            (None, None) => base,
            (mb, q) => CompressionBudget::custom(
                mb.unwrap_or(base.max_size_mb),
                q.unwrap_or((base.quality * 100.0).round() as u32),
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// 1-100.
    pub jpeg_quality: u8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType/OpenType file used when a layer names no family, or one
    /// that is not listed below.
    pub default: Option<PathBuf>,
    /// Font files by family name, e.g. `Roboto = "/fonts/Roboto.ttf"`.
    pub families: BTreeMap<String, PathBuf>,
}

impl FontConfig {
    /// Load the fallback face (`path` or the default) plus every wanted
    /// family that has a configured file. Families without one use the
    /// fallback when drawn.
    pub fn load_book<'a>(
        &self,
        path: Option<&Path>,
        wanted: impl IntoIterator<Item = &'a str>,
    ) -> Result<FontBook> {
        let mut book = FontBook::new();
        if let Some(path) = path.or(self.default.as_deref()) {
            book.set_fallback(load_font(path)?);
        }
        for family in wanted {
            if book.contains(family) {
                continue;
            }
            match self.families.get(family) {
                Some(path) => {
                    book.insert(family, load_font(path)?);
                    debug!(family, path = %path.display(), "Font family loaded");
                }
                None => warn!(family, "Font family not configured, using the default font"),
            }
        }
        if book.is_empty() {
            return Err(EverimageError::Font(
                "No font configured; set fonts.default or pass --font".into(),
            ));
        }
        Ok(book)
    }
}
