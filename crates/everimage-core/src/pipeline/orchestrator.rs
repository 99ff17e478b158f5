use tracing::{debug, info};

use crate::bitmap::Bitmap;
use crate::brush::stamp::erase_stamp;
use crate::brush::{BrushCanvas, BrushSettings};
use crate::consts::DEFAULT_ERASER_SIZE;
use crate::convert::{encode, OutputFormat};
use crate::error::{EverimageError, Result};
use crate::history::History;
use crate::io::image_io::{load_bitmap, InputImage};
use crate::layers::stack::LayerStack;
use crate::layers::text::FontBook;
use crate::layers::watermark::{Watermark, WatermarkKind};
use crate::transform::crop::{crop, PixelRect};
use crate::transform::resize::{fit_dimensions, resize};
use crate::transform::rotate::rotate;

use super::config::EverimageConfig;
use super::recipe::{EditStep, Recipe};
use super::types::{NoOpReporter, ProgressReporter, RecipeOutput};

/// Apply one edit to `bitmap`, returning the new bitmap. Text steps draw
/// with faces from `fonts`.
pub fn apply_step(
    bitmap: &Bitmap,
    step: &EditStep,
    config: &EverimageConfig,
    fonts: &FontBook,
) -> Result<Bitmap> {
    match step {
        EditStep::Crop {
            x,
            y,
            width,
            height,
        } => crop(
            bitmap,
            &PixelRect {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            },
        ),
        EditStep::Rotate { degrees } => rotate(bitmap, *degrees),
        EditStep::Resize {
            width,
            height,
            filter,
        } => {
            let (w, h) = fit_dimensions(bitmap.width(), bitmap.height(), *width, *height)?;
            resize(bitmap, w, h, *filter)
        }
        EditStep::Brush {
            mode,
            points,
            size,
            feather,
            strength,
            spacing,
        } => {
            let base = config.brush;
            let mut settings = BrushSettings {
                mode: *mode,
                size: size.unwrap_or(base.size),
                feather: feather.unwrap_or(base.feather),
                spacing: spacing.or(base.spacing),
                ..base
            };
            if let Some(strength) = strength {
                settings.blur_strength = *strength;
                settings.mosaic_size = *strength;
            }
            let mut canvas = BrushCanvas::new(bitmap.clone(), settings);
            let path: Vec<(f32, f32)> = points.iter().map(|p| (p[0], p[1])).collect();
            canvas.stroke_path(&path);
            Ok(canvas.into_live())
        }
        EditStep::Erase { points, radius } => {
            let mut out = bitmap.clone();
            let radius = radius.unwrap_or(DEFAULT_ERASER_SIZE);
            for p in points {
                erase_stamp(&mut out, p[0], p[1], radius);
            }
            Ok(out)
        }
        EditStep::Watermark {
            image,
            text,
            settings,
        } => {
            let kind = match (image, text) {
                (Some(path), _) => WatermarkKind::Image(load_bitmap(path)?),
                (None, Some(mark)) => WatermarkKind::Text(mark.clone()),
                (None, None) => WatermarkKind::None,
            };
            Watermark::new(kind, *settings).apply(bitmap, fonts)
        }
        EditStep::Text { layers } => {
            if fonts.is_empty() {
                return Err(EverimageError::Font(
                    "A font is required for text layers".into(),
                ));
            }
            let mut stack = LayerStack::new();
            for layer in layers {
                stack.add_layer(layer.clone());
            }
            stack.render(bitmap, fonts)
        }
    }
}

/// Run a recipe: decode the input, apply each step, encode the output in
/// the format named by its extension. Each intermediate bitmap is kept in
/// the returned history.
pub fn run_recipe_reported(
    recipe: &Recipe,
    config: &EverimageConfig,
    reporter: &dyn ProgressReporter,
) -> Result<RecipeOutput> {
    let input = InputImage::open(&recipe.input)?;
    let mut history = History::new();
    history.push(input.decode()?);
    info!(
        input = %recipe.input.display(),
        steps = recipe.steps.len(),
        "Running recipe"
    );

    let fonts = if recipe.needs_font() {
        config
            .fonts
            .load_book(recipe.font.as_deref(), recipe.font_families())?
    } else {
        FontBook::new()
    };

    let total = recipe.steps.len();
    for (i, step) in recipe.steps.iter().enumerate() {
        reporter.begin_step(i, total, step);
        let current = history.current().ok_or(EverimageError::EmptyHistory)?;
        let next = apply_step(current, step, config, &fonts)
            .map_err(|e| EverimageError::Recipe(format!("step {} ({step}): {e}", i + 1)))?;
        debug!(
            step = i + 1,
            width = next.width(),
            height = next.height(),
            "Step applied"
        );
        history.push(next);
        reporter.finish_step();
    }

    let bitmap = history
        .current()
        .cloned()
        .ok_or(EverimageError::EmptyHistory)?;

    reporter.writing();
    let format = output_format(recipe)?;
    let bytes = encode(&bitmap, format, config.convert.jpeg_quality)?;
    if let Some(dir) = recipe.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&recipe.output, &bytes)?;
    info!(
        output = %recipe.output.display(),
        format = %format,
        size = bytes.len(),
        "Recipe complete"
    );

    Ok(RecipeOutput {
        bitmap,
        history,
        encoded_size: bytes.len(),
    })
}

/// Run a recipe without progress reporting.
pub fn run_recipe(recipe: &Recipe, config: &EverimageConfig) -> Result<RecipeOutput> {
    run_recipe_reported(recipe, config, &NoOpReporter)
}

fn output_format(recipe: &Recipe) -> Result<OutputFormat> {
    let ext = recipe
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    let format: OutputFormat = ext.parse().map_err(EverimageError::Recipe)?;
    if format.is_vector() {
        return Err(EverimageError::UnsupportedConversion {
            from: "raster".into(),
            to: format.label().into(),
        });
    }
    Ok(format)
}
