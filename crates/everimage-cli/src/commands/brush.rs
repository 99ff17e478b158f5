use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use everimage_core::brush::{BrushCanvas, BrushMode};
use everimage_core::pipeline::EverimageConfig;

use super::{load, output_path, parse_points, save};

#[derive(Clone, Copy, ValueEnum)]
pub enum BrushModeArg {
    Blur,
    Mosaic,
}

impl From<BrushModeArg> for BrushMode {
    fn from(arg: BrushModeArg) -> Self {
        match arg {
            BrushModeArg::Blur => BrushMode::Blur,
            BrushModeArg::Mosaic => BrushMode::Mosaic,
        }
    }
}

#[derive(Args)]
pub struct BrushArgs {
    /// Input image
    pub file: PathBuf,

    /// Stroke points in image pixels: "x,y;x,y;..."
    #[arg(long)]
    pub points: String,

    /// Brush effect (defaults to the configured mode)
    #[arg(long, value_enum)]
    pub mode: Option<BrushModeArg>,

    /// Brush radius in pixels (5-100)
    #[arg(long)]
    pub size: Option<u32>,

    /// Soft edge width in pixels (0-50)
    #[arg(long)]
    pub feather: Option<u32>,

    /// Blur radius or mosaic cell size (5-50)
    #[arg(long)]
    pub strength: Option<u32>,

    /// Maximum distance between stamps along the stroke
    #[arg(long)]
    pub spacing: Option<f32>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &BrushArgs, config: &EverimageConfig) -> Result<()> {
    let points = parse_points(&args.points)?;
    let bitmap = load(&args.file)?;

    let mut settings = config.brush;
    if let Some(mode) = args.mode {
        settings.mode = mode.into();
    }
    if let Some(size) = args.size {
        settings.size = size;
    }
    if let Some(feather) = args.feather {
        settings.feather = feather;
    }
    if let Some(strength) = args.strength {
        settings.blur_strength = strength;
        settings.mosaic_size = strength;
    }
    if args.spacing.is_some() {
        settings.spacing = args.spacing;
    }

    let mut canvas = BrushCanvas::new(bitmap, settings);
    let path: Vec<(f32, f32)> = points.iter().map(|p| (p[0], p[1])).collect();
    canvas.stroke_path(&path);
    println!(
        "{} stroke: {} point(s), {} stamp(s)",
        canvas.settings().mode,
        points.len(),
        canvas.stamp_count()
    );

    let name = canvas.export_name(&args.file.to_string_lossy());
    let out = output_path(&args.file, args.output.as_deref(), &name);
    save(canvas.live(), &out)
}
