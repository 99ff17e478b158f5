use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use everimage_core::transform::crop::{
    crop_display, percent_to_display, AspectPreset, DisplayMapping,
};
use everimage_core::transform::{crop, PixelRect};

use super::{load, output_path, save, suffixed_name};

#[derive(Clone, Copy, ValueEnum)]
pub enum AspectArg {
    #[value(name = "16:9")]
    Wide,
    #[value(name = "1:1")]
    Square,
    #[value(name = "4:5")]
    Portrait,
}

impl From<AspectArg> for AspectPreset {
    fn from(arg: AspectArg) -> Self {
        match arg {
            AspectArg::Wide => AspectPreset::Wide,
            AspectArg::Square => AspectPreset::Square,
            AspectArg::Portrait => AspectPreset::Portrait,
        }
    }
}

#[derive(Args)]
pub struct CropArgs {
    /// Input image
    pub file: PathBuf,

    /// Largest centred crop with this aspect ratio
    #[arg(long, value_enum, conflicts_with_all = ["x", "y", "width", "height"])]
    pub aspect: Option<AspectArg>,

    /// Left edge in pixels
    #[arg(long, default_value = "0")]
    pub x: u32,

    /// Top edge in pixels
    #[arg(long, default_value = "0")]
    pub y: u32,

    /// Crop width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Crop height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CropArgs) -> Result<()> {
    let bitmap = load(&args.file)?;
    let (w, h) = bitmap.dimensions();

    let cropped = if let Some(aspect) = args.aspect {
        let preset = AspectPreset::from(aspect);
        let percent = preset.initial_percent_crop(w as f64, h as f64);
        let rect = percent_to_display(&percent, w as f64, h as f64);
        println!("Aspect:      {}", preset.label());
        crop_display(&bitmap, &rect, &DisplayMapping::identity(w, h))?
    } else {
        let (Some(width), Some(height)) = (args.width, args.height) else {
            bail!("Either --aspect or both --width and --height are required");
        };
        let rect = PixelRect {
            x: args.x,
            y: args.y,
            width,
            height,
        };
        crop(&bitmap, &rect)?
    };

    let name = suffixed_name(&args.file, "cropped", "png");
    save(&cropped, &output_path(&args.file, args.output.as_deref(), &name))
}
