use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use everimage_core::transform::resize::fit_dimensions;
use everimage_core::transform::{resize, ResizeFilter};

use super::{load, output_path, save, suffixed_name};

#[derive(Clone, Copy, ValueEnum)]
pub enum FilterArg {
    Nearest,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl From<FilterArg> for ResizeFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => ResizeFilter::Nearest,
            FilterArg::Bilinear => ResizeFilter::Bilinear,
            FilterArg::CatmullRom => ResizeFilter::CatmullRom,
            FilterArg::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}

#[derive(Args)]
pub struct ResizeArgs {
    /// Input image
    pub file: PathBuf,

    /// Target width; derived from the aspect ratio when omitted
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height; derived from the aspect ratio when omitted
    #[arg(long)]
    pub height: Option<u32>,

    /// Resampling filter
    #[arg(long, value_enum, default_value = "bilinear")]
    pub filter: FilterArg,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ResizeArgs) -> Result<()> {
    let bitmap = load(&args.file)?;
    let (w, h) = fit_dimensions(bitmap.width(), bitmap.height(), args.width, args.height)?;
    let resized = resize(&bitmap, w, h, args.filter.into())?;

    let name = suffixed_name(&args.file, "resized", "png");
    save(&resized, &output_path(&args.file, args.output.as_deref(), &name))
}
