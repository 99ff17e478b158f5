use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use everimage_core::transform::{rotate, rotated_dimensions};

use super::{load, output_path, save, suffixed_name};

#[derive(Args)]
pub struct RotateArgs {
    /// Input image
    pub file: PathBuf,

    /// Clockwise angle in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub degrees: f64,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &RotateArgs) -> Result<()> {
    let bitmap = load(&args.file)?;
    let (w, h) = rotated_dimensions(bitmap.width(), bitmap.height(), args.degrees);
    println!("Rotating {}° onto a {}x{} canvas", args.degrees, w, h);

    let rotated = rotate(&bitmap, args.degrees)?;
    let name = suffixed_name(&args.file, "rotated", "png");
    save(&rotated, &output_path(&args.file, args.output.as_deref(), &name))
}
