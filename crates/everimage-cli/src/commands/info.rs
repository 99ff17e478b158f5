use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use everimage_core::compress::format_file_size;
use everimage_core::io::image_io::InputImage;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image (raster or SVG)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let input = InputImage::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let bitmap = input
        .decode()
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;

    println!("File:        {}", input.name);
    println!("Type:        {}", input.format.mime());
    println!("Dimensions:  {}x{}", bitmap.width(), bitmap.height());
    println!("Size:        {}", format_file_size(input.bytes.len()));
    println!(
        "Alpha:       {}",
        if bitmap.has_transparency() {
            "yes"
        } else {
            "no"
        }
    );

    Ok(())
}
