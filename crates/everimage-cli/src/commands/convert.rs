use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use everimage_core::convert::{convert_with_quality, Converted, OutputFormat};
use everimage_core::io::export::find_duplicate;
use everimage_core::io::image_io::InputImage;
use everimage_core::pipeline::EverimageConfig;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

#[derive(Args)]
pub struct ConvertArgs {
    /// Input images (raster or SVG)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Target format: png, jpeg, webp, gif, bmp, tiff, ico, tga, pnm, qoi, avif, svg
    #[arg(long)]
    pub to: OutputFormat,

    /// Directory for the converted files (defaults to each input's folder)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn run(args: &ConvertArgs, config: &EverimageConfig) -> Result<()> {
    if let Some(ref dir) = args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    println!("Converting {} file(s) to {}", args.files.len(), args.to);

    let pb = ProgressBar::new(args.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Converting");

    let results: Vec<Result<(Converted, PathBuf)>> = args
        .files
        .par_iter()
        .map(|file| {
            let converted = convert_one(file, args, config.convert.jpeg_quality);
            pb.inc(1);
            converted
        })
        .collect();
    pb.finish_with_message("Done");

    let planned = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|(_, path)| path.as_path());
    if let Some(path) = find_duplicate(planned) {
        bail!(
            "Several inputs would be written to {}; rename them or convert them separately",
            path.display()
        );
    }

    let mut failed = 0;
    for (file, result) in args.files.iter().zip(results) {
        match result.and_then(write_converted) {
            Ok(path) => println!("  {} -> {}", file.display(), path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("  {}: {e:#}", file.display());
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} conversion(s) failed", args.files.len());
    }
    Ok(())
}

fn convert_one(
    file: &Path,
    args: &ConvertArgs,
    jpeg_quality: u8,
) -> Result<(Converted, PathBuf)> {
    let input =
        InputImage::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let converted = convert_with_quality(&input, args.to, jpeg_quality)?;
    let dir = match args.out_dir {
        Some(ref dir) => dir.clone(),
        None => file.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let path = dir.join(&converted.file_name);
    Ok((converted, path))
}

fn write_converted((converted, path): (Converted, PathBuf)) -> Result<PathBuf> {
    std::fs::write(&path, &converted.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
