use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use everimage_core::compress::{
    compress, format_file_size, Compressed, CompressionBudget, CompressionPreset,
};
use everimage_core::io::export::find_duplicate;
use everimage_core::io::image_io::InputImage;
use everimage_core::pipeline::EverimageConfig;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Light,
    Medium,
    Heavy,
    Maximum,
}

impl From<PresetArg> for CompressionPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Light => CompressionPreset::Light,
            PresetArg::Medium => CompressionPreset::Medium,
            PresetArg::Heavy => CompressionPreset::Heavy,
            PresetArg::Maximum => CompressionPreset::Maximum,
        }
    }
}

#[derive(Args)]
pub struct CompressArgs {
    /// Input images
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Compression preset (overrides the configured one)
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Custom size limit in MB
    #[arg(long)]
    pub max_size_mb: Option<f64>,

    /// Custom starting quality in percent (1-100)
    #[arg(long)]
    pub quality: Option<u32>,

    /// Directory for the compressed files (defaults to each input's folder)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl CompressArgs {
    fn budget(&self, config: &EverimageConfig) -> CompressionBudget {
        let mut settings = config.compression.clone();
        if let Some(preset) = self.preset {
            settings.preset = preset.into();
        }
        if self.max_size_mb.is_some() {
            settings.max_size_mb = self.max_size_mb;
        }
        if self.quality.is_some() {
            settings.quality = self.quality;
        }
        settings.budget()
    }
}

pub fn run(args: &CompressArgs, config: &EverimageConfig) -> Result<()> {
    let budget = args.budget(config);
    if let Some(ref dir) = args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    println!(
        "Compressing {} file(s): max {} MB, quality {:.0}%",
        args.files.len(),
        budget.max_size_mb,
        budget.quality * 100.0
    );

    let pb = ProgressBar::new(args.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Compressing");

    let results: Vec<Result<(Compressed, PathBuf)>> = args
        .files
        .par_iter()
        .map(|file| {
            let compressed = compress_one(file, &budget, args.out_dir.as_deref());
            pb.inc(1);
            compressed
        })
        .collect();
    pb.finish_with_message("Done");

    let planned = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|(_, path)| path.as_path());
    if let Some(path) = find_duplicate(planned) {
        bail!(
            "Several inputs would be written to {}; rename them or compress them separately",
            path.display()
        );
    }

    let mut failed = 0;
    for (file, result) in args.files.iter().zip(results) {
        match result.and_then(write_compressed) {
            Ok((compressed, path)) => println!(
                "  {:<30} {:>10} -> {:>10}  saved {:>6}  {}",
                file.display(),
                format_file_size(compressed.original_size),
                format_file_size(compressed.compressed_size()),
                compressed.ratio(),
                path.display()
            ),
            Err(e) => {
                failed += 1;
                eprintln!("  {}: {e:#}", file.display());
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} compression(s) failed", args.files.len());
    }
    Ok(())
}

fn compress_one(
    file: &Path,
    budget: &CompressionBudget,
    out_dir: Option<&Path>,
) -> Result<(Compressed, PathBuf)> {
    let input =
        InputImage::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let compressed = compress(&input, budget)?;
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => file.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let path = dir.join(&compressed.file_name);
    Ok((compressed, path))
}

fn write_compressed((compressed, path): (Compressed, PathBuf)) -> Result<(Compressed, PathBuf)> {
    std::fs::write(&path, &compressed.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok((compressed, path))
}
