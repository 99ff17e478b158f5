mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use everimage_core::pipeline::EverimageConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "everimage", about = "Everyday image editing tools")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Tool defaults (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image file metadata
    Info(commands::info::InfoArgs),
    /// Crop to a pixel rectangle or an aspect preset
    Crop(commands::crop::CropArgs),
    /// Rotate clockwise by any angle
    Rotate(commands::rotate::RotateArgs),
    /// Scale to new dimensions
    Resize(commands::resize::ResizeArgs),
    /// Convert images to another format
    Convert(commands::convert::ConvertArgs),
    /// Compress images to a size budget
    Compress(commands::compress::CompressArgs),
    /// Blur or pixelate along a brush stroke
    Brush(commands::brush::BrushArgs),
    /// Add an image or text watermark
    Watermark(commands::watermark::WatermarkArgs),
    /// Add text layers
    Text(commands::text::TextArgs),
    /// Erase to transparency along a stroke
    Erase(commands::erase::EraseArgs),
    /// Cut out the subject with the background removal service
    RemoveBg(commands::remove_bg::RemoveBgArgs),
    /// Run an edit recipe
    Run(commands::run::RunArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => {
            let config = EverimageConfig::load(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            debug!(path = %path.display(), "Config loaded");
            config
        }
        None => EverimageConfig::default(),
    };

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Crop(args) => commands::crop::run(args),
        Commands::Rotate(args) => commands::rotate::run(args),
        Commands::Resize(args) => commands::resize::run(args),
        Commands::Convert(args) => commands::convert::run(args, &config),
        Commands::Compress(args) => commands::compress::run(args, &config),
        Commands::Brush(args) => commands::brush::run(args, &config),
        Commands::Watermark(args) => commands::watermark::run(args, &config),
        Commands::Text(args) => commands::text::run(args, &config),
        Commands::Erase(args) => commands::erase::run(args),
        Commands::RemoveBg(args) => commands::remove_bg::run(args, &config),
        Commands::Run(args) => commands::run::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
