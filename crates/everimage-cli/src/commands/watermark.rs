use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use everimage_core::io::image_io::load_bitmap;
use everimage_core::layers::{
    FontBook, Position, TextMark, Watermark, WatermarkKind, WatermarkSettings,
};
use everimage_core::pipeline::EverimageConfig;

use super::{load, output_path, save};

#[derive(Clone, Copy, ValueEnum)]
pub enum PositionArg {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl From<PositionArg> for Position {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::TopLeft => Position::TopLeft,
            PositionArg::TopRight => Position::TopRight,
            PositionArg::BottomLeft => Position::BottomLeft,
            PositionArg::BottomRight => Position::BottomRight,
            PositionArg::Center => Position::Center,
        }
    }
}

#[derive(Args)]
pub struct WatermarkArgs {
    /// Input image
    pub file: PathBuf,

    /// Watermark image
    #[arg(long, conflicts_with = "text")]
    pub image: Option<PathBuf>,

    /// Watermark text
    #[arg(long)]
    pub text: Option<String>,

    /// Preset position
    #[arg(long, value_enum, default_value = "bottom-right")]
    pub position: PositionArg,

    /// Custom horizontal position, percent of the free space (0-100)
    #[arg(long, requires = "y_pct")]
    pub x_pct: Option<f32>,

    /// Custom vertical position, percent of the free space (0-100)
    #[arg(long, requires = "x_pct")]
    pub y_pct: Option<f32>,

    /// Opacity in percent (0-100)
    #[arg(long, default_value = "50")]
    pub opacity: f32,

    /// Scale in percent of the mark's natural size (10-1000)
    #[arg(long, default_value = "100")]
    pub scale: f32,

    /// Clockwise rotation in degrees (-180 to 180)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub rotation: f32,

    /// Font for text marks (defaults to the configured font)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Font family for text marks, from [fonts.families] in the config
    #[arg(long)]
    pub family: Option<String>,

    /// Text colour (#rgb, #rrggbb or #rrggbbaa)
    #[arg(long, default_value = "#ffffff")]
    pub color: String,

    /// Text size in pixels before scaling
    #[arg(long, default_value = "64")]
    pub font_size: f32,

    /// Disable the text shadow
    #[arg(long)]
    pub no_shadow: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &WatermarkArgs, config: &EverimageConfig) -> Result<()> {
    let position = match (args.x_pct, args.y_pct) {
        (Some(x_pct), Some(y_pct)) => Position::Custom { x_pct, y_pct },
        _ => args.position.into(),
    };
    let settings = WatermarkSettings {
        opacity: args.opacity,
        scale: args.scale,
        rotation: args.rotation,
        position,
    };

    let (kind, fonts) = match (&args.image, &args.text) {
        (Some(path), _) => (WatermarkKind::Image(load_bitmap(path)?), FontBook::new()),
        (None, Some(text)) => {
            let mark = TextMark {
                text: text.clone(),
                font: args.family.clone(),
                font_size: args.font_size,
                color: args.color.clone(),
                shadow: !args.no_shadow,
                ..TextMark::default()
            };
            let fonts = config
                .fonts
                .load_book(args.font.as_deref(), args.family.as_deref())?;
            (WatermarkKind::Text(mark), fonts)
        }
        (None, None) => bail!("Either --image or --text is required"),
    };

    let bitmap = load(&args.file)?;
    let watermark = Watermark::new(kind, settings);
    let marked = watermark.apply(&bitmap, &fonts)?;

    let name = Watermark::export_name(&args.file.to_string_lossy());
    save(&marked, &output_path(&args.file, args.output.as_deref(), &name))
}
