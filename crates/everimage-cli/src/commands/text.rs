use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use everimage_core::layers::{parse_color, LayerStack, TextLayer};
use everimage_core::pipeline::EverimageConfig;

use super::{load, output_path, save};

#[derive(Args)]
pub struct TextArgs {
    /// Input image
    pub file: PathBuf,

    /// Text to add; repeat for several layers
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,

    /// Anchor of each layer as "x,y" percent of the canvas (default centre)
    #[arg(long = "at")]
    pub anchors: Vec<String>,

    /// Text size in pixels
    #[arg(long, default_value = "64")]
    pub font_size: f32,

    /// Text colour (#rgb, #rrggbb or #rrggbbaa)
    #[arg(long, default_value = "#ffffff")]
    pub color: String,

    /// Clockwise rotation in degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub rotation: f32,

    /// Opacity in percent (0-100)
    #[arg(long, default_value = "100")]
    pub opacity: f32,

    /// Regular weight instead of bold
    #[arg(long)]
    pub regular: bool,

    #[arg(long)]
    pub italic: bool,

    /// Disable the drop shadow
    #[arg(long)]
    pub no_shadow: bool,

    /// Font file (defaults to the configured font)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Font family of each layer, from [fonts.families] in the config
    #[arg(long = "family")]
    pub families: Vec<String>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &TextArgs, config: &EverimageConfig) -> Result<()> {
    if args.anchors.len() > args.texts.len() {
        bail!("More --at positions than --text layers");
    }
    if args.families.len() > args.texts.len() {
        bail!("More --family names than --text layers");
    }
    parse_color(&args.color)?;

    let mut stack = LayerStack::new();
    for (i, text) in args.texts.iter().enumerate() {
        let (x, y) = match args.anchors.get(i) {
            Some(at) => parse_anchor(at)?,
            None => (50.0, 50.0),
        };
        stack.add_layer(TextLayer {
            text: text.clone(),
            x,
            y,
            font: args.families.get(i).cloned(),
            font_size: args.font_size,
            color: args.color.clone(),
            bold: !args.regular,
            italic: args.italic,
            opacity: args.opacity,
            rotation: args.rotation,
            shadow: !args.no_shadow,
            ..TextLayer::default()
        });
    }

    let fonts = config
        .fonts
        .load_book(args.font.as_deref(), args.families.iter().map(String::as_str))?;
    let bitmap = load(&args.file)?;
    let rendered = stack.render(&bitmap, &fonts)?;
    println!("Rendered {} text layer(s)", stack.len());

    let name = LayerStack::export_name(&args.file.to_string_lossy());
    save(&rendered, &output_path(&args.file, args.output.as_deref(), &name))
}

fn parse_anchor(at: &str) -> Result<(f32, f32)> {
    let Some((x, y)) = at.split_once(',') else {
        bail!("Invalid position '{at}', expected x,y");
    };
    let x: f32 = x.trim().parse().with_context(|| format!("Invalid x in '{at}'"))?;
    let y: f32 = y.trim().parse().with_context(|| format!("Invalid y in '{at}'"))?;
    Ok((x.clamp(0.0, 100.0), y.clamp(0.0, 100.0)))
}
