use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use everimage_core::consts::DEFAULT_ERASER_SIZE;
use everimage_core::removebg::CutoutEditor;

use super::{load, output_path, parse_points, save};

#[derive(Args)]
pub struct EraseArgs {
    /// Input image
    pub file: PathBuf,

    /// Eraser positions in image pixels: "x,y;x,y;..."
    #[arg(long)]
    pub points: String,

    /// Eraser radius in pixels (5-100)
    #[arg(long, default_value_t = DEFAULT_ERASER_SIZE)]
    pub radius: u32,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &EraseArgs) -> Result<()> {
    let points = parse_points(&args.points)?;
    let mut editor = CutoutEditor::new(load(&args.file)?);
    erase_stroke(&mut editor, &points, args.radius);
    println!(
        "Erased {} point(s) with radius {}",
        points.len(),
        editor.brush_size()
    );

    let out = output_path(&args.file, args.output.as_deref(), CutoutEditor::export_name());
    save(editor.live(), &out)
}

/// Drag the eraser through `points` as one stroke.
pub fn erase_stroke(editor: &mut CutoutEditor, points: &[[f32; 2]], radius: u32) {
    editor.set_brush_size(radius);
    editor.set_erasing(true);
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            editor.pointer_down(p[0], p[1]);
        } else {
            editor.pointer_move(p[0], p[1]);
        }
    }
    editor.pointer_up();
}
