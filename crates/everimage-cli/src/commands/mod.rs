pub mod brush;
pub mod compress;
pub mod config;
pub mod convert;
pub mod crop;
pub mod erase;
pub mod info;
pub mod remove_bg;
pub mod resize;
pub mod rotate;
pub mod run;
pub mod text;
pub mod watermark;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use everimage_core::bitmap::Bitmap;
use everimage_core::io::image_io::{load_bitmap, save_bitmap};

/// Parse `x,y;x,y;...` into points.
pub fn parse_points(input: &str) -> Result<Vec<[f32; 2]>> {
    let mut points = Vec::new();
    for pair in input.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((x, y)) = pair.split_once(',') else {
            bail!("Invalid point '{pair}', expected x,y");
        };
        let x: f32 = x.trim().parse().with_context(|| format!("Invalid x in '{pair}'"))?;
        let y: f32 = y.trim().parse().with_context(|| format!("Invalid y in '{pair}'"))?;
        points.push([x, y]);
    }
    if points.is_empty() {
        bail!("No points given");
    }
    Ok(points)
}

/// `output` if given, otherwise `name` next to the input.
pub fn output_path(input: &Path, output: Option<&Path>, name: &str) -> PathBuf {
    match output {
        Some(p) => p.to_path_buf(),
        None => input.with_file_name(name),
    }
}

pub fn load(path: &Path) -> Result<Bitmap> {
    let bitmap = load_bitmap(path).with_context(|| format!("Failed to load {}", path.display()))?;
    println!(
        "Loaded {}x{} image from {}",
        bitmap.width(),
        bitmap.height(),
        path.display()
    );
    Ok(bitmap)
}

pub fn save(bitmap: &Bitmap, path: &Path) -> Result<()> {
    save_bitmap(bitmap, path).with_context(|| format!("Failed to save {}", path.display()))?;
    println!(
        "Saved {}x{} image to {}",
        bitmap.width(),
        bitmap.height(),
        path.display()
    );
    Ok(())
}

/// File name with the input's stem and a new suffix, e.g. `cat-rotated.png`.
pub fn suffixed_name(input: &Path, suffix: &str, ext: &str) -> String {
    let base = everimage_core::io::export::base_name(&input.to_string_lossy());
    format!("{base}-{suffix}.{ext}")
}
