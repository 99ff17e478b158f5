use resvg::{tiny_skia, usvg};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::{EverimageError, Result};

/// Rasterise an SVG document at its intrinsic size.
pub fn rasterize_svg(data: &[u8]) -> Result<Bitmap> {
    let options = usvg::Options::default();
    let tree =
        usvg::Tree::from_data(data, &options).map_err(|e| EverimageError::Svg(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(EverimageError::InvalidDimensions { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied pixels.
    let mut bitmap = Bitmap::new(width, height)?;
    for (i, px) in pixmap.pixels().iter().enumerate() {
        let c = px.demultiply();
        let x = i as u32 % width;
        let y = i as u32 / width;
        bitmap.put(x, y, [c.red(), c.green(), c.blue(), c.alpha()]);
    }
    debug!(width, height, "SVG rasterised");
    Ok(bitmap)
}
