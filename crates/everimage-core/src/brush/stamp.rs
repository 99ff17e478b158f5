use tracing::trace;

use crate::bitmap::Bitmap;
use crate::brush::stack_blur::stack_blur;
use crate::composite::{destination_in, destination_out_circle, draw_over, source_over};
use crate::transform::crop::{crop, PixelRect};

/// Coverage mask for a round brush centred at (`cx`, `cy`) in a
/// `width` x `height` patch.
///
/// Fully opaque within `radius - feather`, fading linearly to zero at
/// `radius`. With no feather the mask is a hard disc.
pub fn radial_mask(width: u32, height: u32, cx: f32, cy: f32, radius: f32, feather: f32) -> Vec<f32> {
    let inner = (radius - feather).max(0.0);
    let mut mask = Vec::with_capacity((width * height) as usize);
    for py in 0..height {
        for px in 0..width {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = if feather <= 0.0 {
                if d <= radius {
                    1.0
                } else {
                    0.0
                }
            } else if d <= inner {
                1.0
            } else if d >= radius {
                0.0
            } else {
                1.0 - (d - inner) / (radius - inner)
            };
            mask.push(coverage);
        }
    }
    mask
}

/// Blur the round area at (`x`, `y`).
///
/// A square of side `2·radius + 2·strength` is cut from `original` (never
/// from `live`), blurred, masked to the brush shape and drawn over `live`.
/// Inside `radius - feather` the patch is opaque, so repeated passes leave
/// the same pixels there. The feather band is composited source-over and
/// builds up with every pass.
pub fn blur_stamp(
    original: &Bitmap,
    live: &mut Bitmap,
    x: f32,
    y: f32,
    radius: u32,
    feather: u32,
    strength: u32,
) {
    let padding = strength as f32;
    let size = (radius * 2 + strength * 2) as i64;
    let (w, h) = (original.width() as i64, original.height() as i64);

    let sx = ((x - radius as f32 - padding).floor() as i64).max(0);
    let sy = ((y - radius as f32 - padding).floor() as i64).max(0);
    let sw = size.min(w - sx);
    let sh = size.min(h - sy);
    if sw <= 0 || sh <= 0 {
        return;
    }

    let rect = PixelRect {
        x: sx as u32,
        y: sy as u32,
        width: sw as u32,
        height: sh as u32,
    };
    let Ok(region) = crop(original, &rect) else {
        return;
    };
    let mut patch = stack_blur(&region, strength);

    let mask = radial_mask(
        rect.width,
        rect.height,
        x - sx as f32,
        y - sy as f32,
        radius as f32,
        feather as f32,
    );
    destination_in(&mut patch, &mask);
    draw_over(live, &patch, sx, sy, 1.0);
    trace!(x, y, sx, sy, sw, sh, "Blur stamp");
}

/// Pixelate the round area at (`x`, `y`).
///
/// Cells of `block` pixels whose centre lies within the brush are filled with
/// the mean colour of that cell in `original`. Cells in the feather band are
/// painted with reduced opacity and, like the blur band, accumulate when
/// stamped again.
pub fn mosaic_stamp(
    original: &Bitmap,
    live: &mut Bitmap,
    x: f32,
    y: f32,
    radius: u32,
    feather: u32,
    block: u32,
) {
    let block = block.max(1);
    let (w, h) = original.dimensions();
    let r = radius as f32;
    let f = feather as f32;

    let start_x = (x - r).floor().max(0.0) as u32;
    let start_y = (y - r).floor().max(0.0) as u32;
    let end_x = ((x + r).ceil().max(0.0) as u32).min(w);
    let end_y = ((y + r).ceil().max(0.0) as u32).min(h);

    let mut cells = 0usize;
    for my in (start_y..end_y).step_by(block as usize) {
        for mx in (start_x..end_x).step_by(block as usize) {
            let dx = mx as f32 + block as f32 / 2.0 - x;
            let dy = my as f32 + block as f32 / 2.0 - y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > r {
                continue;
            }

            let bw = block.min(w - mx);
            let bh = block.min(h - my);
            let Some([cr, cg, cb]) = block_mean(original, mx, my, bw, bh) else {
                continue;
            };

            let alpha = if f > 0.0 && distance > r - f {
                1.0 - (distance - (r - f)) / f
            } else {
                1.0
            };

            for py in my..my + bh {
                for px in mx..mx + bw {
                    let d = live.get(px, py);
                    live.put(px, py, source_over(d, [cr, cg, cb, 255], alpha));
                }
            }
            cells += 1;
        }
    }
    trace!(x, y, cells, "Mosaic stamp");
}

/// Floored mean RGB of a block; `None` for an empty block.
pub fn block_mean(bitmap: &Bitmap, x: u32, y: u32, width: u32, height: u32) -> Option<[u8; 3]> {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for py in y..(y + height).min(bitmap.height()) {
        for px in x..(x + width).min(bitmap.width()) {
            let p = bitmap.get(px, py);
            sum[0] += p[0] as u64;
            sum[1] += p[1] as u64;
            sum[2] += p[2] as u64;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Some([
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    ])
}

/// Erase a hard disc to full transparency.
pub fn erase_stamp(live: &mut Bitmap, x: f32, y: f32, radius: u32) {
    destination_out_circle(live, x, y, radius as f32);
}
