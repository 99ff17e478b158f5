use image::{imageops, RgbaImage};
use rayon::prelude::*;
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::consts::{DIMENSION_EPSILON, PARALLEL_PIXEL_THRESHOLD};
use crate::error::Result;

/// Size of the canvas that holds the source rotated by `degrees` without
/// clipping any corner.
///
/// `w' = h·|sin θ| + w·|cos θ|`, `h' = h·|cos θ| + w·|sin θ|`. Values within
/// `DIMENSION_EPSILON` of a whole number snap to it; everything else is
/// truncated, like assigning a fractional canvas size.
pub fn rotated_dimensions(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let (sin, cos) = snapped_sin_cos(degrees);
    let (sin, cos) = (sin.abs(), cos.abs());
    let w = height as f64 * sin + width as f64 * cos;
    let h = height as f64 * cos + width as f64 * sin;
    (to_canvas_size(w), to_canvas_size(h))
}

fn to_canvas_size(v: f64) -> u32 {
    let rounded = v.round();
    let size = if (v - rounded).abs() < DIMENSION_EPSILON {
        rounded
    } else {
        v.trunc()
    };
    size.max(1.0) as u32
}

/// sin/cos with exact values at multiples of 90°.
fn snapped_sin_cos(degrees: f64) -> (f64, f64) {
    match quarter_turns(degrees) {
        Some(0) => (0.0, 1.0),
        Some(1) => (1.0, 0.0),
        Some(2) => (0.0, -1.0),
        Some(3) => (-1.0, 0.0),
        _ => degrees.to_radians().sin_cos(),
    }
}

/// Number of clockwise quarter turns if `degrees` is a multiple of 90.
fn quarter_turns(degrees: f64) -> Option<u32> {
    let turns = degrees / 90.0;
    let rounded = turns.round();
    if (turns - rounded).abs() < 1e-9 {
        Some(rounded.rem_euclid(4.0) as u32)
    } else {
        None
    }
}

/// Rotate clockwise by `degrees` about the image centre onto a canvas that
/// fits the rotated bounds. Uncovered pixels are transparent.
pub fn rotate(bitmap: &Bitmap, degrees: f64) -> Result<Bitmap> {
    let rotated = match quarter_turns(degrees) {
        Some(0) => bitmap.pixels.clone(),
        Some(1) => imageops::rotate90(&bitmap.pixels),
        Some(2) => imageops::rotate180(&bitmap.pixels),
        Some(3) => imageops::rotate270(&bitmap.pixels),
        _ => rotate_arbitrary(&bitmap.pixels, degrees),
    };
    debug!(
        degrees,
        width = rotated.width(),
        height = rotated.height(),
        "Rotated"
    );
    Bitmap::from_rgba(rotated)
}

fn rotate_arbitrary(src: &RgbaImage, degrees: f64) -> RgbaImage {
    let (w, h) = src.dimensions();
    let (out_w, out_h) = rotated_dimensions(w, h, degrees);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (in_cx, in_cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let (out_cx, out_cy) = (out_w as f64 / 2.0, out_h as f64 / 2.0);

    let row_len = out_w as usize * 4;
    let mut buf = vec![0u8; row_len * out_h as usize];

    let render_row = |(row, line): (usize, &mut [u8])| {
        let dy = row as f64 + 0.5 - out_cy;
        for col in 0..out_w as usize {
            let dx = col as f64 + 0.5 - out_cx;
            // Inverse rotation back into source space.
            let sx = cos * dx + sin * dy + in_cx - 0.5;
            let sy = -sin * dx + cos * dy + in_cy - 0.5;
            let px = sample_bilinear(src, sx, sy);
            line[col * 4..col * 4 + 4].copy_from_slice(&px);
        }
    };

    if out_w as usize * out_h as usize >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_chunks_mut(row_len).enumerate().for_each(render_row);
    } else {
        buf.chunks_mut(row_len).enumerate().for_each(render_row);
    }

    RgbaImage::from_raw(out_w, out_h, buf).unwrap_or_else(|| RgbaImage::new(out_w, out_h))
}

/// Bilinear sample in premultiplied space; outside the image is transparent.
pub(crate) fn sample_bilinear(img: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let tx = x - x0 as f64;
    let ty = y - y0 as f64;

    let mut acc = [0.0f64; 4];
    for (ox, oy, weight) in [
        (0, 0, (1.0 - tx) * (1.0 - ty)),
        (1, 0, tx * (1.0 - ty)),
        (0, 1, (1.0 - tx) * ty),
        (1, 1, tx * ty),
    ] {
        let (px, py) = (x0 + ox, y0 + oy);
        if weight <= 0.0 || px < 0 || py < 0 || px >= w || py >= h {
            continue;
        }
        let p = img.get_pixel(px as u32, py as u32).0;
        let a = p[3] as f64 / 255.0 * weight;
        acc[0] += p[0] as f64 * a;
        acc[1] += p[1] as f64 * a;
        acc[2] += p[2] as f64 * a;
        acc[3] += a;
    }

    if acc[3] <= 0.0 {
        return [0, 0, 0, 0];
    }
    [
        (acc[0] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[1] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[2] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}
