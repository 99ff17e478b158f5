//! Porter-Duff compositing on straight-alpha RGBA8 pixels.
//!
//! Only the operators the tools need: source-over with a global alpha,
//! destination-in with a coverage mask, and destination-out.

use crate::bitmap::Bitmap;

/// Composite `src` over `dst` with an extra global alpha in [0, 1].
pub fn source_over(dst: [u8; 4], src: [u8; 4], global_alpha: f32) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0 * global_alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

/// Draw `src` onto `dst` at (`dx`, `dy`), clipped to `dst`.
pub fn draw_over(dst: &mut Bitmap, src: &Bitmap, dx: i64, dy: i64, global_alpha: f32) {
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    for sy in 0..src.height() as i64 {
        let ty = dy + sy;
        if ty < 0 || ty >= dh {
            continue;
        }
        for sx in 0..src.width() as i64 {
            let tx = dx + sx;
            if tx < 0 || tx >= dw {
                continue;
            }
            let s = src.get(sx as u32, sy as u32);
            let d = dst.get(tx as u32, ty as u32);
            dst.put(tx as u32, ty as u32, source_over(d, s, global_alpha));
        }
    }
}

/// Keep `bitmap` only where `mask` has coverage: alpha *= mask.
///
/// `mask` is row-major with the bitmap's dimensions, values in [0, 1].
pub fn destination_in(bitmap: &mut Bitmap, mask: &[f32]) {
    debug_assert_eq!(mask.len(), (bitmap.width() * bitmap.height()) as usize);
    for (pixel, &m) in bitmap.pixels.pixels_mut().zip(mask) {
        let a = pixel.0[3] as f32 * m.clamp(0.0, 1.0);
        pixel.0[3] = a.round() as u8;
        if pixel.0[3] == 0 {
            pixel.0 = [0, 0, 0, 0];
        }
    }
}

/// Clear a filled circle: destination-out with an opaque circular source.
pub fn destination_out_circle(bitmap: &mut Bitmap, cx: f32, cy: f32, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let (w, h) = bitmap.dimensions();
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil().max(0.0) as u32).min(w);
    let y1 = ((cy + radius).ceil().max(0.0) as u32).min(h);
    let r2 = radius * radius;
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                bitmap.put(x, y, [0, 0, 0, 0]);
            }
        }
    }
}

/// Composite over an opaque white background.
pub fn flatten_on_white(bitmap: &Bitmap) -> Bitmap {
    let mut out = bitmap.clone();
    for pixel in out.pixels.pixels_mut() {
        pixel.0 = source_over([255, 255, 255, 255], pixel.0, 1.0);
    }
    out
}
