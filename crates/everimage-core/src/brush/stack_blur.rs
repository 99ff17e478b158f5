use ndarray::Array2;
use rayon::prelude::*;

use crate::bitmap::Bitmap;
use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Stack blur of an RGBA bitmap.
///
/// The kernel is the triangle `r + 1 - |i|` over `[-r, r]` (what a stack
/// blur computes), applied separably with clamped edges. Colour is blurred
/// premultiplied so transparent pixels do not darken their neighbours.
pub fn stack_blur(bitmap: &Bitmap, radius: u32) -> Bitmap {
    if radius == 0 {
        return bitmap.clone();
    }
    let (w, h) = (bitmap.width() as usize, bitmap.height() as usize);

    let mut planes: [Array2<f32>; 4] = std::array::from_fn(|_| Array2::<f32>::zeros((h, w)));
    for (x, y, px) in bitmap.pixels.enumerate_pixels() {
        let a = px.0[3] as f32 / 255.0;
        let (row, col) = (y as usize, x as usize);
        planes[0][[row, col]] = px.0[0] as f32 * a;
        planes[1][[row, col]] = px.0[1] as f32 * a;
        planes[2][[row, col]] = px.0[2] as f32 * a;
        planes[3][[row, col]] = a;
    }

    let blurred = planes.map(|plane| stack_blur_array(&plane, radius as usize));

    let mut out = bitmap.clone();
    for (x, y, px) in out.pixels.enumerate_pixels_mut() {
        let (row, col) = (y as usize, x as usize);
        let a = blurred[3][[row, col]];
        if a <= 0.0 {
            px.0 = [0, 0, 0, 0];
            continue;
        }
        for c in 0..3 {
            px.0[c] = (blurred[c][[row, col]] / a).round().clamp(0.0, 255.0) as u8;
        }
        px.0[3] = (a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Stack blur a single plane.
pub fn stack_blur_array(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    let row_pass = blur_rows(data, radius);
    blur_cols(&row_pass, radius)
}

fn blur_rows(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    let (h, w) = data.dim();

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h)
            .into_par_iter()
            .map(|row| stack_blur_line(&data.row(row).to_vec(), radius))
            .collect()
    } else {
        (0..h)
            .map(|row| stack_blur_line(&data.row(row).to_vec(), radius))
            .collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

fn blur_cols(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    let (h, w) = data.dim();

    let cols: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..w)
            .into_par_iter()
            .map(|col| stack_blur_line(&data.column(col).to_vec(), radius))
            .collect()
    } else {
        (0..w)
            .map(|col| stack_blur_line(&data.column(col).to_vec(), radius))
            .collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (col, col_data) in cols.into_iter().enumerate() {
        for (row, val) in col_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

/// One-dimensional stack blur with running sums; O(n) in the radius.
///
/// `sum_out` holds the left half of the window including the centre,
/// `sum_in` the right half.
pub fn stack_blur_line(line: &[f32], radius: usize) -> Vec<f32> {
    let n = line.len();
    if n == 0 || radius == 0 {
        return line.to_vec();
    }
    let at = |i: isize| line[i.clamp(0, n as isize - 1) as usize];
    let r = radius as isize;
    let divisor = ((radius + 1) * (radius + 1)) as f32;

    let mut sum = 0.0f32;
    let mut sum_out = 0.0f32;
    let mut sum_in = 0.0f32;
    for i in -r..=r {
        let v = at(i);
        sum += v * (r + 1 - i.abs()) as f32;
        if i <= 0 {
            sum_out += v;
        } else {
            sum_in += v;
        }
    }

    let mut out = Vec::with_capacity(n);
    for x in 0..n as isize {
        out.push(sum / divisor);
        sum += sum_in + at(x + r + 1) - sum_out;
        sum_out += at(x + 1) - at(x - r);
        sum_in += at(x + r + 1) - at(x + 1);
    }
    out
}
