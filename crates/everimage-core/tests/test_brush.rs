mod common;

use approx::assert_abs_diff_eq;
use everimage_core::bitmap::Bitmap;
use everimage_core::brush::stack_blur::stack_blur;
use everimage_core::brush::stamp::{block_mean, erase_stamp, radial_mask};
use everimage_core::brush::{BrushCanvas, BrushMode, BrushSettings, Stroke, StrokeState};

fn blur_settings(feather: u32) -> BrushSettings {
    BrushSettings {
        mode: BrushMode::Blur,
        size: 10,
        feather,
        blur_strength: 5,
        ..BrushSettings::default()
    }
}

/// Even columns (200, 100, 50), odd columns black.
fn striped(width: u32, height: u32) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let c = if x % 2 == 0 { [200, 100, 50, 255] } else { [0, 0, 0, 255] };
            bitmap.put(x, y, c);
        }
    }
    bitmap
}

// ---------------------------------------------------------------------------
// Stroke state machine
// ---------------------------------------------------------------------------

#[test]
fn test_stroke_ignores_moves_while_idle() {
    let mut s = Stroke::new(None);
    assert!(s.pointer_move(3.0, 4.0).is_empty());
    assert_eq!(s.state(), StrokeState::Idle);
}

#[test]
fn test_stroke_down_move_up() {
    let mut s = Stroke::new(None);
    assert_eq!(s.pointer_down(1.0, 2.0), vec![(1.0, 2.0)]);
    assert!(s.is_drawing());
    assert_eq!(s.pointer_move(30.0, 2.0), vec![(30.0, 2.0)]);
    assert_eq!(
        s.state(),
        StrokeState::Drawing {
            last_x: 30.0,
            last_y: 2.0
        }
    );
    s.pointer_up();
    assert!(!s.is_drawing());
    assert!(s.pointer_move(40.0, 2.0).is_empty());
}

#[test]
fn test_stroke_leave_ends_drawing() {
    let mut s = Stroke::new(None);
    s.pointer_down(0.0, 0.0);
    s.pointer_leave();
    assert_eq!(s.state(), StrokeState::Idle);
}

#[test]
fn test_stroke_spacing_fills_gaps() {
    let mut s = Stroke::new(Some(5.0));
    s.pointer_down(0.0, 0.0);
    let points = s.pointer_move(20.0, 0.0);
    assert_eq!(points, vec![(5.0, 0.0), (10.0, 0.0), (15.0, 0.0), (20.0, 0.0)]);
}

#[test]
fn test_stroke_spacing_short_move_is_single_stamp() {
    let mut s = Stroke::new(Some(50.0));
    s.pointer_down(0.0, 0.0);
    assert_eq!(s.pointer_move(3.0, 4.0), vec![(3.0, 4.0)]);
}

#[test]
fn test_stroke_non_positive_spacing_is_discrete() {
    let mut s = Stroke::new(Some(0.0));
    s.pointer_down(0.0, 0.0);
    assert_eq!(s.pointer_move(100.0, 0.0).len(), 1);
}

// ---------------------------------------------------------------------------
// Masks and helpers
// ---------------------------------------------------------------------------

#[test]
fn test_radial_mask_hard_edge() {
    let mask = radial_mask(21, 21, 10.5, 10.5, 5.0, 0.0);
    assert_eq!(mask[10 * 21 + 10], 1.0);
    assert_eq!(mask[10 * 21 + 19], 0.0);
    assert!(mask.iter().all(|&m| m == 0.0 || m == 1.0));
}

#[test]
fn test_radial_mask_feather_ramps() {
    let mask = radial_mask(21, 21, 10.5, 10.5, 10.0, 4.0);
    assert_abs_diff_eq!(mask[10 * 21 + 10], 1.0);
    // 8px from the centre: halfway through the 6..10 band.
    assert_abs_diff_eq!(mask[2 * 21 + 10], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(mask[0], 0.0);
}

#[test]
fn test_block_mean_floors() {
    let mut img = common::solid(2, 1, [0, 0, 0]);
    img.put(1, 0, [1, 3, 255, 255]);
    assert_eq!(block_mean(&img, 0, 0, 2, 1), Some([0, 1, 127]));
    assert_eq!(block_mean(&img, 5, 5, 2, 2), None);
}

#[test]
fn test_stack_blur_radius_zero_is_identity() {
    let img = common::checkerboard(16, 16, 2);
    assert_eq!(stack_blur(&img, 0), img);
}

#[test]
fn test_stack_blur_uniform_stays_uniform() {
    let img = common::solid(12, 9, [90, 140, 10]);
    let out = stack_blur(&img, 4);
    assert!(out.pixels.pixels().all(|p| p.0 == [90, 140, 10, 255]));
}

#[test]
fn test_stack_blur_smooths_edges() {
    let img = common::checkerboard(32, 32, 8);
    let out = stack_blur(&img, 3);
    // Just left of a black/white boundary.
    let v = out.get(7, 4)[0];
    assert!(v > 0 && v < 255, "edge value {v}");
}

#[test]
fn test_erase_stamp_clears_disc_only() {
    let mut img = common::solid(40, 40, [10, 10, 10]);
    erase_stamp(&mut img, 20.0, 20.0, 5);
    assert_eq!(img.get(20, 20), [0, 0, 0, 0]);
    assert_eq!(img.get(0, 0), [10, 10, 10, 255]);
    assert_eq!(img.get(20, 30), [10, 10, 10, 255]);
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[test]
fn test_settings_are_clamped() {
    let canvas = BrushCanvas::new(
        common::solid(4, 4, [0, 0, 0]),
        BrushSettings {
            size: 500,
            feather: 99,
            blur_strength: 1,
            mosaic_size: 80,
            ..BrushSettings::default()
        },
    );
    let s = canvas.settings();
    assert_eq!(s.size, 100);
    assert_eq!(s.feather, 50);
    assert_eq!(s.blur_strength, 5);
    assert_eq!(s.mosaic_size, 50);
}

#[test]
fn test_blur_stamp_is_local() {
    let img = common::checkerboard(100, 100, 4);
    let mut canvas = BrushCanvas::new(img.clone(), blur_settings(0));
    canvas.stroke_path(&[(50.0, 50.0)]);
    assert_ne!(canvas.live().get(50, 50), img.get(50, 50));
    assert_eq!(canvas.live().get(5, 5), img.get(5, 5));
    assert_eq!(canvas.live().get(50, 70), img.get(50, 70));
}

#[test]
fn test_blur_is_deterministic() {
    let img = common::gradient(80, 60);
    let path = [(20.0, 20.0), (35.0, 25.0), (50.0, 40.0)];
    let mut a = BrushCanvas::new(img.clone(), blur_settings(3));
    let mut b = BrushCanvas::new(img, blur_settings(3));
    a.stroke_path(&path);
    b.stroke_path(&path);
    assert_eq!(a.live(), b.live());
}

#[test]
fn test_blur_does_not_compound() {
    let img = common::checkerboard(64, 64, 3);
    let mut once = BrushCanvas::new(img.clone(), blur_settings(0));
    once.stroke_path(&[(32.0, 32.0)]);
    let mut twice = BrushCanvas::new(img, blur_settings(0));
    twice.stroke_path(&[(32.0, 32.0)]);
    twice.stroke_path(&[(32.0, 32.0)]);
    assert_eq!(once.live(), twice.live());
}

#[test]
fn test_blur_inner_radius_stable_feather_band_accumulates() {
    let img = common::checkerboard(64, 64, 3);
    let settings = BrushSettings::default();
    let inner = (settings.size - settings.feather) as f32;
    let outer = settings.size as f32;

    let mut once = BrushCanvas::new(img.clone(), settings);
    once.stroke_path(&[(32.0, 32.0)]);
    let mut twice = BrushCanvas::new(img, settings);
    twice.stroke_path(&[(32.0, 32.0)]);
    twice.stroke_path(&[(32.0, 32.0)]);

    let mut band_changed = 0;
    for y in 0..64 {
        for x in 0..64 {
            let dx = x as f32 + 0.5 - 32.0;
            let dy = y as f32 + 0.5 - 32.0;
            let d = (dx * dx + dy * dy).sqrt();
            let (a, b) = (once.live().get(x, y), twice.live().get(x, y));
            if d <= inner || d >= outer {
                assert_eq!(a, b, "pixel ({x}, {y}) at distance {d}");
            } else if a != b {
                band_changed += 1;
            }
        }
    }
    assert!(band_changed > 0);
}

#[test]
fn test_mosaic_fills_cells_with_mean() {
    let settings = BrushSettings {
        mode: BrushMode::Mosaic,
        size: 30,
        feather: 0,
        mosaic_size: 10,
        ..BrushSettings::default()
    };
    let mut canvas = BrushCanvas::new(striped(20, 20), settings);
    canvas.stroke_path(&[(10.0, 10.0)]);
    for (x, y) in [(0, 0), (1, 0), (19, 19), (12, 7)] {
        assert_eq!(canvas.live().get(x, y), [100, 50, 25, 255]);
    }
}

#[test]
fn test_mosaic_feather_blends_outer_cells() {
    let settings = BrushSettings {
        mode: BrushMode::Mosaic,
        size: 20,
        feather: 20,
        mosaic_size: 10,
        ..BrushSettings::default()
    };
    let img = striped(40, 40);
    let mut canvas = BrushCanvas::new(img.clone(), settings);
    canvas.stroke_path(&[(20.0, 20.0)]);
    // Cell at (10, 10) has its centre ~7px from the stroke: partial opacity.
    let p = canvas.live().get(10, 10);
    assert!(p[0] > 100 && p[0] < 200, "blended {p:?}");
}

#[test]
fn test_mosaic_feather_band_accumulates() {
    let settings = BrushSettings {
        mode: BrushMode::Mosaic,
        size: 20,
        feather: 5,
        mosaic_size: 10,
        ..BrushSettings::default()
    };
    let img = striped(40, 40);
    let mut once = BrushCanvas::new(img.clone(), settings);
    once.stroke_path(&[(20.0, 20.0)]);
    let mut twice = BrushCanvas::new(img, settings);
    twice.stroke_path(&[(20.0, 20.0)]);
    twice.stroke_path(&[(20.0, 20.0)]);

    // Cell (10, 10) is fully inside the inner radius.
    assert_eq!(once.live().get(12, 12), [100, 50, 25, 255]);
    assert_eq!(twice.live().get(12, 12), [100, 50, 25, 255]);

    // Cell (0, 10) sits in the feather band at ~0.84 opacity.
    assert_eq!(once.live().get(2, 12)[0], 116);
    assert_eq!(twice.live().get(2, 12)[0], 103);
}

#[test]
fn test_stamp_count_follows_spacing() {
    let img = common::solid(60, 60, [50, 50, 50]);
    let mut discrete = BrushCanvas::new(img.clone(), blur_settings(0));
    discrete.stroke_path(&[(10.0, 10.0), (30.0, 10.0), (50.0, 10.0)]);
    assert_eq!(discrete.stamp_count(), 3);

    let spaced_settings = BrushSettings {
        spacing: Some(5.0),
        ..blur_settings(0)
    };
    let mut spaced = BrushCanvas::new(img, spaced_settings);
    spaced.stroke_path(&[(10.0, 10.0), (30.0, 10.0)]);
    assert_eq!(spaced.stamp_count(), 5);
}

#[test]
fn test_moves_after_pointer_up_do_nothing() {
    let img = common::checkerboard(40, 40, 2);
    let mut canvas = BrushCanvas::new(img, blur_settings(0));
    canvas.pointer_down(10.0, 10.0);
    canvas.pointer_up();
    let after_up = canvas.live().clone();
    canvas.pointer_move(30.0, 30.0);
    assert_eq!(canvas.live(), &after_up);
    assert!(!canvas.is_drawing());
}

#[test]
fn test_reset_restores_original() {
    let img = common::checkerboard(40, 40, 2);
    let mut canvas = BrushCanvas::new(img.clone(), blur_settings(2));
    canvas.stroke_path(&[(20.0, 20.0), (25.0, 25.0)]);
    assert_ne!(canvas.live(), &img);
    canvas.reset();
    assert_eq!(canvas.live(), &img);
    assert_eq!(canvas.stamp_count(), 0);
}

#[test]
fn test_export_name_follows_mode() {
    let img = common::solid(4, 4, [0, 0, 0]);
    let mut canvas = BrushCanvas::new(img, BrushSettings::default());
    assert_eq!(canvas.export_name("cat.photo.jpg"), "cat-blur.png");
    canvas.set_settings(BrushSettings {
        mode: BrushMode::Mosaic,
        ..BrushSettings::default()
    });
    assert_eq!(canvas.export_name("cat.jpg"), "cat-mosaic.png");
}
