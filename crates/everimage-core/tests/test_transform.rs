mod common;

use approx::assert_abs_diff_eq;
use everimage_core::error::EverimageError;
use everimage_core::transform::crop::{
    percent_to_display, AspectPreset, CropDrag, CropHandle, CropRect, DisplayFit, DisplayMapping,
};
use everimage_core::transform::resize::fit_dimensions;
use everimage_core::transform::{
    crop, crop_display, resize, rotate, rotated_dimensions, PixelRect, ResizeFilter,
};

// ---------------------------------------------------------------------------
// Crop
// ---------------------------------------------------------------------------

#[test]
fn test_full_extent_crop_is_identity() {
    let img = common::coordinate_map(30, 20);
    let out = crop(&img, &PixelRect::full(&img)).unwrap();
    assert_eq!(out, img);
}

#[test]
fn test_crop_extracts_region() {
    let img = common::coordinate_map(30, 20);
    let rect = PixelRect {
        x: 5,
        y: 3,
        width: 10,
        height: 4,
    };
    let out = crop(&img, &rect).unwrap();
    assert_eq!(out.dimensions(), (10, 4));
    assert_eq!(out.get(0, 0), [5, 3, 0, 255]);
    assert_eq!(out.get(9, 3), [14, 6, 0, 255]);
}

#[test]
fn test_crop_out_of_bounds_fails() {
    let img = common::solid(10, 10, [0, 0, 0]);
    let rect = PixelRect {
        x: 5,
        y: 5,
        width: 6,
        height: 2,
    };
    assert!(matches!(
        crop(&img, &rect),
        Err(EverimageError::InvalidCrop(_))
    ));
}

#[test]
fn test_crop_zero_size_fails() {
    let img = common::solid(10, 10, [0, 0, 0]);
    let rect = PixelRect {
        x: 0,
        y: 0,
        width: 0,
        height: 5,
    };
    assert!(crop(&img, &rect).is_err());
}

#[test]
fn test_stretch_mapping_scales_axes_independently() {
    let img = common::coordinate_map(100, 50);
    let mapping = DisplayMapping {
        natural_width: 100,
        natural_height: 50,
        render_width: 200.0,
        render_height: 200.0,
        fit: DisplayFit::Stretch,
    };
    let rect = CropRect {
        x: 20.0,
        y: 40.0,
        width: 100.0,
        height: 80.0,
    };
    let src = mapping.to_source(&rect).unwrap();
    assert_eq!(
        src,
        PixelRect {
            x: 10,
            y: 10,
            width: 50,
            height: 20
        }
    );
    let out = crop_display(&img, &rect, &mapping).unwrap();
    assert_eq!(out.get(0, 0), [10, 10, 0, 255]);
}

#[test]
fn test_contain_mapping_clamps_letterbox_to_image() {
    // 100x50 in a 100x100 box: 25px bars top and bottom.
    let mapping = DisplayMapping {
        natural_width: 100,
        natural_height: 50,
        render_width: 100.0,
        render_height: 100.0,
        fit: DisplayFit::Contain,
    };
    let rect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };
    let src = mapping.to_source(&rect).unwrap();
    assert_eq!(
        src,
        PixelRect {
            x: 0,
            y: 0,
            width: 100,
            height: 50
        }
    );
}

#[test]
fn test_mapping_without_render_size_fails() {
    let mapping = DisplayMapping {
        natural_width: 10,
        natural_height: 10,
        render_width: 0.0,
        render_height: 10.0,
        fit: DisplayFit::Contain,
    };
    let rect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 5.0,
        height: 5.0,
    };
    assert!(mapping.to_source(&rect).is_err());
}

fn drag(handle: CropHandle) -> CropDrag {
    CropDrag {
        start_x: 0.0,
        start_y: 0.0,
        start_rect: CropRect {
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 100.0,
        },
        handle,
        container_width: 400.0,
        container_height: 300.0,
    }
}

#[test]
fn test_drag_move_stays_inside_container() {
    let r = drag(CropHandle::Move).update(500.0, -500.0);
    assert_abs_diff_eq!(r.x, 200.0);
    assert_abs_diff_eq!(r.y, 0.0);
    assert_abs_diff_eq!(r.width, 200.0);
}

#[test]
fn test_drag_se_respects_minimum_size() {
    let r = drag(CropHandle::Se).update(-1000.0, -1000.0);
    assert_abs_diff_eq!(r.width, 20.0);
    assert_abs_diff_eq!(r.height, 20.0);
    assert_abs_diff_eq!(r.x, 100.0);
}

#[test]
fn test_drag_se_stops_at_container_edge() {
    let r = drag(CropHandle::Se).update(1000.0, 1000.0);
    assert_abs_diff_eq!(r.width, 300.0);
    assert_abs_diff_eq!(r.height, 200.0);
}

#[test]
fn test_drag_nw_keeps_opposite_corner() {
    let r = drag(CropHandle::Nw).update(-50.0, -30.0);
    assert_abs_diff_eq!(r.x, 50.0);
    assert_abs_diff_eq!(r.y, 70.0);
    assert_abs_diff_eq!(r.x + r.width, 300.0);
    assert_abs_diff_eq!(r.y + r.height, 200.0);
}

#[test]
fn test_drag_nw_cannot_cross_container_origin() {
    let r = drag(CropHandle::Nw).update(-500.0, -500.0);
    assert_abs_diff_eq!(r.x, 0.0);
    assert_abs_diff_eq!(r.y, 0.0);
}

#[test]
fn test_aspect_preset_on_wide_image() {
    let rect = AspectPreset::Square.initial_percent_crop(200.0, 100.0);
    assert_abs_diff_eq!(rect.width, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rect.height, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rect.x, 25.0, epsilon = 1e-9);

    let px = percent_to_display(&rect, 200.0, 100.0);
    assert_abs_diff_eq!(px.width, 100.0, epsilon = 1e-9);
}

#[test]
fn test_custom_aspect_selects_everything() {
    let rect = AspectPreset::Custom.initial_percent_crop(300.0, 100.0);
    assert_eq!(
        rect,
        CropRect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0
        }
    );
    assert!(AspectPreset::Custom.ratio().is_none());
}

// ---------------------------------------------------------------------------
// Rotate
// ---------------------------------------------------------------------------

#[test]
fn test_rotated_dimensions_quarter_turn_swaps() {
    assert_eq!(rotated_dimensions(40, 10, 90.0), (10, 40));
    assert_eq!(rotated_dimensions(40, 10, -90.0), (10, 40));
    assert_eq!(rotated_dimensions(40, 10, 180.0), (40, 10));
}

#[test]
fn test_rotated_dimensions_45_degrees() {
    // 100 * (sin 45 + cos 45) = 141.42...
    assert_eq!(rotated_dimensions(100, 100, 45.0), (141, 141));
}

#[test]
fn test_rotate_90_moves_top_left_to_top_right() {
    let img = common::coordinate_map(4, 3);
    let out = rotate(&img, 90.0).unwrap();
    assert_eq!(out.dimensions(), (3, 4));
    assert_eq!(out.get(2, 0), img.get(0, 0));
    assert_eq!(out.get(0, 0), img.get(0, 2));
}

#[test]
fn test_rotate_360_is_identity() {
    let img = common::coordinate_map(7, 5);
    assert_eq!(rotate(&img, 360.0).unwrap(), img);
    assert_eq!(rotate(&img, 0.0).unwrap(), img);
}

#[test]
fn test_rotate_180_twice_is_identity() {
    let img = common::coordinate_map(9, 6);
    let once = rotate(&img, 180.0).unwrap();
    assert_eq!(once.get(0, 0), img.get(8, 5));
    assert_eq!(rotate(&once, 180.0).unwrap(), img);
}

#[test]
fn test_rotate_arbitrary_leaves_corners_transparent() {
    let img = common::solid(50, 50, [255, 0, 0]);
    let out = rotate(&img, 45.0).unwrap();
    assert_eq!(out.dimensions(), (70, 70));
    assert_eq!(out.get(0, 0)[3], 0);
    assert_eq!(out.get(35, 35), [255, 0, 0, 255]);
}

// ---------------------------------------------------------------------------
// Resize
// ---------------------------------------------------------------------------

#[test]
fn test_fit_dimensions_keeps_aspect() {
    assert_eq!(fit_dimensions(400, 200, Some(100), None).unwrap(), (100, 50));
    assert_eq!(fit_dimensions(400, 200, None, Some(50)).unwrap(), (100, 50));
    assert_eq!(fit_dimensions(400, 200, None, None).unwrap(), (400, 200));
    assert!(fit_dimensions(400, 200, Some(0), Some(10)).is_err());
}

#[test]
fn test_resize_solid_stays_solid() {
    let img = common::solid(20, 10, [12, 34, 56]);
    let out = resize(&img, 7, 3, ResizeFilter::Bilinear).unwrap();
    assert_eq!(out.dimensions(), (7, 3));
    assert_eq!(out.get(3, 1), [12, 34, 56, 255]);
}
