use serde::{Deserialize, Serialize};

use crate::consts::OVERLAY_PADDING;

/// Where an overlay box sits on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
    /// Percentages of the free space `(W - w, H - h)`, each 0-100.
    Custom { x_pct: f32, y_pct: f32 },
}

impl Position {
    /// Top-left corner of a `box_w` x `box_h` box on a `canvas_w` x
    /// `canvas_h` canvas.
    pub fn compute(&self, canvas_w: f32, canvas_h: f32, box_w: f32, box_h: f32) -> (f32, f32) {
        let pad = OVERLAY_PADDING;
        match *self {
            Position::TopLeft => (pad, pad),
            Position::TopRight => (canvas_w - box_w - pad, pad),
            Position::BottomLeft => (pad, canvas_h - box_h - pad),
            Position::BottomRight => (canvas_w - box_w - pad, canvas_h - box_h - pad),
            Position::Center => ((canvas_w - box_w) / 2.0, (canvas_h - box_h) / 2.0),
            Position::Custom { x_pct, y_pct } => (
                x_pct / 100.0 * (canvas_w - box_w),
                y_pct / 100.0 * (canvas_h - box_h),
            ),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Position::Custom { .. })
    }

    /// Custom position under the pointer at (`x`, `y`) canvas pixels.
    pub fn custom_at(x: f32, y: f32, canvas_w: f32, canvas_h: f32) -> Self {
        Position::Custom {
            x_pct: to_percent(x, canvas_w),
            y_pct: to_percent(y, canvas_h),
        }
    }
}

/// `value / extent` as a percentage clamped to 0-100.
pub fn to_percent(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    (value / extent * 100.0).clamp(0.0, 100.0)
}
