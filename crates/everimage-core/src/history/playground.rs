use tracing::{debug, info};

use crate::bitmap::Bitmap;
use crate::consts::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::error::{EverimageError, Result};
use crate::history::linear::History;
use crate::transform::crop::{
    crop_display, initial_crop_rect, CropDrag, CropHandle, CropRect, DisplayFit, DisplayMapping,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// One undo step of the playground: the image plus how it is viewed.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    pub bitmap: Bitmap,
    pub zoom: f32,
    pub offset: Offset,
}

impl EditorState {
    pub fn fresh(bitmap: Bitmap) -> Self {
        Self {
            bitmap,
            zoom: 1.0,
            offset: Offset::default(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Pan {
    start_x: f64,
    start_y: f64,
    initial: Offset,
}

/// Single-image editor with zoom, pan, crop and undo/redo.
#[derive(Clone, Debug, Default)]
pub struct Playground {
    history: History<EditorState>,
    pan: Option<Pan>,
    crop: Option<CropRect>,
    crop_drag: Option<CropDrag>,
}

impl Playground {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &History<EditorState> {
        &self.history
    }

    pub fn current(&self) -> Option<&EditorState> {
        self.history.current()
    }

    pub fn crop_rect(&self) -> Option<CropRect> {
        self.crop
    }

    pub fn is_cropping(&self) -> bool {
        self.crop.is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Start over from `bitmap` at zoom 1 and no offset. Earlier entries
    /// stay reachable through undo.
    pub fn load(&mut self, bitmap: Bitmap) {
        self.cancel_crop();
        info!(
            width = bitmap.width(),
            height = bitmap.height(),
            "Playground image loaded"
        );
        self.history.push(EditorState::fresh(bitmap));
    }

    /// Zoom by one step: in when `delta_y < 0`, out otherwise. A change of
    /// zoom is an undo step; hitting a bound is not.
    pub fn zoom_wheel(&mut self, delta_y: f64) -> bool {
        let Some(state) = self.history.current() else {
            return false;
        };
        let step = if delta_y < 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
        let zoom = (state.zoom + step).clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == state.zoom {
            return false;
        }
        debug!(zoom, "Zoom");
        self.history.apply_from_current(|s| EditorState {
            zoom,
            ..s.clone()
        })
    }

    pub fn begin_pan(&mut self, x: f64, y: f64) {
        let Some(state) = self.history.current() else {
            return;
        };
        self.pan = Some(Pan {
            start_x: x,
            start_y: y,
            initial: state.offset,
        });
    }

    /// Live pan: rewrites the current entry's offset without a new step.
    pub fn pan_to(&mut self, x: f64, y: f64) {
        let Some(pan) = self.pan else {
            return;
        };
        let offset = Offset {
            x: pan.initial.x + (x - pan.start_x),
            y: pan.initial.y + (y - pan.start_y),
        };
        self.history.replace_current(|s| s.offset = offset);
    }

    /// Finish a pan; if the offset moved, the panned view becomes its own
    /// undo step.
    pub fn end_pan(&mut self) -> bool {
        let Some(pan) = self.pan.take() else {
            return false;
        };
        let moved = self
            .history
            .current()
            .is_some_and(|s| s.offset != pan.initial);
        if moved {
            self.history.apply_from_current(EditorState::clone);
        }
        moved
    }

    /// Show the crop overlay in a `container_w` x `container_h` preview.
    pub fn start_crop(&mut self, container_w: f64, container_h: f64) -> Option<CropRect> {
        self.history.current()?;
        let rect = initial_crop_rect(container_w, container_h);
        self.crop = Some(rect);
        Some(rect)
    }

    pub fn begin_crop_drag(
        &mut self,
        handle: CropHandle,
        x: f64,
        y: f64,
        container_w: f64,
        container_h: f64,
    ) {
        let Some(rect) = self.crop else {
            return;
        };
        self.crop_drag = Some(CropDrag {
            start_x: x,
            start_y: y,
            start_rect: rect,
            handle,
            container_width: container_w,
            container_height: container_h,
        });
    }

    pub fn drag_crop_to(&mut self, x: f64, y: f64) -> Option<CropRect> {
        let drag = self.crop_drag?;
        let rect = drag.update(x, y);
        self.crop = Some(rect);
        Some(rect)
    }

    pub fn end_crop_drag(&mut self) {
        self.crop_drag = None;
    }

    pub fn cancel_crop(&mut self) {
        self.crop = None;
        self.crop_drag = None;
    }

    /// Crop the current image to the overlay. The image is shown
    /// letterboxed in a `render_w` x `render_h` box. The result starts at
    /// zoom 1 with no offset.
    pub fn apply_crop(&mut self, render_w: f64, render_h: f64) -> Result<bool> {
        if render_w <= 0.0 || render_h <= 0.0 {
            self.cancel_crop();
            return Ok(false);
        }
        let (Some(state), Some(rect)) = (self.history.current(), self.crop) else {
            self.cancel_crop();
            return Ok(false);
        };
        let mapping = DisplayMapping {
            natural_width: state.bitmap.width(),
            natural_height: state.bitmap.height(),
            render_width: render_w,
            render_height: render_h,
            fit: DisplayFit::Contain,
        };
        let cropped = crop_display(&state.bitmap, &rect, &mapping)?;
        info!(
            width = cropped.width(),
            height = cropped.height(),
            "Playground crop applied"
        );
        self.history.push(EditorState::fresh(cropped));
        self.cancel_crop();
        Ok(true)
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_crop();
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_crop();
        self.history.redo()
    }

    /// The bitmap currently shown.
    pub fn export(&self) -> Result<&Bitmap> {
        self.history
            .current()
            .map(|s| &s.bitmap)
            .ok_or(EverimageError::EmptyHistory)
    }
}
