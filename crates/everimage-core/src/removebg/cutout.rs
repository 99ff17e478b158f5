use tracing::{debug, info};

use crate::bitmap::Bitmap;
use crate::brush::stamp::erase_stamp;
use crate::consts::{
    CUTOUT_EXPORT_NAME, CUTOUT_MAX_ZOOM, CUTOUT_MIN_ZOOM, CUTOUT_ZOOM_STEP, DEFAULT_ERASER_SIZE,
    ERASER_MAX_SIZE, ERASER_MIN_SIZE,
};
use crate::error::{EverimageError, Result};
use crate::io::image_io::{encode_png, InputImage};
use crate::removebg::proxy::ProxyResponse;

/// Manual touch-up of a background-removal result with a hard eraser.
#[derive(Clone, Debug)]
pub struct CutoutEditor {
    result: Bitmap,
    live: Bitmap,
    brush_size: u32,
    zoom: u32,
    erasing: bool,
    drawing: bool,
}

impl CutoutEditor {
    pub fn new(result: Bitmap) -> Self {
        Self {
            live: result.clone(),
            result,
            brush_size: DEFAULT_ERASER_SIZE,
            zoom: 100,
            erasing: false,
            drawing: false,
        }
    }

    /// Load the PNG returned by the proxy; an error response becomes
    /// `RemoveBg` with the server's message.
    pub fn from_response(response: &ProxyResponse) -> Result<Self> {
        if !response.is_success() {
            let message = response
                .error_message()
                .unwrap_or_else(|| "Failed to remove background".to_string());
            return Err(EverimageError::RemoveBg(message));
        }
        let input = InputImage::from_bytes("result.png", response.body.clone())?;
        let bitmap = input.decode()?;
        info!(
            width = bitmap.width(),
            height = bitmap.height(),
            "Cut-out loaded"
        );
        Ok(Self::new(bitmap))
    }

    pub fn live(&self) -> &Bitmap {
        &self.live
    }

    pub fn result(&self) -> &Bitmap {
        &self.result
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(ERASER_MIN_SIZE, ERASER_MAX_SIZE);
    }

    /// Zoom in percent.
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: u32) {
        self.zoom = zoom.clamp(CUTOUT_MIN_ZOOM, CUTOUT_MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + CUTOUT_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(CUTOUT_ZOOM_STEP));
    }

    /// Scrolling down zooms out.
    pub fn zoom_wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.zoom_out();
        } else {
            self.zoom_in();
        }
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    /// Toggle eraser mode. Pointer events are ignored while it is off.
    pub fn set_erasing(&mut self, erasing: bool) {
        self.erasing = erasing;
        if !erasing {
            self.drawing = false;
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.erasing {
            return;
        }
        self.drawing = true;
        self.erase(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.drawing {
            self.erase(x, y);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drawing = false;
    }

    /// Clear a disc of the current brush radius.
    pub fn erase(&mut self, x: f32, y: f32) {
        erase_stamp(&mut self.live, x, y, self.brush_size);
        debug!(x, y, radius = self.brush_size, "Erased");
    }

    /// Drop all manual edits.
    pub fn reset(&mut self) {
        self.live = self.result.clone();
        self.drawing = false;
    }

    pub fn export(&self) -> Result<Vec<u8>> {
        encode_png(&self.live)
    }

    pub fn export_name() -> &'static str {
        CUTOUT_EXPORT_NAME
    }
}
