pub mod crop;
pub mod resize;
pub mod rotate;

pub use crop::{crop, crop_display, CropRect, DisplayFit, DisplayMapping, PixelRect};
pub use resize::{resize, ResizeFilter};
pub use rotate::{rotate, rotated_dimensions};
