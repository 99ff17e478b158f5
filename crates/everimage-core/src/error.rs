use thiserror::Error;

#[derive(Error, Debug)]
pub enum EverimageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Cannot convert {from} images to {to} format")]
    UnsupportedConversion { from: String, to: String },

    #[error("Unrecognised image format: {0}")]
    UnknownFormat(String),

    #[error("SVG error: {0}")]
    Svg(String),

    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Recipe error: {0}")]
    Recipe(String),

    #[error("{0}")]
    RemoveBg(String),

    #[error("Nothing loaded")]
    EmptyHistory,
}

pub type Result<T> = std::result::Result<T, EverimageError>;
