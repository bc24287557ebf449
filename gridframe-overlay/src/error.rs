use std::path::PathBuf;

/// Errors that can occur while decoding, compositing or writing icons.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Overlay not found: {}", .0.display())]
    OverlayNotFound(PathBuf),

    #[error("Mask is {mask_w}x{mask_h} but image is {image_w}x{image_h}")]
    DimensionMismatch {
        image_w: u32,
        image_h: u32,
        mask_w: u32,
        mask_h: u32,
    },

    #[error("Image has no pixels")]
    EmptyImage,
}
