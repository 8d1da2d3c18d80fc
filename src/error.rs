//! Error types for the make-your-mark crate.

use std::path::PathBuf;

/// Errors that can occur while collecting inputs, compositing, or exporting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be decoded as an image.
    #[error("not an image file: {}. Only image files may be uploaded", .0.display())]
    UnsupportedFileFormat(PathBuf),

    /// A text watermark was requested with no content.
    #[error("watermark text is empty")]
    EmptyText,

    /// Compositing was requested before a placement was chosen.
    #[error("no placement selected for the watermark")]
    MissingPlacement,

    /// The placement name is not one of the five known positions.
    #[error("invalid placement {0:?} (expected center, top-left, top-right, bottom-left or bottom-right)")]
    InvalidPlacement(String),

    /// Compositing was requested before a watermark was chosen.
    #[error("no watermark selected")]
    MissingWatermark,

    /// Compositing was requested before a base image was loaded.
    #[error("no base image loaded")]
    MissingBaseImage,

    /// A watermark was already chosen for this session.
    #[error("a watermark has already been chosen for this session")]
    WatermarkAlreadyChosen,

    /// The text color name is not recognized.
    #[error("invalid text color {0:?} (expected white or black)")]
    InvalidColor(String),

    /// Text rendering was requested but no font is loaded.
    #[error("no font available for text watermarks (use --font or set MARK_FONT)")]
    FontUnavailable,

    /// The font file could not be parsed.
    #[error("failed to parse font file: {}", .0.display())]
    FontLoad(PathBuf),

    /// The output path names a format that is not lossless.
    #[error("unsupported output format: {0} (use png, bmp or tiff)")]
    UnsupportedOutputFormat(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during image encoding or decoding.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
