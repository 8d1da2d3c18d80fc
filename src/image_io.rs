//! Loading inputs and exporting the composited image.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader, RgbaImage};

use crate::error::{Error, Result};

/// File the composited image is written to when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "watermarked_image.png";

/// Open an image file as RGBA with its EXIF orientation applied.
///
/// The format is sniffed from the file contents, not the extension.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened and
/// [`Error::UnsupportedFileFormat`] if it does not decode as an image,
/// including files cut short in the middle of their data.
pub fn open_image(path: &Path) -> Result<RgbaImage> {
    let not_an_image = |e: ImageError| {
        tracing::debug!(path = %path.display(), error = %e, "decode failed");
        Error::UnsupportedFileFormat(path.to_path_buf())
    };

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let mut decoder = reader.into_decoder().map_err(not_an_image)?;
    let orientation = decoder.orientation().map_err(not_an_image)?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(not_an_image)?;
    img.apply_orientation(orientation);

    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        ?orientation,
        "loaded image"
    );
    Ok(img.into_rgba8())
}

/// Check if a path names a lossless format the output may be written in.
#[must_use]
pub fn is_lossless_output(path: &Path) -> bool {
    matches!(
        ImageFormat::from_path(path),
        Ok(ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff)
    )
}

/// Save an RGBA image losslessly, choosing the encoder from the extension.
///
/// The image is fully encoded in memory before the file is created, so a
/// failed encode never leaves a partial file behind.
///
/// # Errors
///
/// Returns [`Error::UnsupportedOutputFormat`] for lossy or unknown formats,
/// or an error if encoding or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| Error::UnsupportedOutputFormat(path.display().to_string()))?;
    if !is_lossless_output(path) {
        return Err(Error::UnsupportedOutputFormat(format!("{format:?}")));
    }

    let mut encoded = Vec::new();
    img.write_to(&mut Cursor::new(&mut encoded), format)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, encoded)?;

    tracing::debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}
