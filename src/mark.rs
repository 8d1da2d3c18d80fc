//! Watermark sources and their preparation before compositing.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::blending;
use crate::error::Error;

/// Alpha applied to every pixel of an image watermark (about 12.5%).
pub const IMAGE_MARK_ALPHA: u8 = 32;

/// Alpha of the fill used for text watermarks (25%).
pub const TEXT_MARK_ALPHA: u8 = 64;

/// Fill color of a text watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextColor {
    /// White text.
    #[default]
    White,
    /// Black text.
    Black,
}

impl TextColor {
    /// The fill as RGBA, at [`TEXT_MARK_ALPHA`].
    #[must_use]
    pub fn fill(self) -> Rgba<u8> {
        match self {
            TextColor::White => Rgba([255, 255, 255, TEXT_MARK_ALPHA]),
            TextColor::Black => Rgba([0, 0, 0, TEXT_MARK_ALPHA]),
        }
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextColor::White => f.write_str("white"),
            TextColor::Black => f.write_str("black"),
        }
    }
}

impl FromStr for TextColor {
    type Err = Error;

    /// Accepts `white`/`black`, optionally followed by ` text`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let name = lower.strip_suffix(" text").unwrap_or(&lower);
        match name {
            "white" => Ok(TextColor::White),
            "black" => Ok(TextColor::Black),
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }
}

/// The watermark to apply: exactly one of an image or a line of text.
#[derive(Clone)]
pub enum WatermarkSource {
    /// A decoded watermark raster.
    Image(RgbaImage),
    /// Text drawn in the chosen color.
    Text {
        /// The text to draw.
        content: String,
        /// Fill color.
        color: TextColor,
    },
}

impl WatermarkSource {
    /// Text watermark in `color`.
    pub fn text(content: impl Into<String>, color: TextColor) -> Self {
        WatermarkSource::Text {
            content: content.into(),
            color,
        }
    }

    /// Short name of the active variant, for logs and messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            WatermarkSource::Image(_) => "image",
            WatermarkSource::Text { .. } => "text",
        }
    }
}

impl fmt::Debug for WatermarkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatermarkSource::Image(img) => f
                .debug_struct("Image")
                .field("dimensions", &img.dimensions())
                .finish(),
            WatermarkSource::Text { content, color } => f
                .debug_struct("Text")
                .field("content", content)
                .field("color", color)
                .finish(),
        }
    }
}

/// Size of a `width`x`height` raster shrunk to fit inside `max_w`x`max_h`.
///
/// Aspect ratio is preserved, sides are never enlarged and never drop below 1.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let (max_w, max_h) = (max_w.max(1), max_h.max(1));
    if width <= max_w && height <= max_h {
        return (width, height);
    }

    let scale = (f64::from(max_w) / f64::from(width)).min(f64::from(max_h) / f64::from(height));
    let w = (f64::from(width) * scale).round() as u32;
    let h = (f64::from(height) * scale).round() as u32;
    (w.clamp(1, max_w), h.clamp(1, max_h))
}

/// Prepare an image watermark for a `base_w`x`base_h` base.
///
/// Shrinks it to at most a quarter of the base on each axis, then sets every
/// pixel's alpha to [`IMAGE_MARK_ALPHA`].
#[must_use]
pub fn prepare_image_mark(mark: &RgbaImage, base_w: u32, base_h: u32) -> RgbaImage {
    let (w, h) = fit_within(mark.width(), mark.height(), base_w / 4, base_h / 4);

    let mut prepared = if (w, h) == mark.dimensions() {
        mark.clone()
    } else {
        tracing::debug!(
            from = ?mark.dimensions(),
            to = ?(w, h),
            "downscaling image watermark"
        );
        imageops::resize(mark, w, h, FilterType::CatmullRom)
    };

    blending::set_alpha(&mut prepared, IMAGE_MARK_ALPHA);
    prepared
}
