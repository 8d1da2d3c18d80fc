//! Core watermark compositor.

use std::path::Path;

use ab_glyph::FontVec;
use image::RgbaImage;

use crate::blending;
use crate::error::{Error, Result};
use crate::image_io;
use crate::mark::{self, WatermarkSource};
use crate::placement::Placement;
use crate::text;

/// The write-once result of compositing a watermark onto a base image.
#[derive(Debug, Clone)]
pub struct CompositedImage {
    image: RgbaImage,
    placement: Placement,
    origin: (i64, i64),
    mark_size: (u32, u32),
}

impl CompositedImage {
    /// The composited raster, same dimensions as the base.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width and height of the composited raster.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Placement the watermark was anchored at.
    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Top-left corner of the watermark on the base. May be negative when
    /// the watermark did not fit.
    #[must_use]
    pub fn origin(&self) -> (i64, i64) {
        self.origin
    }

    /// Size of the watermark as applied (after any downscaling).
    #[must_use]
    pub fn mark_size(&self) -> (u32, u32) {
        self.mark_size
    }

    /// Consume the result, returning the raster.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the result losslessly to `path`.
    ///
    /// # Errors
    ///
    /// See [`image_io::save_image`].
    pub fn save(&self, path: &Path) -> Result<()> {
        image_io::save_image(&self.image, path)
    }
}

/// The compositor, holding the font used for text watermarks.
///
/// Create once and reuse; compositing never mutates the compositor or
/// its inputs.
#[derive(Default)]
pub struct Compositor {
    font: Option<FontVec>,
}

impl Compositor {
    /// A compositor with no font. Image watermarks work; text fails with
    /// [`Error::FontUnavailable`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A compositor that renders text with `font`.
    #[must_use]
    pub fn with_font(font: FontVec) -> Self {
        Self { font: Some(font) }
    }

    /// A compositor using the font resolved by [`text::resolve_font`].
    ///
    /// A missing system font is not an error here; only a configured font
    /// that fails to load is.
    ///
    /// # Errors
    ///
    /// Returns an error if `font_path` (or `MARK_FONT`) cannot be loaded.
    pub fn from_font_path(font_path: Option<&Path>) -> Result<Self> {
        Ok(Self {
            font: text::resolve_font(font_path)?,
        })
    }

    /// Whether text watermarks can be rendered.
    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Composite `mark` onto a copy of `base` at `placement`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyText`] for a text mark with no content and
    /// [`Error::FontUnavailable`] for a text mark when no font is loaded.
    pub fn compose(
        &self,
        base: &RgbaImage,
        mark: &WatermarkSource,
        placement: Placement,
    ) -> Result<CompositedImage> {
        let (width, height) = base.dimensions();
        let mut output = base.clone();

        let (origin, mark_size) = match mark {
            WatermarkSource::Text { content, color } => {
                if content.is_empty() {
                    return Err(Error::EmptyText);
                }
                let font = self.font.as_ref().ok_or(Error::FontUnavailable)?;

                let size = text::font_size_for(width, height);
                let (mark_w, mark_h) = text::measure_text(font, content, size);
                let (x, y) = placement.origin(width, height, mark_w, mark_h);
                tracing::debug!(size, mark_w, mark_h, x, y, %placement, "placing text watermark");

                let mut overlay = RgbaImage::new(width, height);
                text::draw_text(&mut overlay, font, content, size, x, y, color.fill());
                blending::alpha_composite(&mut output, &overlay);
                ((x, y), (mark_w, mark_h))
            }
            WatermarkSource::Image(raster) => {
                let prepared = mark::prepare_image_mark(raster, width, height);
                let (mark_w, mark_h) = prepared.dimensions();
                let (x, y) = placement.origin(width, height, mark_w, mark_h);
                tracing::debug!(mark_w, mark_h, x, y, %placement, "placing image watermark");

                blending::paste_masked(&mut output, &prepared, x, y);
                ((x, y), (mark_w, mark_h))
            }
        };

        Ok(CompositedImage {
            image: output,
            placement,
            origin,
            mark_size,
        })
    }

    /// Like [`Compositor::compose`], with the placement given by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlacement`] if `placement` is not a known
    /// position, otherwise as [`Compositor::compose`].
    pub fn compose_named(
        &self,
        base: &RgbaImage,
        mark: &WatermarkSource,
        placement: &str,
    ) -> Result<CompositedImage> {
        let placement = placement.parse::<Placement>()?;
        self.compose(base, mark, placement)
    }
}
