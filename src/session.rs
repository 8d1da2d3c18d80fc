//! Step-by-step collection of the inputs for one watermarking run.
//!
//! A [`Session`] moves through four steps: load the base image, choose a
//! watermark (image or text, never both), choose a placement, then mark.
//! Each setter validates its own input so a failed step can simply be
//! retried.

use std::path::Path;

use image::RgbaImage;

use crate::compositor::{CompositedImage, Compositor};
use crate::error::{Error, Result};
use crate::image_io;
use crate::mark::{TextColor, WatermarkSource};
use crate::placement::Placement;

/// The inputs gathered so far.
#[derive(Debug, Default)]
pub struct Session {
    base: Option<RgbaImage>,
    mark: Option<WatermarkSource>,
    placement: Option<Placement>,
}

impl Session {
    /// An empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the base image from `path`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// See [`image_io::open_image`].
    pub fn load_base(&mut self, path: &Path) -> Result<()> {
        let img = image_io::open_image(path)?;
        self.set_base(img);
        Ok(())
    }

    /// Use an already decoded base image.
    pub fn set_base(&mut self, image: RgbaImage) {
        self.base = Some(image);
    }

    /// Load an image watermark from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WatermarkAlreadyChosen`] if a watermark was already
    /// set, or a load error from [`image_io::open_image`].
    pub fn load_watermark_image(&mut self, path: &Path) -> Result<()> {
        self.ensure_mark_unset()?;
        let img = image_io::open_image(path)?;
        self.set_watermark_image(img)
    }

    /// Use an already decoded image watermark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WatermarkAlreadyChosen`] if a watermark was already set.
    pub fn set_watermark_image(&mut self, image: RgbaImage) -> Result<()> {
        self.ensure_mark_unset()?;
        self.mark = Some(WatermarkSource::Image(image));
        Ok(())
    }

    /// Use a text watermark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyText`] if `text` is empty and
    /// [`Error::WatermarkAlreadyChosen`] if a watermark was already set.
    pub fn set_text(&mut self, text: &str, color: TextColor) -> Result<()> {
        self.ensure_mark_unset()?;
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        self.mark = Some(WatermarkSource::text(text, color));
        Ok(())
    }

    /// Choose where the watermark goes.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }

    /// Choose the placement by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPlacement`] for a blank name and
    /// [`Error::InvalidPlacement`] for an unknown one.
    pub fn set_placement_named(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::MissingPlacement);
        }
        self.set_placement(name.parse()?);
        Ok(())
    }

    /// The base image, if loaded.
    #[must_use]
    pub fn base(&self) -> Option<&RgbaImage> {
        self.base.as_ref()
    }

    /// The chosen watermark, if any.
    #[must_use]
    pub fn watermark(&self) -> Option<&WatermarkSource> {
        self.mark.as_ref()
    }

    /// The chosen placement, if any.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Composite the watermark once every input is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBaseImage`], [`Error::MissingWatermark`] or
    /// [`Error::MissingPlacement`] for the first missing input, otherwise
    /// any error from [`Compositor::compose`].
    pub fn mark(&self, compositor: &Compositor) -> Result<CompositedImage> {
        let base = self.base.as_ref().ok_or(Error::MissingBaseImage)?;
        let mark = self.mark.as_ref().ok_or(Error::MissingWatermark)?;
        let placement = self.placement.ok_or(Error::MissingPlacement)?;

        tracing::debug!(
            width = base.width(),
            height = base.height(),
            kind = mark.kind(),
            %placement,
            "marking image"
        );
        compositor.compose(base, mark, placement)
    }

    fn ensure_mark_unset(&self) -> Result<()> {
        if self.mark.is_some() {
            return Err(Error::WatermarkAlreadyChosen);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn base() -> RgbaImage {
        RgbaImage::from_pixel(200, 100, Rgba([50, 50, 50, 255]))
    }

    #[test]
    fn mark_reports_first_missing_input() {
        let compositor = Compositor::new();
        let mut session = Session::new();
        assert!(matches!(session.mark(&compositor), Err(Error::MissingBaseImage)));

        session.set_base(base());
        assert!(matches!(session.mark(&compositor), Err(Error::MissingWatermark)));

        session.set_watermark_image(RgbaImage::new(10, 10)).unwrap();
        assert!(matches!(session.mark(&compositor), Err(Error::MissingPlacement)));

        session.set_placement(Placement::BottomLeft);
        let out = session.mark(&compositor).unwrap();
        assert_eq!(out.dimensions(), (200, 100));
        assert_eq!(out.origin(), (20, 70));
    }

    #[test]
    fn watermark_choice_is_locked_once_made() {
        let mut session = Session::new();
        session.set_text("hello", TextColor::White).unwrap();
        assert!(matches!(
            session.set_watermark_image(RgbaImage::new(1, 1)),
            Err(Error::WatermarkAlreadyChosen)
        ));
        assert!(matches!(
            session.set_text("again", TextColor::Black),
            Err(Error::WatermarkAlreadyChosen)
        ));
        assert!(matches!(
            session.watermark(),
            Some(WatermarkSource::Text { content, .. }) if content == "hello"
        ));
    }

    #[test]
    fn empty_text_leaves_choice_open() {
        let mut session = Session::new();
        assert!(matches!(
            session.set_text("", TextColor::White),
            Err(Error::EmptyText)
        ));
        assert!(session.watermark().is_none());
        session.set_watermark_image(RgbaImage::new(2, 2)).unwrap();
    }

    #[test]
    fn placement_by_name() {
        let mut session = Session::new();
        assert!(matches!(
            session.set_placement_named("  "),
            Err(Error::MissingPlacement)
        ));
        assert!(matches!(
            session.set_placement_named("sideways"),
            Err(Error::InvalidPlacement(_))
        ));
        assert_eq!(session.placement(), None);

        session.set_placement_named("Top-Right").unwrap();
        assert_eq!(session.placement(), Some(Placement::TopRight));
    }

    #[test]
    fn failed_watermark_load_leaves_choice_open() {
        let mut session = Session::new();
        assert!(session
            .load_watermark_image(Path::new("/nonexistent/mark.png"))
            .is_err());
        assert!(session.watermark().is_none());
    }
}
