//! Text watermark rendering.
//!
//! Fonts are loaded from disk at runtime: either an explicit path or the first
//! hit from a list of common system font locations. Text is drawn with
//! [`ab_glyph`] into a transparent overlay the size of the base image.

use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Environment variable naming a font file to use for text watermarks.
pub const FONT_ENV_VAR: &str = "MARK_FONT";

/// Font files tried, in order, when no font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a TrueType/OpenType font from `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::FontLoad`]
/// if it is not a parseable font.
pub fn load_font(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path)?;
    let font = FontVec::try_from_vec(data).map_err(|_| Error::FontLoad(path.to_path_buf()))?;
    tracing::debug!(path = %path.display(), "loaded font");
    Ok(font)
}

/// First existing file among the well-known system font locations.
#[must_use]
pub fn find_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Resolve the font for text watermarks.
///
/// Uses `explicit` if given, then `MARK_FONT`, then [`find_system_font`].
/// Returns `Ok(None)` when nothing is configured and nothing is installed;
/// that only becomes an error once a text watermark is actually composited.
///
/// # Errors
///
/// Returns an error if a configured font path cannot be loaded.
pub fn resolve_font(explicit: Option<&Path>) -> Result<Option<FontVec>> {
    if let Some(path) = explicit {
        return load_font(path).map(Some);
    }
    if let Some(path) = std::env::var_os(FONT_ENV_VAR).filter(|v| !v.is_empty()) {
        return load_font(Path::new(&path)).map(Some);
    }
    match find_system_font() {
        Some(path) => load_font(&path).map(Some),
        None => {
            tracing::debug!("no system font found");
            Ok(None)
        }
    }
}

/// Font size for a text watermark on a `width`x`height` image.
///
/// `floor((width + height) / 2 / 12)`, never below 1.
#[must_use]
pub fn font_size_for(width: u32, height: u32) -> u32 {
    let avg = (u64::from(width) + u64::from(height)) / 2;
    u32::try_from(avg / 12).unwrap_or(u32::MAX).max(1)
}

/// Pixel scale for a nominal font size, treating the size as the em height.
fn scale_for<F: Font>(font: &F, size: u32) -> PxScale {
    #[allow(clippy::cast_precision_loss)]
    let size = size as f32;
    font.pt_to_px_scale(size).unwrap_or_else(|| PxScale::from(size))
}

/// Width and height of the line box `text` occupies at `size`.
///
/// Width is the sum of advances plus kerning; height is ascent minus descent.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn measure_text<F: Font>(font: &F, text: &str, size: u32) -> (u32, u32) {
    let scaled = font.as_scaled(scale_for(font, size));

    let mut width = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    let height = scaled.ascent() - scaled.descent();
    (width.max(0.0).ceil() as u32, height.max(0.0).ceil() as u32)
}

/// Draw `text` into `canvas` with the top of its line box at `(x, y)`.
///
/// Glyph coverage scales the alpha of `color`; where glyphs overlap the
/// stronger coverage wins. Pixels outside the canvas are dropped.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn draw_text<F: Font>(
    canvas: &mut RgbaImage,
    font: &F,
    text: &str,
    size: u32,
    x: i64,
    y: i64,
    color: Rgba<u8>,
) {
    let scale = scale_for(font, size);
    let scaled = font.as_scaled(scale);
    let (canvas_w, canvas_h) = (i64::from(canvas.width()), i64::from(canvas.height()));

    let baseline_y = y as f32 + scaled.ascent();
    let mut cursor_x = x as f32;
    let mut prev: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            cursor_x += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(scale, point(cursor_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);

            outlined.draw(|gx, gy, coverage| {
                let px = left + i64::from(gx);
                let py = top + i64::from(gy);
                if px < 0 || py < 0 || px >= canvas_w || py >= canvas_h {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color[3])).round() as u8;
                let dst = canvas.get_pixel_mut(px as u32, py as u32);
                if alpha > dst[3] {
                    *dst = Rgba([color[0], color[1], color[2], alpha]);
                }
            });
        }

        cursor_x += scaled.h_advance(id);
        prev = Some(id);
    }
}

/// Font for tests that render text.
///
/// A configured `MARK_FONT` that fails to load panics, so CI can force the
/// text tests to run. With nothing configured and no system font installed
/// the caller skips; the notice is printed once per test binary.
#[cfg(test)]
pub(crate) fn test_font() -> Option<FontVec> {
    static NOTICE: std::sync::Once = std::sync::Once::new();

    match resolve_font(None) {
        Ok(Some(font)) => Some(font),
        Ok(None) => {
            NOTICE.call_once(|| {
                eprintln!("no system font installed; set {FONT_ENV_VAR} to run text tests");
            });
            None
        }
        Err(e) => panic!("{FONT_ENV_VAR} is set but the font could not be loaded: {e}"),
    }
}
