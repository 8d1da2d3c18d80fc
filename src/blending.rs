//! Alpha blending math for applying watermarks.
//!
//! Two operations are used:
//! - `alpha_composite`: straight-alpha Porter-Duff "over" of a full-size overlay.
//! - `paste_masked`: paste a smaller raster at an offset, weighted by its own alpha.

use image::{Rgba, RgbaImage};

/// Set the alpha of every pixel to `alpha`, discarding the previous alpha channel.
pub fn set_alpha(image: &mut RgbaImage, alpha: u8) {
    for px in image.pixels_mut() {
        px[3] = alpha;
    }
}

/// Porter-Duff "over" for two straight-alpha pixels.
///
/// `out_a = fg_a + bg_a * (1 - fg_a)`,
/// `out_c = (fg_c * fg_a + bg_c * bg_a * (1 - fg_a)) / out_a`.
#[must_use]
pub fn over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = f32::from(foreground[3]) / 255.0;
    let bg_alpha = f32::from(background[3]) / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |fg: u8, bg: u8| -> u8 {
        let value = (f32::from(fg) * fg_alpha + f32::from(bg) * bg_alpha * (1.0 - fg_alpha))
            / out_alpha;
        to_u8(value)
    };

    Rgba([
        channel(foreground[0], background[0]),
        channel(foreground[1], background[1]),
        channel(foreground[2], background[2]),
        to_u8(out_alpha * 255.0),
    ])
}

/// Composite a same-size `overlay` onto `base` in place.
///
/// # Panics
///
/// Panics if the two images differ in dimensions.
pub fn alpha_composite(base: &mut RgbaImage, overlay: &RgbaImage) {
    assert_eq!(
        base.dimensions(),
        overlay.dimensions(),
        "overlay must match base dimensions"
    );

    for (dst, src) in base.pixels_mut().zip(overlay.pixels()) {
        // Fully transparent overlay pixels leave the base untouched.
        if src[3] == 0 {
            continue;
        }
        *dst = over(*dst, *src);
    }
}

/// Paste `mark` onto `base` with its top-left corner at `(x, y)`.
///
/// All four channels, alpha included, are mixed by the mark's alpha:
/// `out = m * a + b * (1 - a)`. An opaque base therefore turns partly
/// translucent under a translucent mark. The footprint is clipped to the
/// base; negative offsets are allowed.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn paste_masked(base: &mut RgbaImage, mark: &RgbaImage, x: i64, y: i64) {
    let base_w = i64::from(base.width());
    let base_h = i64::from(base.height());

    // Clip to image bounds
    let x1 = x.max(0);
    let y1 = y.max(0);
    let x2 = (x + i64::from(mark.width())).min(base_w);
    let y2 = (y + i64::from(mark.height())).min(base_h);

    if x1 >= x2 || y1 >= y2 {
        return;
    }

    for by in y1..y2 {
        for bx in x1..x2 {
            let src = *mark.get_pixel((bx - x) as u32, (by - y) as u32);
            if src[3] == 0 {
                continue;
            }
            let alpha = f32::from(src[3]) / 255.0;

            let dst = base.get_pixel_mut(bx as u32, by as u32);
            for (d, s) in dst.0.iter_mut().zip(src.0) {
                *d = to_u8(f32::from(s) * alpha + f32::from(*d) * (1.0 - alpha));
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
