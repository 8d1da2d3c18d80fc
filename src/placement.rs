//! Watermark anchor positions and the fixed-margin placement rule.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Distance in pixels between the watermark and the nearest image edges.
pub const MARGIN: u32 = 20;

/// One of the five fixed anchor positions for a watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Centered on both axes.
    Center,
    /// `MARGIN` pixels from the top and left edges.
    TopLeft,
    /// `MARGIN` pixels from the top and right edges.
    TopRight,
    /// `MARGIN` pixels from the bottom and left edges.
    BottomLeft,
    /// `MARGIN` pixels from the bottom and right edges.
    BottomRight,
}

impl Placement {
    /// All placements, in the order they are offered to the user.
    pub const ALL: [Placement; 5] = [
        Placement::Center,
        Placement::TopLeft,
        Placement::TopRight,
        Placement::BottomLeft,
        Placement::BottomRight,
    ];

    /// Human-readable label, matching the names accepted by [`FromStr`].
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Placement::Center => "Center",
            Placement::TopLeft => "Top-Left",
            Placement::TopRight => "Top-Right",
            Placement::BottomLeft => "Bottom-Left",
            Placement::BottomRight => "Bottom-Right",
        }
    }

    /// Top-left corner of a `mark_w`x`mark_h` watermark on an `img_w`x`img_h` image.
    ///
    /// Centered coordinates are computed in floating point and truncated toward
    /// zero. The result is negative when the watermark (plus margin) does not fit.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn origin(self, img_w: u32, img_h: u32, mark_w: u32, mark_h: u32) -> (i64, i64) {
        let (w, h) = (i64::from(img_w), i64::from(img_h));
        let (mw, mh) = (i64::from(mark_w), i64::from(mark_h));
        let m = i64::from(MARGIN);

        match self {
            Placement::Center => {
                let x = f64::from(img_w) / 2.0 - f64::from(mark_w) / 2.0;
                let y = f64::from(img_h) / 2.0 - f64::from(mark_h) / 2.0;
                (x.trunc() as i64, y.trunc() as i64)
            }
            Placement::TopLeft => (m, m),
            Placement::TopRight => (w - mw - m, m),
            Placement::BottomLeft => (m, h - mh - m),
            Placement::BottomRight => (w - mw - m, h - mh - m),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Placement {
    type Err = Error;

    /// Accepts the labels (`"Top-Left"`) and the usual spellings
    /// (`top-left`, `top_left`, `topleft`, `top left`) in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "center" | "centre" => Ok(Placement::Center),
            "topleft" => Ok(Placement::TopLeft),
            "topright" => Ok(Placement::TopRight),
            "bottomleft" => Ok(Placement::BottomLeft),
            "bottomright" => Ok(Placement::BottomRight),
            _ => Err(Error::InvalidPlacement(s.to_string())),
        }
    }
}
