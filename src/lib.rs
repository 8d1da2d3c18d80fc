//! Stamp a semi-transparent watermark onto a photo.
//!
//! The watermark is either an image, shrunk to at most a quarter of the base
//! and applied at 12.5% opacity, or a line of white or black text drawn at
//! 25% opacity with a font sized to the base. It is anchored at one of five
//! positions: the center or a corner, 20px in from the edges.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use make_your_mark::{image_io, Compositor, Placement, WatermarkSource};
//!
//! let compositor = Compositor::new();
//! let base = image_io::open_image(Path::new("photo.jpg")).unwrap();
//! let logo = image_io::open_image(Path::new("logo.png")).unwrap();
//! let marked = compositor
//!     .compose(&base, &WatermarkSource::Image(logo), Placement::BottomRight)
//!     .unwrap();
//! marked.save(Path::new("watermarked_image.png")).unwrap();
//! ```
//!
//! # Text watermarks
//!
//! Text needs a font file. [`Compositor::from_font_path`] takes an explicit
//! path, falls back to the `MARK_FONT` environment variable, then searches
//! common system font locations.
//!
//! ```no_run
//! use make_your_mark::{Compositor, Placement, Session, TextColor};
//!
//! let compositor = Compositor::from_font_path(None).expect("failed to load font");
//! let mut session = Session::new();
//! session.load_base("photo.jpg".as_ref()).unwrap();
//! session.set_text("(c) 2026", TextColor::White).unwrap();
//! session.set_placement(Placement::Center);
//! let marked = session.mark(&compositor).unwrap();
//! println!("mark placed at {:?}", marked.origin());
//! ```

#![deny(missing_docs)]

pub mod blending;
mod compositor;
pub mod error;
pub mod image_io;
mod mark;
mod placement;
mod session;
pub mod text;

pub use compositor::{CompositedImage, Compositor};
pub use error::{Error, Result};
pub use mark::{
    fit_within, prepare_image_mark, TextColor, WatermarkSource, IMAGE_MARK_ALPHA, TEXT_MARK_ALPHA,
};
pub use placement::{Placement, MARGIN};
pub use session::Session;
