use std::path::Path;
use std::sync::Once;

use image::{Rgba, RgbaImage};
use make_your_mark::image_io::{self, DEFAULT_OUTPUT_FILE};
use make_your_mark::{text, Compositor, Error, Placement, Session, TextColor, WatermarkSource};

fn write_png(path: &Path, img: &RgbaImage) {
    img.save(path).unwrap();
}

/// Compositor with a font, or `None` when no font is installed.
///
/// Panics if `MARK_FONT` is set but unusable, so CI can force the text
/// scenarios to run instead of passing silently.
fn system_compositor() -> Option<Compositor> {
    static NOTICE: Once = Once::new();

    match text::resolve_font(None) {
        Ok(Some(font)) => Some(Compositor::with_font(font)),
        Ok(None) => {
            NOTICE.call_once(|| {
                eprintln!("no system font installed; set {} to run text tests", text::FONT_ENV_VAR);
            });
            None
        }
        Err(e) => panic!("{} is set but the font could not be loaded: {e}", text::FONT_ENV_VAR),
    }
}

#[test]
fn image_watermark_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.png");
    let mark_path = dir.path().join("logo.png");
    let out_path = dir.path().join(DEFAULT_OUTPUT_FILE);

    write_png(&base_path, &RgbaImage::from_pixel(400, 400, Rgba([0, 0, 0, 255])));
    write_png(&mark_path, &RgbaImage::from_pixel(300, 300, Rgba([255, 255, 255, 255])));

    let compositor = Compositor::new();
    let mut session = Session::new();
    session.load_base(&base_path).unwrap();
    session.load_watermark_image(&mark_path).unwrap();
    session.set_placement_named("Top-Right").unwrap();

    let marked = session.mark(&compositor).unwrap();
    assert_eq!(marked.mark_size(), (100, 100));
    assert_eq!(marked.origin(), (280, 20));
    marked.save(&out_path).unwrap();

    let saved = image_io::open_image(&out_path).unwrap();
    assert_eq!(saved.dimensions(), (400, 400));
    assert_eq!(*saved.get_pixel(280, 20), Rgba([32, 32, 32, 227]));
    assert_eq!(*saved.get_pixel(379, 119), Rgba([32, 32, 32, 227]));
    assert_eq!(*saved.get_pixel(279, 20), Rgba([0, 0, 0, 255]));
    assert_eq!(*saved.get_pixel(380, 20), Rgba([0, 0, 0, 255]));
    assert_eq!(*saved.get_pixel(280, 120), Rgba([0, 0, 0, 255]));
}

#[test]
fn non_image_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.txt");
    std::fs::write(&path, "plain text").unwrap();

    let mut session = Session::new();
    assert!(matches!(
        session.load_base(&path),
        Err(Error::UnsupportedFileFormat(_))
    ));
    assert!(session.base().is_none());
}

#[test]
fn empty_text_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join(DEFAULT_OUTPUT_FILE);

    let mut session = Session::new();
    session.set_base(RgbaImage::from_pixel(50, 50, Rgba([9, 9, 9, 255])));
    assert!(matches!(
        session.set_text("", TextColor::White),
        Err(Error::EmptyText)
    ));
    session.set_placement(Placement::Center);

    let result = session.mark(&Compositor::new());
    assert!(matches!(result, Err(Error::MissingWatermark)));
    assert!(!out_path.exists());

    // The compositor defends against empty text on its own too
    let direct = Compositor::new().compose(
        session.base().unwrap(),
        &WatermarkSource::text("", TextColor::Black),
        Placement::Center,
    );
    assert!(matches!(direct, Err(Error::EmptyText)));
}

#[test]
fn unknown_placement_string_is_invalid() {
    let base = RgbaImage::new(64, 64);
    let mark = WatermarkSource::Image(RgbaImage::new(4, 4));
    let result = Compositor::new().compose_named(&base, &mark, "Upper-Middle");
    assert!(matches!(result, Err(Error::InvalidPlacement(_))));
}

#[test]
fn lossy_output_path_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("marked.jpg");

    let base = RgbaImage::from_pixel(64, 64, Rgba([1, 1, 1, 255]));
    let mark = WatermarkSource::Image(RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])));
    let marked = Compositor::new()
        .compose(&base, &mark, Placement::BottomRight)
        .unwrap();

    assert!(matches!(
        marked.save(&out_path),
        Err(Error::UnsupportedOutputFormat(_))
    ));
    assert!(!out_path.exists());
}

#[test]
fn text_watermark_centered_on_large_base() {
    let Some(compositor) = system_compositor() else {
        return;
    };
    let base = RgbaImage::from_pixel(1000, 800, Rgba([20, 40, 60, 255]));
    let mark = WatermarkSource::text("TEST", TextColor::White);

    let marked = compositor.compose(&base, &mark, Placement::Center).unwrap();
    let (mw, mh) = marked.mark_size();
    let (x, y) = marked.origin();
    let expected_x = 500.0 - f64::from(mw) / 2.0;
    let expected_y = 400.0 - f64::from(mh) / 2.0;
    #[allow(clippy::cast_precision_loss)]
    {
        assert!((x as f64 - expected_x).abs() <= 1.0, "x={x} expected ~{expected_x}");
        assert!((y as f64 - expected_y).abs() <= 1.0, "y={y} expected ~{expected_y}");
    }

    // Every changed pixel lies inside the measured line box (with slack for
    // glyph overhang) and stays opaque.
    for (px, py, p) in marked.image().enumerate_pixels() {
        if p != base.get_pixel(px, py) {
            assert_eq!(p[3], 255);
            let (px, py) = (i64::from(px), i64::from(py));
            assert!(px >= x - 10 && px <= x + i64::from(mw) + 10);
            assert!(py >= y - 10 && py <= y + i64::from(mh) + 10);
        }
    }
}

#[test]
fn text_watermark_is_repeatable() {
    let Some(compositor) = system_compositor() else {
        return;
    };
    let base = RgbaImage::from_pixel(300, 200, Rgba([200, 200, 200, 255]));
    let mark = WatermarkSource::text("Make your mark", TextColor::Black);

    for placement in Placement::ALL {
        let a = compositor.compose(&base, &mark, placement).unwrap();
        let b = compositor.compose(&base, &mark, placement).unwrap();
        assert_eq!(a.image(), b.image());
        assert_eq!(a.dimensions(), base.dimensions());
    }
}
