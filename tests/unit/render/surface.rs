use super::*;

fn test_font_bytes() -> Option<Vec<u8>> {
    let path = std::env::var("REELSMITH_FONT")
        .unwrap_or_else(|_| "tests/data/fonts/Inconsolata-Regular.ttf".to_string());
    std::fs::read(path).ok()
}

#[test]
fn rejects_oversized_and_empty_surfaces() {
    assert!(
        FrameSurface::new(Canvas {
            width: 70_000,
            height: 10
        })
        .is_err()
    );
    assert!(
        FrameSurface::new(Canvas {
            width: 0,
            height: 10
        })
        .is_err()
    );
    assert_eq!(FrameSurface::portrait().unwrap().canvas(), Canvas::PORTRAIT);
}

#[test]
fn measurement_falls_back_to_fixed_advance_without_font() {
    let mut surface = FrameSurface::portrait().unwrap();
    assert!(!surface.has_font());
    let w = surface.measure_text("abcd", 50.0);
    assert!((w - 4.0 * 50.0 * FALLBACK_ADVANCE_EM).abs() < 1e-4);
    assert!(surface.measure_text("", 48.0).abs() < f32::EPSILON);
}

#[test]
fn fingerprint_tracks_pixels() {
    let a = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 255, 4, 5, 6, 255],
        premultiplied: true,
    };
    let mut b = a.clone();
    assert_eq!(a.fingerprint(), b.fingerprint());
    b.data[0] = 9;
    assert_ne!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.pixel(1, 0), Some([4, 5, 6, 255]));
    assert_eq!(a.pixel(2, 0), None);
}

#[test]
fn image_paint_rejects_length_mismatch() {
    assert!(rgba_premul_to_image(&[0, 0, 0], 1, 1).is_err());
    assert!(rgba_premul_to_image(&[0, 0, 0, 255], 1, 1).is_ok());
}

#[test]
fn font_measurement_grows_with_text() {
    let Some(bytes) = test_font_bytes() else {
        return;
    };
    let font = CaptionFont::from_bytes(bytes).unwrap();
    assert!(!font.family_name().trim().is_empty());

    let mut surface = FrameSurface::portrait().unwrap().with_font(font);
    let short = surface.measure_text("Try", 48.0);
    let long = surface.measure_text("Try this today", 48.0);
    assert!(short > 0.0);
    assert!(long > short);
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(CaptionFont::from_bytes(vec![0u8; 16]).is_err());
}

#[test]
fn translucent_edges_finish_opaque() {
    let mut surface = FrameSurface::new(Canvas {
        width: 64,
        height: 64,
    })
    .unwrap();
    surface.begin();
    surface.fill_rect(
        kurbo::Rect::new(0.0, 0.0, 64.0, 64.0),
        Rgba8 {
            r: 20,
            g: 30,
            b: 90,
            a: 255,
        },
    );
    surface.fill_rect(
        kurbo::Rect::new(10.4, 12.3, 50.7, 40.6),
        Rgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 46,
        },
    );
    let frame = surface.finish();

    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
    assert_eq!(frame.pixel(0, 0), Some([20, 30, 90, 255]));
}
