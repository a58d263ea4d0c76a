use super::*;
use crate::caption::segment::segment_narration;
use crate::script::presets::PaletteId;

fn compositor(audio_secs: f64) -> FrameCompositor {
    let segments = segment_narration("First line here. Second one now! Third and last?");
    FrameCompositor::new(PaletteId::Violet.palette(), segments, audio_secs).unwrap()
}

#[test]
fn rejects_empty_segments() {
    assert!(FrameCompositor::new(PaletteId::Aqua.palette(), Vec::new(), 3.0).is_err());
}

#[test]
fn layout_matches_portrait_geometry() {
    let l = CaptionLayout::for_canvas(Canvas::PORTRAIT);
    assert!((l.text_x - 64.8).abs() < 1e-9);
    assert!((l.text_top - 742.4).abs() < 1e-9);
    assert!((l.column_width - 590.4).abs() < 1e-9);
    assert!((l.plate.width() - 622.4).abs() < 1e-9);
    assert!((l.plate.height() - 260.0).abs() < 1e-9);
    assert!((l.bar_track.y0 - 1088.0).abs() < 1e-9);
    assert!((l.bar_fill(0.5).width() - 311.2).abs() < 1e-9);
    assert!(l.bar_fill(f64::NAN).width().abs() < 1e-9);
}

#[test]
fn frames_are_opaque_and_reproducible() {
    let mut surface = FrameSurface::portrait().unwrap();
    let mut a = compositor(9.4);
    let mut b = compositor(9.4);

    let fa = a.compose(&mut surface, 4.2).unwrap();
    let fb = b.compose(&mut surface, 4.2).unwrap();
    assert_eq!(fa.width, 720);
    assert_eq!(fa.height, 1280);
    assert_eq!(fa.fingerprint(), fb.fingerprint());
    assert!(fa.data.chunks_exact(4).all(|px| px[3] == 255));

    let again = a.compose(&mut surface, 4.2).unwrap();
    assert_eq!(fa, again);
}

#[test]
fn progress_bar_fills_with_accent() {
    let mut surface = FrameSurface::portrait().unwrap();
    let mut c = compositor(9.4);
    let accent = PaletteId::Violet.palette().accent;

    let end = c.compose(&mut surface, 10.0).unwrap();
    assert_eq!(end.pixel(100, 1094), Some([accent.r, accent.g, accent.b, 255]));

    let start = c.poster(&mut surface).unwrap();
    assert_ne!(start.pixel(100, 1094), Some([accent.r, accent.g, accent.b, 255]));
    assert_ne!(start.fingerprint(), end.fingerprint());
}

#[test]
fn caption_plate_darkens_the_backdrop() {
    let mut surface = FrameSurface::portrait().unwrap();
    let mut c = compositor(2.0);
    let frame = c.poster(&mut surface).unwrap();

    let luma = |p: [u8; 4]| u32::from(p[0]) + u32::from(p[1]) + u32::from(p[2]);
    let outside = frame.pixel(360, 630).unwrap();
    let inside = frame.pixel(360, 660).unwrap();
    assert!(luma(inside) < luma(outside));
}

#[test]
fn wraps_the_active_segment_against_the_column() {
    let mut surface = FrameSurface::portrait().unwrap();
    let long = "word ".repeat(40);
    let c = FrameCompositor::new(
        PaletteId::Sunrise.palette(),
        segment_narration(&long),
        1.0,
    )
    .unwrap();
    let lines = c.wrap_segment(&mut surface, 0);
    assert!(lines.len() > 1);
    let column = CaptionLayout::for_canvas(surface.canvas()).column_width as f32;
    for line in &lines[..lines.len() - 1] {
        assert!(surface.measure_text(line, CAPTION_SIZE_PX) <= column);
    }
}
