use crate::caption::segment::CaptionSegment;
use crate::caption::timing::{Timeline, TimelinePosition};
use crate::caption::wrap::{WrappedLines, wrap_words};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backdrop::{gradient_image, highlight_image};
use crate::render::surface::{FrameRGBA, FrameSurface};
use crate::script::presets::Palette;

/// Caption line size in pixels.
pub const CAPTION_SIZE_PX: f32 = 48.0;
/// Caption line advance in pixels.
pub const CAPTION_LINE_HEIGHT_PX: f64 = 60.0;
/// Segment label size in pixels.
pub const LABEL_SIZE_PX: f32 = 28.0;

/// Highlight band angular rate, radians per second.
const HIGHLIGHT_RATE: f64 = 2.5;
/// Highlight band vertical swing, pixels.
const HIGHLIGHT_AMPLITUDE: f64 = 12.0;

const PLATE_HEIGHT: f64 = 260.0;
const BAR_HEIGHT: f64 = 12.0;

/// Fixed caption layout resolved against a canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionLayout {
    /// Left edge of the caption text column.
    pub text_x: f64,
    /// Top of the first caption line.
    pub text_top: f64,
    /// Caption column width used for wrapping.
    pub column_width: f64,
    /// Dark caption plate.
    pub plate: kurbo::Rect,
    /// Sheen inset inside the plate.
    pub plate_sheen: kurbo::Rect,
    /// Full progress track.
    pub bar_track: kurbo::Rect,
    /// Top of the segment label.
    pub label_top: f64,
}

impl CaptionLayout {
    /// Resolve the layout for `canvas`.
    pub fn for_canvas(canvas: Canvas) -> Self {
        let (w, h) = (canvas.w(), canvas.h());
        let text_x = w * 0.09;
        let text_top = h * 0.58;
        let column_width = w * 0.82;
        let bar_y = h * 0.85;
        Self {
            text_x,
            text_top,
            column_width,
            plate: kurbo::Rect::from_origin_size(
                (text_x - 16.0, text_top - 96.0),
                (column_width + 32.0, PLATE_HEIGHT),
            ),
            plate_sheen: kurbo::Rect::from_origin_size(
                (text_x - 12.0, text_top - 92.0),
                (column_width + 24.0, PLATE_HEIGHT - 8.0),
            ),
            bar_track: kurbo::Rect::from_origin_size(
                (text_x - 16.0, bar_y),
                (column_width + 32.0, BAR_HEIGHT),
            ),
            label_top: h * 0.52,
        }
    }

    /// Progress fill for a `0.0..=1.0` progress ratio.
    pub fn bar_fill(&self, progress: f64) -> kurbo::Rect {
        let track = self.bar_track;
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        kurbo::Rect::new(track.x0, track.y0, track.x0 + track.width() * p, track.y1)
    }
}

struct Paints {
    canvas: Canvas,
    backdrops: Vec<vello_cpu::Image>,
    highlight: vello_cpu::Image,
}

/// Draws the caption scene for any instant of a run.
///
/// Holds the run's segments, palette and timeline. Paint images are built once per canvas size
/// and reused for every frame.
pub struct FrameCompositor {
    palette: &'static Palette,
    segments: Vec<CaptionSegment>,
    timeline: Timeline,
    paints: Option<Paints>,
}

impl FrameCompositor {
    /// Create a compositor for one run. `segments` must be non-empty.
    #[tracing::instrument(skip_all, fields(segments = segments.len(), audio_secs = audio_secs))]
    pub fn new(
        palette: &'static Palette,
        segments: Vec<CaptionSegment>,
        audio_secs: f64,
    ) -> ReelResult<Self> {
        if segments.is_empty() {
            return Err(ReelError::validation("caption segments must be non-empty"));
        }
        let timeline = Timeline::new(audio_secs, segments.len());
        Ok(Self {
            palette,
            segments,
            timeline,
            paints: None,
        })
    }

    /// Timeline the compositor schedules against.
    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    /// Caption segments in display order.
    pub fn segments(&self) -> &[CaptionSegment] {
        &self.segments
    }

    /// Palette used for the backdrop and accents.
    pub fn palette(&self) -> &'static Palette {
        self.palette
    }

    fn paints_for(&mut self, canvas: Canvas) -> ReelResult<&Paints> {
        let stale = self.paints.as_ref().is_none_or(|p| p.canvas != canvas);
        if stale {
            let gradient = gradient_image(canvas, self.palette.stops)?;
            self.paints = Some(Paints {
                canvas,
                backdrops: vec![gradient; self.segments.len()],
                highlight: highlight_image(canvas)?,
            });
        }
        self.paints
            .as_ref()
            .ok_or_else(|| ReelError::evaluation("compositor paints missing"))
    }

    /// Wrap the caption of segment `index` for `surface`.
    pub fn wrap_segment(&self, surface: &mut FrameSurface, index: usize) -> WrappedLines {
        let layout = CaptionLayout::for_canvas(surface.canvas());
        let text = self
            .segments
            .get(index.min(self.segments.len() - 1))
            .map(CaptionSegment::as_str)
            .unwrap_or_default();
        wrap_words(text, layout.column_width as f32, |s| {
            surface.measure_text(s, CAPTION_SIZE_PX)
        })
    }

    /// Draw the frame at `elapsed` seconds since the run's time origin.
    pub fn compose(&mut self, surface: &mut FrameSurface, elapsed: f64) -> ReelResult<FrameRGBA> {
        let canvas = surface.canvas();
        let TimelinePosition { index, progress } = self.timeline.position(elapsed);
        let layout = CaptionLayout::for_canvas(canvas);
        let lines = self.wrap_segment(surface, index);
        let accent = self.palette.accent;
        let segment_count = self.segments.len();
        let paints = self.paints_for(canvas)?;

        let full = kurbo::Rect::new(0.0, 0.0, canvas.w(), canvas.h());
        surface.begin();

        surface.fill_image(full, kurbo::Vec2::ZERO, &paints.backdrops[index]);

        let swing = if elapsed.is_finite() {
            (elapsed * HIGHLIGHT_RATE).sin() * HIGHLIGHT_AMPLITUDE
        } else {
            0.0
        };
        surface.fill_image(
            full.inflate(0.0, HIGHLIGHT_AMPLITUDE),
            kurbo::Vec2::new(0.0, swing),
            &paints.highlight,
        );

        surface.fill_rect(layout.plate, Rgba8::rgba(0, 0, 0, 0.45));
        surface.fill_rect(layout.plate_sheen, Rgba8::rgba(255, 255, 255, 0.08));

        for (i, line) in lines.iter().enumerate() {
            let y = layout.text_top + CAPTION_LINE_HEIGHT_PX * i as f64;
            surface.draw_text(
                line,
                kurbo::Point::new(layout.text_x, y),
                CAPTION_SIZE_PX,
                accent,
            );
        }

        surface.fill_rect(layout.bar_track, Rgba8::rgba(255, 255, 255, 0.24));
        surface.fill_rect(layout.bar_fill(progress), accent);

        let label = format!("Segment {}/{}", index + 1, segment_count);
        surface.draw_text(
            &label,
            kurbo::Point::new(layout.text_x, layout.label_top),
            LABEL_SIZE_PX,
            Rgba8::rgba(255, 255, 255, 0.12),
        );

        Ok(surface.finish())
    }

    /// First frame of the run.
    pub fn poster(&mut self, surface: &mut FrameSurface) -> ReelResult<FrameRGBA> {
        self.compose(surface, 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
