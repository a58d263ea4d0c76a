use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};

/// Advance used to estimate text width when no caption font is loaded, as a fraction of the
/// font size.
const FALLBACK_ADVANCE_EM: f32 = 0.56;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. Frames from a [`FrameSurface`] are flattened over black
/// and fully opaque, so the bytes are also valid straight-alpha RGBA.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Stable 64-bit fingerprint of the frame size and pixels.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = xxhash_rust::xxh3::Xxh3::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(&self.data);
        hasher.digest()
    }

    /// Read one pixel as `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Caption typeface: Parley shaping contexts plus the raw font for glyph rasterization.
///
/// Only one face is registered; pass a bold face for captions.
pub struct CaptionFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl CaptionFont {
    /// Register a font from raw TTF/OTF bytes.
    pub fn from_bytes(font_bytes: Vec<u8>) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Read and register a font file.
    pub fn load(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read caption font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Family name reported by the registered face.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Advance width of `text` set on one line at `size_px`.
    pub fn measure(&mut self, text: &str, size_px: f32) -> f32 {
        self.layout_line(text, size_px, TextBrushRgba8::default())
            .width()
    }
}

/// Owned drawing surface for one generation run.
///
/// Holds the `vello_cpu` render context, the output pixmap and the optional caption font. The
/// compositor draws through this handle only.
pub struct FrameSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    font: Option<CaptionFont>,
}

impl FrameSurface {
    /// Create a surface of the given size without a caption font.
    pub fn new(canvas: Canvas) -> ReelResult<Self> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ReelError::validation("surface width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ReelError::validation("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ReelError::validation("surface width/height must be non-zero"));
        }
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            font: None,
        })
    }

    /// Create the fixed 720x1280 portrait surface.
    pub fn portrait() -> ReelResult<Self> {
        Self::new(Canvas::PORTRAIT)
    }

    /// Attach a caption font.
    pub fn with_font(mut self, font: CaptionFont) -> Self {
        self.font = Some(font);
        self
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Whether glyphs will be rasterized.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Text measurement capability used for caption wrapping.
    ///
    /// Without a font the width is estimated from a fixed per-character advance.
    pub fn measure_text(&mut self, text: &str, size_px: f32) -> f32 {
        match self.font.as_mut() {
            Some(font) => font.measure(text, size_px),
            None => text.chars().count() as f32 * size_px * FALLBACK_ADVANCE_EM,
        }
    }

    pub(crate) fn begin(&mut self) {
        self.ctx.reset();
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    pub(crate) fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgba8) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 || color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color.to_cpu_color());
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill `rect` (in image space) with `image`, translated by `offset`.
    pub(crate) fn fill_image(&mut self, rect: kurbo::Rect, offset: kurbo::Vec2, image: &vello_cpu::Image) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((offset.x, offset.y)));
        self.ctx.set_paint(image.clone());
        self.ctx.fill_rect(&rect_to_cpu(rect));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Draw one line of text with its layout top-left at `origin`.
    pub(crate) fn draw_text(&mut self, text: &str, origin: kurbo::Point, size_px: f32, color: Rgba8) {
        let Some(font) = self.font.as_mut() else {
            return;
        };
        if text.is_empty() || color.a == 0 {
            return;
        }
        let layout = font.layout_line(text, size_px, color.into());

        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Rasterize the recorded scene into an opaque frame.
    ///
    /// Premultiplied pixels are composited over black: color bytes are kept and alpha becomes
    /// 255. Anti-aliased edges of translucent fills can round to alpha 254 in the u8 pipeline.
    pub(crate) fn finish(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        let mut data = self.pixmap.data_as_u8_slice().to_vec();
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        }
    }
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// Wrap premultiplied RGBA8 bytes into an image paint.
pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::evaluation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::evaluation("pixmap height exceeds u16"))?;
    if bytes_premul.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::evaluation("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let pixels = bytes_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
