use rayon::prelude::*;

use crate::foundation::core::{Canvas, Rgba8, Rgba8Premul};
use crate::foundation::error::ReelResult;
use crate::foundation::math::lerp_u8;
use crate::render::surface::rgba_premul_to_image;

/// Peak highlight opacity, at the top-left end of the band gradient.
pub(crate) const HIGHLIGHT_ALPHA: f32 = 0.06;

/// Rasterize a top-left to bottom-right linear gradient as premultiplied RGBA8 bytes.
///
/// Each pixel center is projected onto the canvas diagonal; `from` sits at the top-left corner
/// and `to` at the bottom-right corner.
pub(crate) fn diagonal_gradient(width: u32, height: u32, from: Rgba8, to: Rgba8) -> Vec<u8> {
    let row_bytes = (width as usize) * 4;
    let mut out = vec![0u8; row_bytes * (height as usize)];
    if row_bytes == 0 {
        return out;
    }

    let w = f64::from(width);
    let h = f64::from(height);
    let len2 = (w * w + h * h).max(f64::EPSILON);

    out.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let px_x = x as f64 + 0.5;
                let t = ((px_x * w + py * h) / len2).clamp(0.0, 1.0) as f32;
                let c = Rgba8Premul::from_straight_rgba(
                    lerp_u8(from.r, to.r, t),
                    lerp_u8(from.g, to.g, t),
                    lerp_u8(from.b, to.b, t),
                    lerp_u8(from.a, to.a, t),
                );
                px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        });
    out
}

/// Background paint for a palette's two gradient stops.
pub(crate) fn gradient_image(canvas: Canvas, stops: [Rgba8; 2]) -> ReelResult<vello_cpu::Image> {
    let bytes = diagonal_gradient(canvas.width, canvas.height, stops[0], stops[1]);
    rgba_premul_to_image(&bytes, canvas.width, canvas.height)
}

/// Faint white sheen fading out toward the bottom-right corner.
pub(crate) fn highlight_image(canvas: Canvas) -> ReelResult<vello_cpu::Image> {
    let white = Rgba8::rgb(255, 255, 255);
    let bytes = diagonal_gradient(
        canvas.width,
        canvas.height,
        white.with_alpha(HIGHLIGHT_ALPHA),
        white.with_alpha(0.0),
    );
    rgba_premul_to_image(&bytes, canvas.width, canvas.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/backdrop.rs"]
mod tests;
