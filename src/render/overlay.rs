use crate::effects::composite::over;
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{CardError, CardResult};

/// Fraction of the canvas height where the readability gradient begins.
pub const OVERLAY_START: f64 = 0.55;

/// `(position, alpha)` stops of the black gradient, position measured from [`OVERLAY_START`]
/// (0.0) to the bottom edge (1.0).
pub const OVERLAY_STOPS: [(f64, f64); 4] = [(0.0, 0.0), (0.30, 0.05), (0.70, 0.20), (1.0, 0.45)];

/// Black overlay alpha at surface row coordinate `y` for a canvas of `height` pixels.
pub fn overlay_alpha(y: f64, height: f64) -> f64 {
    let start = height * OVERLAY_START;
    let span = height - start;
    if span <= 0.0 || !span.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let t = (y - start) / span;
    let (first, last) = (OVERLAY_STOPS[0], OVERLAY_STOPS[OVERLAY_STOPS.len() - 1]);
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    for pair in OVERLAY_STOPS.windows(2) {
        let ((t0, a0), (t1, a1)) = (pair[0], pair[1]);
        if t <= t1 {
            return a0 + (a1 - a0) * (t - t0) / (t1 - t0);
        }
    }
    last.1
}

/// Darken the lower part of `pixels` in place, one alpha per row sampled at the row center.
pub(crate) fn paint_overlay(pixels: &mut [u8], canvas: Canvas) -> CardResult<()> {
    if pixels.len() != canvas.byte_len() {
        return Err(CardError::render("overlay expects a full surface buffer"));
    }
    let height = canvas.height_f64();
    let row_bytes = canvas.width as usize * 4;
    let first_row = (height * OVERLAY_START).floor() as usize;

    for (y, row) in pixels.chunks_exact_mut(row_bytes).enumerate().skip(first_row) {
        let shade = Rgba8Premul::black(overlay_alpha(y as f64 + 0.5, height)).to_array();
        if shade[3] == 0 {
            continue;
        }
        for px in row.chunks_exact_mut(4) {
            let d = [px[0], px[1], px[2], px[3]];
            px.copy_from_slice(&over(d, shade, 1.0));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
