use crate::effects::blur::{CoverageKernel, radius_for_sigma, shadow_sigma};
use crate::effects::composite::{TilePlacement, over_tile_in_place};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::mul_div255_u8;

/// Canvas-style drop shadow: a blurred, tinted copy of a layer's alpha, drawn beneath it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropShadow {
    /// Premultiplied shadow color; its alpha scales the layer's coverage.
    pub color: Rgba8Premul,
    /// Blur amount in the `shadowBlur` sense; the gaussian sigma is half of it.
    pub blur: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl DropShadow {
    pub fn sigma(&self) -> f32 {
        shadow_sigma(self.blur)
    }

    pub fn radius(&self) -> u32 {
        radius_for_sigma(self.sigma())
    }
}

/// Inclusive-exclusive pixel bounds of every pixel with non-zero alpha.
pub fn alpha_bounds(rgba: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let w = width as usize;
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height as usize {
        let row = &rgba[y * w * 4..(y + 1) * w * 4];
        let Some(first) = row.chunks_exact(4).position(|px| px[3] != 0) else {
            continue;
        };
        let last = row.chunks_exact(4).rposition(|px| px[3] != 0).unwrap_or(first);
        let (x0, x1, y0) = (first as u32, last as u32 + 1, y as u32);
        bounds = Some(match bounds {
            None => (x0, y0, x1, y0 + 1),
            Some((bx0, by0, bx1, _)) => (bx0.min(x0), by0, bx1.max(x1), y0 + 1),
        });
    }
    bounds
}

/// Composite the drop shadow of `layer` onto `dst`. Both buffers are `width`x`height`
/// premultiplied RGBA8.
///
/// Only the layer's alpha inside its bounding box, grown by the kernel radius, is blurred. The
/// blurred coverage is then tinted with the shadow color.
pub fn composite_drop_shadow(
    dst: &mut [u8],
    layer: &[u8],
    width: u32,
    height: u32,
    shadow: &DropShadow,
) -> CardResult<()> {
    let expected = (width as usize) * (height as usize) * 4;
    if dst.len() != expected || layer.len() != expected {
        return Err(CardError::render(
            "composite_drop_shadow expects buffers matching width*height*4",
        ));
    }
    if shadow.color.a == 0 {
        return Ok(());
    }
    let Some((x0, y0, x1, y1)) = alpha_bounds(layer, width, height) else {
        return Ok(());
    };

    let kernel = CoverageKernel::for_shadow_blur(shadow.blur);
    let radius = kernel.radius();
    let pad = i64::from(radius);
    let tile_x = i64::from(x0) - pad;
    let tile_y = i64::from(y0) - pad;
    let tile_w = (x1 - x0) + 2 * radius;
    let tile_h = (y1 - y0) + 2 * radius;

    let mut coverage = vec![0u8; (tile_w as usize) * (tile_h as usize)];
    for y in y0..y1 {
        let row = (y as usize) * (width as usize);
        let ty = (i64::from(y) - tile_y) as usize;
        for x in x0..x1 {
            let tx = (i64::from(x) - tile_x) as usize;
            coverage[ty * (tile_w as usize) + tx] = layer[(row + x as usize) * 4 + 3];
        }
    }
    kernel.apply(&mut coverage, tile_w, tile_h)?;

    let c = shadow.color;
    let blurred: Vec<u8> = coverage
        .iter()
        .flat_map(|&a| {
            let a = u16::from(a);
            [c.r, c.g, c.b, c.a].map(|ch| mul_div255_u8(u16::from(ch), a))
        })
        .collect();

    over_tile_in_place(
        dst,
        &blurred,
        TilePlacement {
            dst_w: width,
            dst_h: height,
            src_w: tile_w,
            src_h: tile_h,
            x: tile_x + i64::from(shadow.offset_x),
            y: tile_y + i64::from(shadow.offset_y),
        },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
