use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over for one pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> CardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CardError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Integer placement of a `src_w`x`src_h` tile inside a `dst_w`x`dst_h` buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePlacement {
    pub dst_w: u32,
    pub dst_h: u32,
    pub src_w: u32,
    pub src_h: u32,
    pub x: i64,
    pub y: i64,
}

/// Composite a tile over `dst` at an integer offset; parts falling outside `dst` are dropped.
pub fn over_tile_in_place(dst: &mut [u8], src: &[u8], at: TilePlacement) -> CardResult<()> {
    if dst.len() != (at.dst_w as usize) * (at.dst_h as usize) * 4
        || src.len() != (at.src_w as usize) * (at.src_h as usize) * 4
    {
        return Err(CardError::render(
            "over_tile_in_place expects buffers matching their dimensions",
        ));
    }

    for sy in 0..i64::from(at.src_h) {
        let dy = at.y + sy;
        if dy < 0 || dy >= i64::from(at.dst_h) {
            continue;
        }
        for sx in 0..i64::from(at.src_w) {
            let dx = at.x + sx;
            if dx < 0 || dx >= i64::from(at.dst_w) {
                continue;
            }
            let si = ((sy as usize) * (at.src_w as usize) + (sx as usize)) * 4;
            if src[si + 3] == 0 {
                continue;
            }
            let di = ((dy as usize) * (at.dst_w as usize) + (dx as usize)) * 4;
            let out = over(
                [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]],
                [src[si], src[si + 1], src[si + 2], src[si + 3]],
                1.0,
            );
            dst[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
