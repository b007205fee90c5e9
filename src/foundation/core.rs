use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape};

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The canonical 9:16 story format every exported card uses.
    pub const STORY: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Create a validated canvas. Both sides must be non-zero and fit the rasterizer's `u16`
    /// coordinate space.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::validation("canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(CardError::validation("canvas dimensions exceed u16"));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    pub(crate) fn dims_u16(self) -> CardResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| CardError::render("surface width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| CardError::render("surface height exceeds u16"))?;
        Ok((w, h))
    }

    pub(crate) fn byte_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::STORY
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Black at the given fractional opacity, as used by shadows and the readability overlay.
    pub fn black(alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r: 0, g: 0, b: 0, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
