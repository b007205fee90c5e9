use crate::foundation::error::{CardError, CardResult};

const Q16_ONE: u32 = 1 << 16;

/// Gaussian sigma for a canvas `shadowBlur` amount.
pub fn shadow_sigma(blur: f32) -> f32 {
    if blur.is_finite() && blur > 0.0 {
        blur / 2.0
    } else {
        0.0
    }
}

/// Kernel radius covering three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Normalized 1-D gaussian in 16.16 fixed point, applied separably to a coverage plane.
#[derive(Clone, Debug)]
pub struct CoverageKernel {
    taps: Vec<u32>,
}

impl CoverageKernel {
    /// Kernel for a canvas `shadowBlur` amount. Zero or invalid blur gives the identity.
    pub fn for_shadow_blur(blur: f32) -> Self {
        Self::from_sigma(shadow_sigma(blur))
    }

    pub fn from_sigma(sigma: f32) -> Self {
        let radius = radius_for_sigma(sigma);
        if radius == 0 {
            return Self {
                taps: vec![Q16_ONE],
            };
        }

        let two_sigma_sq = 2.0 * f64::from(sigma) * f64::from(sigma);
        let half: Vec<f64> = (0..=radius)
            .map(|d| (-f64::from(d * d) / two_sigma_sq).exp())
            .collect();
        let total = half[0] + 2.0 * half[1..].iter().sum::<f64>();

        let side: Vec<u32> = half[1..]
            .iter()
            .map(|w| ((w / total) * f64::from(Q16_ONE)).round() as u32)
            .collect();
        // Center tap absorbs the rounding so the taps sum to exactly one.
        let center = Q16_ONE.saturating_sub(2 * side.iter().sum::<u32>());

        let mut taps = Vec::with_capacity(side.len() * 2 + 1);
        taps.extend(side.iter().rev());
        taps.push(center);
        taps.extend(side.iter());
        Self { taps }
    }

    pub fn radius(&self) -> u32 {
        (self.taps.len() / 2) as u32
    }

    /// Blur a `width`x`height` single-channel plane in place. Samples outside the plane read
    /// as zero coverage.
    pub fn apply(&self, plane: &mut [u8], width: u32, height: u32) -> CardResult<()> {
        let (w, h) = (width as usize, height as usize);
        if plane.len() != w * h {
            return Err(CardError::render(
                "coverage plane does not match width*height",
            ));
        }
        if self.taps.len() == 1 || plane.is_empty() {
            return Ok(());
        }

        let mut scratch = vec![0u8; plane.len()];
        // Rows, then columns.
        self.convolve(plane, &mut scratch, h, w, w, 1);
        self.convolve(&scratch, plane, w, h, 1, w);
        Ok(())
    }

    /// One 1-D pass over `lines` runs of `len` samples. `line_step` and `sample_step` are
    /// index strides between runs and between samples of a run.
    fn convolve(
        &self,
        src: &[u8],
        dst: &mut [u8],
        lines: usize,
        len: usize,
        line_step: usize,
        sample_step: usize,
    ) {
        let r = self.radius() as isize;
        for line in 0..lines {
            let base = line * line_step;
            for i in 0..len as isize {
                let lo = (i - r).max(0);
                let hi = (i + r).min(len as isize - 1);
                let acc: u64 = (lo..=hi)
                    .map(|j| {
                        let tap = self.taps[(j - i + r) as usize];
                        u64::from(tap) * u64::from(src[base + j as usize * sample_step])
                    })
                    .sum();
                dst[base + i as usize * sample_step] = ((acc + 0x8000) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
