use std::path::Path;

use anyhow::Context;
use image::ImageEncoder as _;

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::unpremul_u8;
use crate::render::surface::FrameRGBA;

pub const DOWNLOAD_PREFIX: &str = "aniverapp-";

/// Encode a frame as an RGBA PNG, un-premultiplying first when needed.
pub fn encode_png(frame: &FrameRGBA) -> CardResult<Vec<u8>> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(CardError::render(format!(
            "frame has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }

    let straight: std::borrow::Cow<'_, [u8]> = if frame.premultiplied {
        let mut out = frame.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
        out.into()
    } else {
        frame.data.as_slice().into()
    };

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            &straight,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CardError::render(format!("png encode failed: {e}")))?;
    Ok(png)
}

/// Encode `frame` and write it to `path`.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> CardResult<()> {
    let png = encode_png(frame)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Download name for a card: `aniverapp-<name>.png` with the name lowercased and each run of
/// whitespace replaced by a single `-`.
pub fn download_filename(display_name: &str) -> String {
    let mut slug = String::with_capacity(display_name.len());
    let mut in_space = false;
    for ch in display_name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    format!("{DOWNLOAD_PREFIX}{slug}.png")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
