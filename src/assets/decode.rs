use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{CardError, CardResult};

/// Decoded background raster in premultiplied RGBA8 form.
///
/// Immutable once decoded; renders only borrow it.
#[derive(Clone, Debug)]
pub struct BackgroundAsset {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Encoded background as handed over by the generative backend or the file system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundSource {
    /// Raw encoded image bytes (PNG, JPEG, WebP, ...).
    Bytes(Arc<Vec<u8>>),
    /// `data:image/...;base64,...` URL, or bare base64 payload.
    DataUrl(String),
}

impl BackgroundSource {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(Arc::new(bytes.into()))
    }

    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self::DataUrl(url.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read background image '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Resolve to encoded image bytes.
    pub fn encoded_bytes(&self) -> CardResult<Arc<Vec<u8>>> {
        match self {
            Self::Bytes(b) => Ok(b.clone()),
            Self::DataUrl(url) => decode_data_url(url).map(Arc::new),
        }
    }
}

/// Strip an optional `data:<mime>;base64,` header and decode the base64 payload.
pub fn decode_data_url(url: &str) -> CardResult<Vec<u8>> {
    let url = url.trim();
    let payload = match url.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| CardError::decode("data URL has no ',' separator"))?;
            if !meta.ends_with(";base64") {
                return Err(CardError::decode("data URL is not base64 encoded"));
            }
            if !meta.starts_with("image/") {
                return Err(CardError::decode(format!(
                    "data URL media type '{meta}' is not an image"
                )));
            }
            payload
        }
        None => url,
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| CardError::decode(format!("invalid base64 payload: {e}")))
}

/// Decode an encoded image into a premultiplied [`BackgroundAsset`].
pub fn decode_background(bytes: &[u8]) -> CardResult<BackgroundAsset> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CardError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CardError::decode("image has zero width or height"));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(CardError::decode("image dimensions exceed u16"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(BackgroundAsset {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode off the async executor. This is the only suspension point of a render.
pub async fn decode_background_async(source: BackgroundSource) -> CardResult<BackgroundAsset> {
    tokio::task::spawn_blocking(move || {
        let bytes = source.encoded_bytes()?;
        decode_background(&bytes)
    })
    .await
    .map_err(|e| CardError::decode(format!("decode task failed: {e}")))?
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
