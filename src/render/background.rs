use crate::assets::decode::BackgroundAsset;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::{CardError, CardResult};
use crate::render::surface::{affine_to_cpu, image_premul_bytes_to_pixmap};

/// Destination rectangle for drawing an `iw`x`ih` image so it covers `canvas`.
///
/// The image keeps its aspect ratio (`scale = max(W/iw, H/ih)`) and is centered, so any excess
/// is cropped equally on both sides and no part of the canvas is left uncovered.
pub fn cover_fit(iw: u32, ih: u32, canvas: Canvas) -> CardResult<Rect> {
    if iw == 0 || ih == 0 {
        return Err(CardError::validation("background dimensions must be > 0"));
    }
    let (iw, ih) = (f64::from(iw), f64::from(ih));
    let (w, h) = (canvas.width_f64(), canvas.height_f64());
    let scale = (w / iw).max(h / ih);
    let (dw, dh) = (iw * scale, ih * scale);
    let x = (w - dw) / 2.0;
    let y = (h - dh) / 2.0;
    Ok(Rect::new(x, y, x + dw, y + dh))
}

/// Draw `asset` into `fit` with a bilinear image paint.
pub(crate) fn paint_background(
    ctx: &mut vello_cpu::RenderContext,
    asset: &BackgroundAsset,
    fit: Rect,
) -> CardResult<()> {
    let pixmap = image_premul_bytes_to_pixmap(&asset.rgba8_premul, asset.width, asset.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };

    let sx = fit.width() / f64::from(asset.width);
    let sy = fit.height() / f64::from(asset.height);
    let transform = Affine::translate((fit.x0, fit.y0)) * Affine::scale_non_uniform(sx, sy);

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(asset.width),
        f64::from(asset.height),
    ));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
