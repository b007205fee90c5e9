use crate::assets::decode::BackgroundAsset;
use crate::assets::fonts::{FontBook, FontSources, ResolvedFont};
use crate::assets::text::{TextBrushRgba8, TextLayoutEngine, TextStyle};
use crate::foundation::core::Rect;
use crate::foundation::error::CardResult;
use crate::render::background::{cover_fit, paint_background};
use crate::render::overlay::paint_overlay;
use crate::render::surface::{LayerSlot, OutputSurface};
use crate::render::text::{FontMeasurer, LineLayout, layout_caption, paint_caption};
use crate::render::watermark::{
    WORDMARK_FAMILY, WORDMARK_WEIGHT, WatermarkLayout, paint_watermark,
};
use crate::scene::style::StyleParameters;

/// Compositor construction options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositorOpts {
    pub fonts: FontSources,
}

impl CompositorOpts {
    /// Defaults plus font directories from `ANIVER_FONT_DIR`.
    pub fn from_env() -> Self {
        Self {
            fonts: FontSources::from_env(),
        }
    }
}

/// What one compose pass decided, for callers that want to inspect placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposeReport {
    /// Destination rectangle of the background.
    pub fit: Rect,
    pub caption: LineLayout,
    pub watermark: WatermarkLayout,
}

/// Runs the card pipeline: clear, background, overlay, caption, watermark.
///
/// Holds the font book and shaping caches between composes; it never holds pixels, so one
/// compositor may serve any number of surfaces in turn.
pub struct Compositor {
    fonts: FontBook,
    text: TextLayoutEngine,
}

impl Compositor {
    pub fn new(opts: &CompositorOpts) -> Self {
        Self::with_font_book(FontBook::load(&opts.fonts))
    }

    pub fn with_font_book(fonts: FontBook) -> Self {
        Self {
            fonts,
            text: TextLayoutEngine::new(),
        }
    }

    pub fn font_book(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    fn caption_font(&mut self, style: &StyleParameters) -> CardResult<ResolvedFont> {
        self.fonts
            .resolve(style.font_family, style.caption_weight())
    }

    /// Wrap and place the caption without drawing anything.
    pub fn layout_caption(
        &mut self,
        style: &StyleParameters,
        canvas: crate::foundation::core::Canvas,
    ) -> CardResult<LineLayout> {
        let font = self.caption_font(style)?;
        caption_layout_with(&mut self.text, &font, style, canvas)
    }

    /// Repaint `surface` from scratch for `background` and `style`.
    ///
    /// Fonts are resolved and the caption is laid out before the surface is touched, so a
    /// font failure leaves the previous contents intact. Composing twice with the same inputs
    /// produces identical pixels.
    #[tracing::instrument(skip_all, fields(
        canvas_w = surface.canvas().width,
        canvas_h = surface.canvas().height,
        bg_w = background.width,
        bg_h = background.height,
    ))]
    pub fn compose(
        &mut self,
        background: &BackgroundAsset,
        style: &StyleParameters,
        surface: &mut OutputSurface,
    ) -> CardResult<ComposeReport> {
        let canvas = surface.canvas();
        let fit = cover_fit(background.width, background.height, canvas)?;
        let caption_font = self.caption_font(style)?;
        let wordmark_font = self.fonts.resolve(WORDMARK_FAMILY, WORDMARK_WEIGHT)?;
        let caption = caption_layout_with(&mut self.text, &caption_font, style, canvas)?;

        surface.clear();

        surface.render_layer(LayerSlot::Primary, |ctx| {
            paint_background(ctx, background, fit)
        })?;
        surface.composite_layer(LayerSlot::Primary)?;
        tracing::debug!(
            x = fit.x0,
            y = fit.y0,
            w = fit.width(),
            h = fit.height(),
            "background drawn"
        );

        paint_overlay(surface.data_mut(), canvas)?;

        paint_caption(surface, &mut self.text, &caption_font, style, &caption)?;
        tracing::debug!(
            lines = caption.lines.len(),
            top = caption.top(),
            shadow = style.shadow,
            "caption drawn"
        );

        let watermark = paint_watermark(surface, &mut self.text, &wordmark_font)?;

        Ok(ComposeReport {
            fit,
            caption,
            watermark,
        })
    }
}

fn caption_layout_with(
    engine: &mut TextLayoutEngine,
    font: &ResolvedFont,
    style: &StyleParameters,
    canvas: crate::foundation::core::Canvas,
) -> CardResult<LineLayout> {
    let text_style = TextStyle {
        font,
        size_px: style.font_px(),
        weight: style.caption_weight(),
        brush: TextBrushRgba8::from(style.color),
    };
    let mut measure = FontMeasurer::new(engine, text_style);
    layout_caption(style, canvas, &mut measure)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
