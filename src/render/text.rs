use crate::assets::fonts::ResolvedFont;
use crate::assets::text::{TextBrushRgba8, TextLayoutEngine, TextStyle, first_line_metrics};
use crate::effects::shadow::DropShadow;
use crate::foundation::core::{Canvas, Point, Rgba8Premul};
use crate::foundation::error::CardResult;
use crate::render::surface::{LayerSlot, OutputSurface, affine_to_cpu};
use crate::scene::style::StyleParameters;

/// Share of the canvas width a caption line may occupy before it wraps.
pub const CAPTION_MAX_WIDTH_FRACTION: f64 = 0.80;
/// Vertical center of the caption block as a share of the canvas height.
pub const CAPTION_ANCHOR_FRACTION: f64 = 0.89;
pub const CAPTION_STROKE_WIDTH: f64 = 3.0;
pub const CAPTION_STROKE_ALPHA: f64 = 0.3;

pub fn caption_shadow() -> DropShadow {
    DropShadow {
        color: Rgba8Premul::black(0.85),
        blur: 25.0,
        offset_x: 0,
        offset_y: 2,
    }
}

/// Width oracle for line wrapping.
pub trait MeasureText {
    /// Rendered advance width of `text` in surface pixels, trailing whitespace included.
    fn measure(&mut self, text: &str) -> CardResult<f64>;
}

/// Measures with a real shaped face.
pub struct FontMeasurer<'a> {
    engine: &'a mut TextLayoutEngine,
    style: TextStyle<'a>,
}

impl<'a> FontMeasurer<'a> {
    pub fn new(engine: &'a mut TextLayoutEngine, style: TextStyle<'a>) -> Self {
        Self { engine, style }
    }
}

impl MeasureText for FontMeasurer<'_> {
    fn measure(&mut self, text: &str) -> CardResult<f64> {
        Ok(f64::from(self.engine.measure(text, self.style)?))
    }
}

/// Greedy word wrap.
///
/// Words are appended with a trailing space; when the candidate line is wider than `max_width`
/// and the current line already holds a word, the current line is committed and the word
/// starts the next one. A word wider than `max_width` on its own overflows rather than being
/// split. The last line is always committed, so the result is never empty.
pub fn wrap_lines<M: MeasureText + ?Sized>(
    text: &str,
    max_width: f64,
    measure: &mut M,
) -> CardResult<Vec<String>> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = format!("{line}{word} ");
        if !line.is_empty() && measure.measure(&candidate)? > max_width {
            lines.push(std::mem::replace(&mut line, format!("{word} ")));
        } else {
            line = candidate;
        }
    }
    lines.push(line);
    Ok(lines)
}

/// One caption line and the y of its vertical middle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionLine {
    pub text: String,
    pub y: f64,
}

/// Wrapped and vertically placed caption, recomputed on every compose.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineLayout {
    pub lines: Vec<CaptionLine>,
    pub line_height: f64,
    pub block_height: f64,
    /// Vertical center of the block.
    pub anchor_y: f64,
    /// Horizontal center every line is aligned on.
    pub center_x: f64,
    pub max_width: f64,
}

impl LineLayout {
    /// The y of the first line, which is also the top of the block.
    pub fn top(&self) -> f64 {
        self.anchor_y - self.block_height / 2.0
    }
}

/// Wrap and place `style.text` on `canvas`.
pub fn layout_caption<M: MeasureText + ?Sized>(
    style: &StyleParameters,
    canvas: Canvas,
    measure: &mut M,
) -> CardResult<LineLayout> {
    let max_width = canvas.width_f64() * CAPTION_MAX_WIDTH_FRACTION;
    let texts = wrap_lines(&style.text, max_width, measure)?;

    let line_height = style.line_height();
    let block_height = texts.len() as f64 * line_height;
    let anchor_y = canvas.height_f64() * CAPTION_ANCHOR_FRACTION + f64::from(style.vertical_offset);
    let top = anchor_y - block_height / 2.0;

    let lines = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| CaptionLine {
            text,
            y: top + i as f64 * line_height,
        })
        .collect();

    Ok(LineLayout {
        lines,
        line_height,
        block_height,
        anchor_y,
        center_x: canvas.width_f64() / 2.0,
        max_width,
    })
}

/// A shaped line plus where its layout box lands on the surface.
pub(crate) struct ShapedLine {
    pub layout: parley::Layout<TextBrushRgba8>,
    pub origin: Point,
    pub width: f64,
}

pub(crate) enum VerticalAnchor {
    /// `y` is the middle of the em box.
    Middle,
    /// `y` is the top of the em box.
    Top,
}

/// Shape `text` and position it so its left edge sits at `left` and its em box is anchored at
/// `y`. Returns `None` for text that shapes to no lines.
pub(crate) fn shape_line(
    engine: &mut TextLayoutEngine,
    text: &str,
    style: TextStyle<'_>,
    position: impl FnOnce(f64) -> f64,
    y: f64,
    anchor: VerticalAnchor,
) -> CardResult<Option<ShapedLine>> {
    let layout = engine.layout_line(text, style)?;
    let Some(m) = first_line_metrics(&layout) else {
        return Ok(None);
    };
    let width = f64::from(layout.full_width());
    let (ascent, descent) = (f64::from(m.ascent), f64::from(m.descent));
    let baseline = match anchor {
        VerticalAnchor::Middle => y + (ascent - descent) / 2.0,
        VerticalAnchor::Top => y + ascent,
    };
    Ok(Some(ShapedLine {
        origin: Point::new(position(width), baseline - f64::from(m.baseline)),
        layout,
        width,
    }))
}

pub(crate) enum GlyphPaint {
    /// Fill with each run's own brush.
    Fill,
    /// Outline with a fixed color.
    Stroke { width: f64, color: Rgba8Premul },
}

pub(crate) fn draw_shaped_line(
    ctx: &mut vello_cpu::RenderContext,
    line: &ShapedLine,
    font: &ResolvedFont,
    paint: &GlyphPaint,
) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(crate::foundation::core::Affine::translate(
        line.origin.to_vec2(),
    )));

    for l in line.layout.lines() {
        for item in l.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let size = run.run().font_size();
            match paint {
                GlyphPaint::Fill => {
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    ctx.glyph_run(&font.data).font_size(size).fill_glyphs(glyphs);
                }
                GlyphPaint::Stroke { width, color } => {
                    let straight = unpremultiply(*color);
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        straight[0],
                        straight[1],
                        straight[2],
                        straight[3],
                    ));
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                    ctx.glyph_run(&font.data).font_size(size).stroke_glyphs(glyphs);
                }
            }
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn unpremultiply(c: Rgba8Premul) -> [u8; 4] {
    use crate::foundation::math::unpremul_u8;
    [
        unpremul_u8(c.r, c.a),
        unpremul_u8(c.g, c.a),
        unpremul_u8(c.b, c.a),
        c.a,
    ]
}

/// Draw the caption lines of `layout` with `font`, plus stroke and shadow when enabled.
///
/// The fill pass goes to the primary layer and the outline to the secondary layer. With shadow
/// on, the surface receives the fill's shadow, then the outline, then the fill.
pub(crate) fn paint_caption(
    surface: &mut OutputSurface,
    engine: &mut TextLayoutEngine,
    font: &ResolvedFont,
    style: &StyleParameters,
    layout: &LineLayout,
) -> CardResult<()> {
    let text_style = TextStyle {
        font,
        size_px: style.font_px(),
        weight: style.caption_weight(),
        brush: TextBrushRgba8::from(style.color),
    };

    let mut shaped = Vec::with_capacity(layout.lines.len());
    for line in &layout.lines {
        let center = layout.center_x;
        if let Some(s) = shape_line(
            engine,
            &line.text,
            text_style,
            |w| center - w / 2.0,
            line.y,
            VerticalAnchor::Middle,
        )? {
            shaped.push(s);
        }
    }
    if shaped.is_empty() {
        return Ok(());
    }

    surface.render_layer(LayerSlot::Primary, |ctx| {
        for line in &shaped {
            draw_shaped_line(ctx, line, font, &GlyphPaint::Fill);
        }
        Ok(())
    })?;

    if style.shadow {
        let outline = GlyphPaint::Stroke {
            width: CAPTION_STROKE_WIDTH,
            color: Rgba8Premul::black(CAPTION_STROKE_ALPHA),
        };
        surface.render_layer(LayerSlot::Secondary, |ctx| {
            for line in &shaped {
                draw_shaped_line(ctx, line, font, &outline);
            }
            Ok(())
        })?;
    }
    composite_caption_layers(surface, style.shadow)
}

/// Stack the caption layers onto the surface: the fill's shadow, then the outline in
/// [`LayerSlot::Secondary`], then the fill in [`LayerSlot::Primary`]. Without a shadow only
/// the fill is drawn.
pub(crate) fn composite_caption_layers(
    surface: &mut OutputSurface,
    shadow: bool,
) -> CardResult<()> {
    if shadow {
        surface.composite_layer_shadow(LayerSlot::Primary, &caption_shadow())?;
        surface.composite_layer(LayerSlot::Secondary)?;
    }
    surface.composite_layer(LayerSlot::Primary)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
