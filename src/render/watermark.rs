use crate::assets::color::Rgb8;
use crate::assets::fonts::ResolvedFont;
use crate::assets::text::{TextBrushRgba8, TextLayoutEngine, TextStyle};
use crate::effects::shadow::DropShadow;
use crate::foundation::core::{BezPath, Canvas, Circle, Point, Rect, Rgba8Premul, Shape};
use crate::foundation::error::CardResult;
use crate::render::surface::{LayerSlot, OutputSurface, affine_to_cpu, bezpath_to_cpu};
use crate::render::text::{GlyphPaint, VerticalAnchor, draw_shaped_line, shape_line};
use crate::scene::style::FontFamily;

pub const WORDMARK: &str = "AniverApp";
pub const WORDMARK_SIZE_PX: f32 = 50.0;
pub const WORDMARK_WEIGHT: u16 = 700;
pub const WORDMARK_FAMILY: FontFamily = FontFamily::Handwritten;
/// Distance from the right edge to the wordmark's right side.
pub const WATERMARK_MARGIN: f64 = 40.0;
/// Top of the wordmark's em box.
pub const WATERMARK_TOP: f64 = 50.0;
pub const ICON_SIZE: f64 = 60.0;
/// Horizontal gap between the icon box and the wordmark.
pub const ICON_GAP: f64 = 15.0;
/// The icon box starts this far above the wordmark top.
pub const ICON_RAISE: f64 = 5.0;

const CANDLE: Rgb8 = Rgb8::new(0xfc, 0xd3, 0x4d);
const FLAME: Rgb8 = Rgb8::new(0xf5, 0x9e, 0x0b);
const FROSTING: Rgb8 = Rgb8::new(0xf4, 0x3f, 0x5e);
const FROSTING_SIDE: Rgb8 = Rgb8::new(0xfb, 0x71, 0x85);
const WRAPPER: Rgb8 = Rgb8::new(0xfd, 0xa4, 0xaf);

const PATH_TOLERANCE: f64 = 0.1;

pub fn watermark_shadow() -> DropShadow {
    DropShadow {
        color: Rgba8Premul::black(0.5),
        blur: 10.0,
        offset_x: 2,
        offset_y: 2,
    }
}

/// One filled piece of the brand icon, in surface coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct IconShape {
    pub path: BezPath,
    pub color: Rgb8,
}

/// Where the watermark lands for a wordmark of a given rendered width.
#[derive(Clone, Debug, PartialEq)]
pub struct WatermarkLayout {
    pub text_width: f64,
    /// Right edge of the wordmark.
    pub text_right: f64,
    pub text_left: f64,
    pub text_top: f64,
    /// Top-left of the icon's 60px box.
    pub icon_origin: Point,
    /// Icon pieces in paint order.
    pub icon: Vec<IconShape>,
}

/// Place the wordmark right-aligned at the top-right margin and the icon just left of it.
///
/// Only the measured wordmark width moves the icon; caption and style never do.
pub fn watermark_layout(text_width: f64, canvas: Canvas) -> WatermarkLayout {
    let text_right = canvas.width_f64() - WATERMARK_MARGIN;
    let text_left = text_right - text_width;
    let icon_origin = Point::new(
        text_left - ICON_SIZE - ICON_GAP,
        WATERMARK_TOP - ICON_RAISE,
    );
    WatermarkLayout {
        text_width,
        text_right,
        text_left,
        text_top: WATERMARK_TOP,
        icon_origin,
        icon: cupcake_icon(icon_origin),
    }
}

/// The cupcake: candle, flame, three frosting puffs and the wrapper, back to front.
pub fn cupcake_icon(origin: Point) -> Vec<IconShape> {
    let (ix, iy) = (origin.x, origin.y);
    let cx = ix + ICON_SIZE / 2.0;

    let candle = Rect::new(cx - 3.0, iy, cx + 3.0, iy + 20.0).to_path(PATH_TOLERANCE);

    let mut flame = BezPath::new();
    flame.move_to((cx, iy - 10.0));
    flame.quad_to((cx + 5.0, iy), (cx, iy + 5.0));
    flame.quad_to((cx - 5.0, iy), (cx, iy - 10.0));
    flame.close_path();

    let puff = |x: f64, y: f64, r: f64| Circle::new((x, y), r).to_path(PATH_TOLERANCE);

    let mut wrapper = BezPath::new();
    wrapper.move_to((ix + 12.0, iy + 45.0));
    wrapper.line_to((ix + ICON_SIZE - 12.0, iy + 45.0));
    wrapper.line_to((ix + ICON_SIZE - 8.0, iy + 70.0));
    wrapper.line_to((ix + 8.0, iy + 70.0));
    wrapper.close_path();

    vec![
        IconShape {
            path: candle,
            color: CANDLE,
        },
        IconShape {
            path: flame,
            color: FLAME,
        },
        IconShape {
            path: puff(cx, iy + 30.0, 18.0),
            color: FROSTING,
        },
        IconShape {
            path: puff(cx - 15.0, iy + 38.0, 14.0),
            color: FROSTING_SIDE,
        },
        IconShape {
            path: puff(cx + 15.0, iy + 38.0, 14.0),
            color: FROSTING_SIDE,
        },
        IconShape {
            path: wrapper,
            color: WRAPPER,
        },
    ]
}

/// Draw the wordmark and icon with their shared drop shadow. Returns the layout used.
pub(crate) fn paint_watermark(
    surface: &mut OutputSurface,
    engine: &mut TextLayoutEngine,
    font: &ResolvedFont,
) -> CardResult<WatermarkLayout> {
    let style = TextStyle {
        font,
        size_px: WORDMARK_SIZE_PX,
        weight: WORDMARK_WEIGHT,
        brush: TextBrushRgba8::from(Rgb8::WHITE),
    };
    let canvas = surface.canvas();
    let right = canvas.width_f64() - WATERMARK_MARGIN;
    let shaped = shape_line(
        engine,
        WORDMARK,
        style,
        |w| right - w,
        WATERMARK_TOP,
        VerticalAnchor::Top,
    )?;
    let layout = watermark_layout(shaped.as_ref().map_or(0.0, |s| s.width), canvas);

    surface.render_layer(LayerSlot::Primary, |ctx| {
        if let Some(line) = &shaped {
            draw_shaped_line(ctx, line, font, &GlyphPaint::Fill);
        }
        ctx.set_transform(affine_to_cpu(crate::foundation::core::Affine::IDENTITY));
        for shape in &layout.icon {
            ctx.set_paint(shape.color.to_cpu());
            ctx.fill_path(&bezpath_to_cpu(&shape.path));
        }
        Ok(())
    })?;
    surface.composite_layer_shadow(LayerSlot::Primary, &watermark_shadow())?;
    surface.composite_layer(LayerSlot::Primary)?;

    tracing::debug!(
        text_width = layout.text_width,
        icon_x = layout.icon_origin.x,
        "watermark placed"
    );
    Ok(layout)
}

#[cfg(test)]
#[path = "../../tests/unit/render/watermark.rs"]
mod tests;
