use std::collections::HashMap;

use crate::assets::color::Rgb8;
use crate::assets::fonts::ResolvedFont;
use crate::foundation::error::{CardError, CardResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Font selection and size for one shaping call.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle<'a> {
    pub font: &'a ResolvedFont,
    pub size_px: f32,
    pub weight: u16,
    pub brush: TextBrushRgba8,
}

/// Stateful helper for building single-line Parley layouts from resolved faces.
///
/// Each face is registered with the font collection once and then reused by family name.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<u64, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &ResolvedFont) -> CardResult<String> {
        if let Some(name) = self.families.get(&font.key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::font("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::font("registered font family has no name"))?
            .to_string();
        self.families.insert(font.key, family_name.clone());
        Ok(family_name)
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        style: TextStyle<'_>,
    ) -> CardResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(CardError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.family_for(style.font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(style.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(style.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }

    /// Advance width of `text` on one line, trailing whitespace included.
    pub fn measure(&mut self, text: &str, style: TextStyle<'_>) -> CardResult<f32> {
        Ok(self.layout_line(text, style)?.full_width())
    }
}

/// Vertical metrics of a shaped single-line layout, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    /// Baseline offset from the layout's top edge.
    pub baseline: f32,
    pub ascent: f32,
    pub descent: f32,
}

pub fn first_line_metrics(layout: &parley::Layout<TextBrushRgba8>) -> Option<LineMetrics> {
    let line = layout.lines().next()?;
    let m = line.metrics();
    Some(LineMetrics {
        baseline: m.baseline,
        ascent: m.ascent,
        descent: m.descent,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
