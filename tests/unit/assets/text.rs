use super::*;
use crate::assets::fonts::{FontBook, FontSources};
use crate::scene::style::FontFamily;

fn system_font() -> Option<ResolvedFont> {
    let mut book = FontBook::load(&FontSources::default());
    if book.face_count() == 0 {
        return None;
    }
    book.resolve(FontFamily::Sans, 600).ok()
}

#[test]
fn brush_from_rgb_is_opaque() {
    let b = TextBrushRgba8::from(Rgb8::GOLD);
    assert_eq!((b.r, b.g, b.b, b.a), (0xff, 0xd7, 0x00, 255));
}

#[test]
fn measure_grows_with_text_and_counts_trailing_space() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle {
        font: &font,
        size_px: 80.0,
        weight: 600,
        brush: TextBrushRgba8::default(),
    };

    let short = engine.measure("Feliz", style).unwrap();
    let spaced = engine.measure("Feliz ", style).unwrap();
    let long = engine.measure("Feliz Aniversário!", style).unwrap();
    assert!(short > 0.0);
    assert!(spaced > short);
    assert!(long > spaced);
    assert_eq!(engine.measure("", style).unwrap(), 0.0);
}

#[test]
fn layout_line_rejects_non_positive_size() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle {
        font: &font,
        size_px: 0.0,
        weight: 700,
        brush: TextBrushRgba8::default(),
    };
    assert!(engine.layout_line("x", style).is_err());
}

#[test]
fn metrics_report_positive_ascent() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle {
        font: &font,
        size_px: 50.0,
        weight: 700,
        brush: TextBrushRgba8::default(),
    };
    let layout = engine.layout_line("AniverApp", style).unwrap();
    let m = first_line_metrics(&layout).unwrap();
    assert!(m.ascent > 0.0);
    assert!(m.baseline > 0.0);
}
