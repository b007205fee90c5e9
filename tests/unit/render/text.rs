use super::*;

/// Every character advances by a fixed width.
struct Monospace {
    advance: f64,
    calls: usize,
}

impl Monospace {
    fn new(advance: f64) -> Self {
        Self { advance, calls: 0 }
    }
}

impl MeasureText for Monospace {
    fn measure(&mut self, text: &str) -> CardResult<f64> {
        self.calls += 1;
        Ok(text.chars().count() as f64 * self.advance)
    }
}

struct Failing;

impl MeasureText for Failing {
    fn measure(&mut self, _text: &str) -> CardResult<f64> {
        Err(crate::foundation::error::CardError::font("no face"))
    }
}

#[test]
fn empty_text_yields_one_empty_line() {
    let lines = wrap_lines("", 100.0, &mut Monospace::new(10.0)).unwrap();
    assert_eq!(lines, vec![String::new()]);
}

#[test]
fn whitespace_only_text_yields_one_empty_line() {
    let lines = wrap_lines("   \t ", 100.0, &mut Monospace::new(10.0)).unwrap();
    assert_eq!(lines, vec![String::new()]);
}

#[test]
fn short_text_stays_on_one_line_with_trailing_space() {
    let lines = wrap_lines("Feliz dia", 1000.0, &mut Monospace::new(10.0)).unwrap();
    assert_eq!(lines, vec!["Feliz dia ".to_string()]);
}

#[test]
fn greedy_wrap_breaks_before_the_overflowing_word() {
    // Budget of 12 characters: "aaaa bbbb " is 10, adding "cccc " makes 15.
    let lines = wrap_lines("aaaa bbbb cccc dd", 120.0, &mut Monospace::new(10.0)).unwrap();
    assert_eq!(lines, vec!["aaaa bbbb ".to_string(), "cccc dd ".to_string()]);
}

#[test]
fn overlong_single_word_overflows_on_its_own_line() {
    let lines = wrap_lines(
        "Supercalifragilistico ok",
        50.0,
        &mut Monospace::new(10.0),
    )
    .unwrap();
    assert_eq!(
        lines,
        vec!["Supercalifragilistico ".to_string(), "ok ".to_string()]
    );
}

#[test]
fn first_word_is_never_measured_against_an_empty_line() {
    let mut m = Monospace::new(10.0);
    wrap_lines("one", 1.0, &mut m).unwrap();
    assert_eq!(m.calls, 0);
}

#[test]
fn measurement_errors_propagate() {
    assert!(wrap_lines("a b", 10.0, &mut Failing).is_err());
}

#[test]
fn single_line_is_centered_on_the_anchor() {
    let style = StyleParameters::with_text("Oi");
    let layout = layout_caption(&style, Canvas::STORY, &mut Monospace::new(10.0)).unwrap();

    assert_eq!(layout.lines.len(), 1);
    assert_eq!(layout.line_height, 70.0);
    assert_eq!(layout.block_height, 70.0);
    assert!((layout.anchor_y - 1708.8).abs() < 1e-9);
    assert!((layout.lines[0].y - (1708.8 - 35.0)).abs() < 1e-9);
    assert_eq!(layout.top(), layout.lines[0].y);
    assert_eq!(layout.center_x, 540.0);
    assert!((layout.max_width - 864.0).abs() < 1e-9);
}

#[test]
fn lines_advance_by_line_height_and_offset_shifts_the_block() {
    let mut style = StyleParameters::with_text("aaaa bbbb cccc dddd");
    style.font_size = 20;
    style.vertical_offset = -100;
    let canvas = Canvas::new(100, 1000).unwrap();
    // Budget 80px = 8 characters, so one word per line.
    let layout = layout_caption(&style, canvas, &mut Monospace::new(10.0)).unwrap();

    assert_eq!(layout.lines.len(), 4);
    assert_eq!(layout.line_height, 35.0);
    assert_eq!(layout.block_height, 140.0);
    assert!((layout.anchor_y - 790.0).abs() < 1e-9);
    assert!((layout.lines[0].y - 720.0).abs() < 1e-9);
    for pair in layout.lines.windows(2) {
        assert!((pair[1].y - pair[0].y - 35.0).abs() < 1e-9);
    }
}

#[test]
fn long_caption_wraps_within_budget_and_centers_the_block() {
    let words = [
        "Parabens", "pelo", "seu", "dia", "especial", "que", "a", "vida", "traga", "muita",
        "alegria", "saude", "e", "amor",
    ];
    let mut text = String::new();
    let mut i = 0;
    while text.chars().count() < 300 {
        text.push_str(words[i % words.len()]);
        text.push(' ');
        i += 1;
    }
    text.push_str("Extraordinariamente-inesquecivel-e-maravilhoso-aniversario");
    assert!(text.chars().count() > 300);

    let mut style = StyleParameters::with_text(text.clone());
    style.vertical_offset = -150;
    let canvas = Canvas::STORY;
    let mut measure = Monospace::new(20.0);
    let layout = layout_caption(&style, canvas, &mut measure).unwrap();

    assert!(layout.lines.len() > 1);
    let (last, committed) = layout.lines.split_last().unwrap();
    for line in committed {
        let width = measure.measure(&line.text).unwrap();
        let single_word = line.text.split_whitespace().count() == 1;
        assert!(
            width <= layout.max_width || single_word,
            "{:?} measures {width}",
            line.text
        );
    }
    // The overlong final word sits alone on the last line.
    assert_eq!(last.text.split_whitespace().count(), 1);
    assert!(measure.measure(&last.text).unwrap() > layout.max_width);

    let rejoined: Vec<&str> = layout
        .lines
        .iter()
        .flat_map(|l| l.text.split_whitespace())
        .collect();
    assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>());

    let expected_block = layout.lines.len() as f64 * layout.line_height;
    assert!((layout.block_height - expected_block).abs() < 1e-9);
    let expected_top = 1920.0 * 0.89 - 150.0 - expected_block / 2.0;
    assert!((layout.top() - expected_top).abs() < 1e-9);
    assert!((layout.lines[0].y - expected_top).abs() < 1e-9);
}

#[test]
fn empty_caption_keeps_one_line_of_height() {
    let style = StyleParameters::default();
    let layout = layout_caption(&style, Canvas::STORY, &mut Monospace::new(10.0)).unwrap();
    assert_eq!(layout.lines.len(), 1);
    assert_eq!(layout.lines[0].text, "");
    assert_eq!(layout.block_height, layout.line_height);
}

#[test]
fn degenerate_font_size_still_lays_out() {
    let mut style = StyleParameters::with_text("a b");
    style.font_size = 0;
    let layout = layout_caption(&style, Canvas::STORY, &mut Monospace::new(1.0)).unwrap();
    assert_eq!(layout.line_height, 1.75);
}

#[test]
fn caption_shadow_constants() {
    let s = caption_shadow();
    assert_eq!(s.blur, 25.0);
    assert_eq!((s.offset_x, s.offset_y), (0, 2));
    assert_eq!(s.color.a, 217);
}

#[test]
fn layout_serializes_to_json() {
    let style = StyleParameters::with_text("Oi");
    let layout = layout_caption(&style, Canvas::STORY, &mut Monospace::new(10.0)).unwrap();
    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["lines"][0]["text"], "Oi ");
    assert_eq!(json["line_height"], 70.0);
}

fn white_surface(side: u32) -> OutputSurface {
    let mut surface = OutputSurface::new(Canvas::new(side, side).unwrap()).unwrap();
    surface.data_mut().fill(255);
    surface
}

/// Fill layer: opaque white box. Outline layer: a 0.3 black box two pixels larger.
fn stage_caption_layers(surface: &mut OutputSurface) {
    surface
        .render_layer(LayerSlot::Primary, |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(10.0, 10.0, 30.0, 20.0));
            Ok(())
        })
        .unwrap();
    surface
        .render_layer(LayerSlot::Secondary, |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 77));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(8.0, 8.0, 32.0, 22.0));
            Ok(())
        })
        .unwrap();
}

fn red_at(surface: &OutputSurface, x: u32, y: u32) -> u8 {
    surface.data()[((y * surface.canvas().width + x) * 4) as usize]
}

#[test]
fn caption_layers_stack_shadow_then_outline_then_fill() {
    let mut surface = white_surface(40);
    stage_caption_layers(&mut surface);

    composite_caption_layers(&mut surface, true).unwrap();

    // Fill sits on top of both the outline and the shadow.
    assert_eq!(red_at(&surface, 15, 15), 255);
    // Outline ring alone would give ~178 on white; the shadow beneath darkens it further.
    assert!(red_at(&surface, 9, 15) < 175, "{}", red_at(&surface, 9, 15));
    // Below the outline only the shadow reaches.
    let below = red_at(&surface, 20, 25);
    assert!(below < 250 && below > 150, "{below}");
    // Shadow thins out away from the fill.
    assert!(red_at(&surface, 39, 0) > red_at(&surface, 20, 25));
}

#[test]
fn caption_layers_without_shadow_draw_only_the_fill() {
    let mut surface = white_surface(40);
    stage_caption_layers(&mut surface);

    composite_caption_layers(&mut surface, false).unwrap();

    // White fill on white: no outline, no shadow anywhere.
    assert!(surface.data().iter().all(|&b| b == 255));
}
