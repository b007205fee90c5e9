use super::*;

#[test]
fn story_canvas_is_nine_by_sixteen() {
    let c = Canvas::STORY;
    assert_eq!((c.width, c.height), (1080, 1920));
    assert_eq!(c.width * 16, c.height * 9);
    assert_eq!(Canvas::default(), c);
}

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::new(9, 16).unwrap().byte_len(), 9 * 16 * 4);
}

#[test]
fn premultiply_rounds_like_the_decoder() {
    let p = Rgba8Premul::from_straight_rgba(100, 50, 200, 128);
    assert_eq!(p.r, ((100u16 * 128 + 127) / 255) as u8);
    assert_eq!(p.g, ((50u16 * 128 + 127) / 255) as u8);
    assert_eq!(p.b, ((200u16 * 128 + 127) / 255) as u8);
    assert_eq!(p.a, 128);
}

#[test]
fn black_alpha_is_clamped_and_rounded() {
    assert_eq!(Rgba8Premul::black(0.45).a, 115);
    assert_eq!(Rgba8Premul::black(2.0).a, 255);
    assert_eq!(Rgba8Premul::black(-1.0), Rgba8Premul::transparent());
}
