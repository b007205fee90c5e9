use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn alpha_is_zero_above_the_gradient() {
    assert_eq!(overlay_alpha(0.0, 1920.0), 0.0);
    assert_eq!(overlay_alpha(1056.0, 1920.0), 0.0);
}

#[test]
fn alpha_matches_stops() {
    let h = 1920.0;
    let at = |t: f64| overlay_alpha(h * 0.55 + t * h * 0.45, h);
    assert!(approx(at(0.30), 0.05));
    assert!(approx(at(0.70), 0.20));
    assert!(approx(overlay_alpha(h, h), 0.45));
    assert!(approx(overlay_alpha(h + 10.0, h), 0.45));
}

#[test]
fn alpha_interpolates_between_stops() {
    let h = 1000.0;
    let y = h * 0.55 + 0.5 * h * 0.45;
    assert!(approx(overlay_alpha(y, h), 0.125));
    let y = h * 0.55 + 0.15 * h * 0.45;
    assert!(approx(overlay_alpha(y, h), 0.025));
}

#[test]
fn alpha_is_monotonic_down_the_canvas() {
    let mut prev = 0.0;
    for y in 0..1920 {
        let a = overlay_alpha(f64::from(y), 1920.0);
        assert!(a >= prev);
        prev = a;
    }
}

#[test]
fn overlay_darkens_only_the_lower_rows() {
    let canvas = Canvas::new(2, 100).unwrap();
    let mut px = vec![255u8; canvas.byte_len()];
    paint_overlay(&mut px, canvas).unwrap();

    let row = |y: usize| &px[y * 8..y * 8 + 4];
    assert_eq!(row(10), &[255, 255, 255, 255]);
    assert_eq!(row(54), &[255, 255, 255, 255]);
    // Bottom row: alpha ~0.445 of black over white.
    let bottom = row(99);
    assert!(bottom[0] > 130 && bottom[0] < 150, "{bottom:?}");
    assert_eq!(bottom[3], 255);
    assert!(row(80)[0] > bottom[0]);
}

#[test]
fn overlay_rejects_mismatched_buffer() {
    let canvas = Canvas::new(2, 2).unwrap();
    assert!(paint_overlay(&mut [0u8; 4], canvas).is_err());
}
