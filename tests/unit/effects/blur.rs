use super::*;

fn plane_sum(plane: &[u8]) -> u32 {
    plane.iter().map(|&v| u32::from(v)).sum()
}

#[test]
fn shadow_blur_maps_to_half_sigma_and_three_sigma_radius() {
    assert_eq!(shadow_sigma(25.0), 12.5);
    assert_eq!(CoverageKernel::for_shadow_blur(25.0).radius(), 38);
    assert_eq!(CoverageKernel::for_shadow_blur(10.0).radius(), 15);
    assert_eq!(CoverageKernel::for_shadow_blur(0.0).radius(), 0);
    assert_eq!(CoverageKernel::for_shadow_blur(-3.0).radius(), 0);
    assert_eq!(radius_for_sigma(f32::NAN), 0);
}

#[test]
fn kernel_taps_sum_to_one_and_are_symmetric() {
    let k = CoverageKernel::from_sigma(5.0);
    assert_eq!(k.taps.iter().sum::<u32>(), 1 << 16);
    let n = k.taps.len();
    for i in 0..n / 2 {
        assert_eq!(k.taps[i], k.taps[n - 1 - i]);
    }
    assert!(k.taps[n / 2] >= k.taps[n / 2 - 1]);
}

#[test]
fn zero_blur_leaves_plane_untouched() {
    let mut plane = vec![0u8, 90, 255, 12, 7, 0];
    let before = plane.clone();
    CoverageKernel::for_shadow_blur(0.0)
        .apply(&mut plane, 3, 2)
        .unwrap();
    assert_eq!(plane, before);
}

#[test]
fn coverage_fades_to_nothing_at_the_padded_edge() {
    // A solid block centered in a tile padded by the kernel radius on every side.
    let kernel = CoverageKernel::for_shadow_blur(8.0);
    let pad = kernel.radius();
    let block = 6u32;
    let side = block + 2 * pad;
    let mut plane = vec![0u8; (side * side) as usize];
    for y in pad..pad + block {
        for x in pad..pad + block {
            plane[(y * side + x) as usize] = 255;
        }
    }
    let before = plane_sum(&plane);

    kernel.apply(&mut plane, side, side).unwrap();

    let at = |x: u32, y: u32| plane[(y * side + x) as usize];
    let mid = side / 2;
    // Outermost ring is transparent, and coverage rises toward the block.
    assert_eq!(at(0, mid), 0);
    assert_eq!(at(mid, side - 1), 0);
    assert!(at(pad / 2, mid) < at(pad, mid));
    assert!(at(pad, mid) < at(mid, mid));
    // Padding holds the whole spread, so coverage is conserved up to rounding.
    let after = plane_sum(&plane);
    assert!((after as i64 - before as i64).abs() <= i64::from(before) / 25);
}

#[test]
fn unpadded_coverage_leaks_past_the_edge() {
    let kernel = CoverageKernel::for_shadow_blur(4.0);
    let mut plane = vec![255u8; 5 * 5];
    kernel.apply(&mut plane, 5, 5).unwrap();
    // Outside reads as empty, so the corners lose coverage.
    assert!(plane[0] < 255);
    assert!(plane[12] > plane[0]);
}

#[test]
fn mismatched_plane_is_rejected() {
    let mut plane = vec![0u8; 5];
    assert!(
        CoverageKernel::for_shadow_blur(4.0)
            .apply(&mut plane, 2, 2)
            .is_err()
    );
}
