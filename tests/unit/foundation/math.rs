use super::*;

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
}

#[test]
fn unpremul_inverts_premul_for_opaque_and_half() {
    assert_eq!(unpremul_u8(200, 255), 200);
    assert_eq!(unpremul_u8(0, 0), 0);
    assert_eq!(unpremul_u8(64, 128), 128);
}

#[test]
fn digest_differs_on_single_byte_change() {
    let a = vec![0u8; 64];
    let mut b = a.clone();
    b[17] = 1;
    assert_eq!(digest_u64(&a), digest_u64(&a.clone()));
    assert_ne!(digest_u64(&a), digest_u64(&b));
}
