use super::*;

#[test]
fn filename_lowercases_and_dashes_whitespace() {
    assert_eq!(download_filename("Maria Clara"), "aniverapp-maria-clara.png");
    assert_eq!(download_filename("JOÃO  da\tSilva"), "aniverapp-joão-da-silva.png");
    assert_eq!(download_filename("Ana"), "aniverapp-ana.png");
}

#[test]
fn filename_keeps_edge_whitespace_as_dashes() {
    assert_eq!(download_filename(" Bia "), "aniverapp--bia-.png");
    assert_eq!(download_filename(""), "aniverapp-.png");
}

#[test]
fn png_roundtrips_straight_pixels() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        // Opaque red, then half-transparent premultiplied white.
        data: vec![255, 0, 0, 255, 128, 128, 128, 128],
        premultiplied: true,
    };
    let png = encode_png(&frame).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0, [255, 255, 255, 128]);
}

#[test]
fn png_rejects_short_buffers() {
    let frame = FrameRGBA {
        width: 3,
        height: 3,
        data: vec![0; 4],
        premultiplied: true,
    };
    assert!(encode_png(&frame).is_err());
}

#[test]
fn write_png_creates_file() {
    let dir = std::env::temp_dir().join(format!("aniver-png-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(download_filename("Teste"));
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 255],
        premultiplied: true,
    };
    write_png(&frame, &path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 8);
    std::fs::remove_file(&path).unwrap();
}
