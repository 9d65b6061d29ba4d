use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!((decoded.width, decoded.height), (1, 1));
    assert_eq!(
        decoded.rgba8_premul,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
    decoded.into_paint().unwrap();
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(parse_svg(b"<svg").is_err());
}

#[test]
fn svg_is_rasterised_to_fit() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20">
        <rect width="40" height="20" fill="#ff0000"/>
    </svg>"##;
    let tree = parse_svg(svg).unwrap();
    let img = rasterize_svg_fit(&tree, 64).unwrap();
    assert_eq!((img.width, img.height), (64, 32));
    assert_eq!(img.rgba8_premul.len(), 64 * 32 * 4);
    let center = ((16 * 64 + 32) * 4) as usize;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}

#[test]
fn paint_rejects_mismatched_buffers() {
    let img = DecodedImage {
        width: 2,
        height: 2,
        rgba8_premul: vec![0; 4],
    };
    assert!(img.into_paint().is_err());
}

#[test]
fn rel_paths_are_normalized() {
    assert_eq!(normalize_rel_path("./logo//top.svg").unwrap(), "logo/top.svg");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}
