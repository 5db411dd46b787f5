use memetg_rs::{compose, ArtAreaRect, CompositeOptions, ImageSmoothingQuality, LoadedImage};
use rstest::rstest;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> LoadedImage {
    LoadedImage::from_rgba(width, height, rgba.repeat((width * height) as usize)).unwrap()
}

fn gradient(width: u32, height: u32) -> LoadedImage {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    LoadedImage::from_rgba(width, height, rgba).unwrap()
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

fn is_red(px: [u8; 4]) -> bool {
    px[0] >= 250 && px[1] <= 5 && px[2] <= 5 && px[3] == 255
}

#[test]
fn test_output_resolution_is_natural_resolution() {
    let card = solid(672, 936, [0, 0, 255, 255]);
    let background = solid(300, 200, [255, 0, 0, 255]);

    let result = compose(&card, Some(&background), &CompositeOptions::default()).unwrap();
    assert_eq!((result.width, result.height), (672, 936));
    assert_eq!(decode(&result.png).dimensions(), (672, 936));
}

#[rstest]
#[case(ImageSmoothingQuality::Low)]
#[case(ImageSmoothingQuality::High)]
fn test_background_fills_art_area(#[case] smoothing: ImageSmoothingQuality) {
    // Art area of a 1000x1400 card is x=80, y=154, w=840, h=630
    let card = solid(1000, 1400, [0, 0, 255, 255]);
    let background = solid(16, 9, [255, 0, 0, 255]);
    let options = CompositeOptions {
        smoothing,
        ..CompositeOptions::default()
    };

    let result = compose(&card, Some(&background), &options).unwrap();
    let out = decode(&result.png);

    for (x, y) in [(82, 156), (500, 469), (917, 781)] {
        assert!(is_red(out.get_pixel(x, y).0), "({x},{y}) should be overlaid");
    }
    for (x, y) in [(10, 10), (75, 469), (925, 469), (500, 150), (500, 790), (500, 1300)] {
        assert_eq!(out.get_pixel(x, y).0, [0, 0, 255, 255], "({x},{y}) should be card");
    }
}

#[test]
fn test_background_aspect_ratio_not_preserved() {
    // A very wide background still covers the full height of the art area
    let card = solid(672, 936, [0, 0, 255, 255]);
    let background = solid(1000, 10, [255, 0, 0, 255]);

    let result = compose(&card, Some(&background), &CompositeOptions::default()).unwrap();
    let out = decode(&result.png);

    // Art area: x=53.76, y=102.96, w=564.48, h=421.2 -> rows 104..=522 fully covered
    assert!(is_red(out.get_pixel(336, 105).0));
    assert!(is_red(out.get_pixel(336, 521).0));
    assert!(is_red(out.get_pixel(56, 300).0));
    assert!(is_red(out.get_pixel(615, 300).0));
    assert_eq!(out.get_pixel(336, 528).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(50, 300).0, [0, 0, 255, 255]);
}

#[test]
fn test_without_background_card_is_unmodified() {
    let card = gradient(320, 448);
    let result = compose(&card, None, &CompositeOptions::default()).unwrap();
    assert_eq!(decode(&result.png).into_raw(), card.rgba());
}

#[test]
fn test_custom_art_area() {
    let card = solid(100, 100, [0, 0, 255, 255]);
    let background = solid(2, 2, [255, 0, 0, 255]);
    let options = CompositeOptions {
        art_area: ArtAreaRect {
            top_pct: 50.0,
            side_pct: 0.0,
            height_pct: 50.0,
        },
        ..CompositeOptions::default()
    };

    let out = decode(&compose(&card, Some(&background), &options).unwrap().png);
    assert!(is_red(out.get_pixel(50, 75).0));
    assert_eq!(out.get_pixel(50, 25).0, [0, 0, 255, 255]);
}

#[test]
fn test_overlapping_exports_are_independent() {
    let card = gradient(64, 90);
    let red = solid(4, 4, [255, 0, 0, 255]);
    let options = CompositeOptions::default();

    let with_overlay = compose(&card, Some(&red), &options).unwrap();
    let without = compose(&card, None, &options).unwrap();
    let again = compose(&card, Some(&red), &options).unwrap();

    assert_eq!(with_overlay, again);
    assert_eq!(decode(&without.png).into_raw(), card.rgba());
}
