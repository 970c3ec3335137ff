//! Overlay compositing.
//!
//! The overlay is stretched to the background size and blended with
//! straight-alpha "over". Output keeps the background's encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use steamgrid_artwork::ImageKind;

use crate::error::GridError;
use crate::game::{Game, StageOutcome};
use crate::overlays::OverlayCatalog;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Composites the category overlay onto the game's clean image.
///
/// The clean image is left untouched; the result goes to `overlaid`.
pub fn apply_overlay(game: &Game, overlays: &OverlayCatalog, jpeg_quality: u8) -> StageOutcome {
    let Some(image) = &game.image else {
        return StageOutcome::Unchanged;
    };
    let Some(overlay) = overlays.get(&game.category) else {
        return StageOutcome::Unchanged;
    };

    match composite(&image.bytes, image.kind, &overlay.image, jpeg_quality) {
        Ok(bytes) => {
            tracing::debug!(game = %game.id, category = %overlay.category, "applied overlay");
            StageOutcome::Updated(Game {
                overlaid: Some(bytes),
                ..game.clone()
            })
        }
        Err(e) => StageOutcome::Failed(e),
    }
}

/// Decodes `background`, blends `overlay` over it and re-encodes as `kind`.
pub fn composite(
    background: &[u8],
    kind: ImageKind,
    overlay: &RgbaImage,
    jpeg_quality: u8,
) -> Result<Vec<u8>, GridError> {
    let decoded = image::load_from_memory_with_format(background, kind.image_format())
        .map_err(GridError::Decode)?;
    let mut canvas = decoded.to_rgba8();

    let (width, height) = canvas.dimensions();
    let stretched;
    let overlay = if overlay.dimensions() == (width, height) {
        overlay
    } else {
        stretched = imageops::resize(overlay, width, height, FilterType::Lanczos3);
        &stretched
    };

    for (bg, fg) in canvas.pixels_mut().zip(overlay.pixels()) {
        *bg = blend_over(*bg, *fg);
    }

    encode(canvas, kind, jpeg_quality)
}

fn encode(canvas: RgbaImage, kind: ImageKind, jpeg_quality: u8) -> Result<Vec<u8>, GridError> {
    let mut buf = Vec::new();
    match kind {
        ImageKind::Png => DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut buf), kind.image_format())
            .map_err(GridError::Encode)?,
        ImageKind::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            DynamicImage::ImageRgb8(rgb)
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, jpeg_quality))
                .map_err(GridError::Encode)?
        }
    }
    Ok(buf)
}

/// Straight-alpha `fg` over `bg`.
pub fn blend_over(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
    let fa = f32::from(fg[3]) / 255.0;
    if fa <= 0.0 {
        return bg;
    }
    let ba = f32::from(bg[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let fc = f32::from(fg[i]) / 255.0;
        let bc = f32::from(bg[i]) / 255.0;
        let c = (fc * fa + bc * ba * (1.0 - fa)) / out_a;
        out[i] = to_channel(c);
    }
    out[3] = to_channel(out_a);
    Rgba(out)
}

fn to_channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameImage, GameRecord, ImageSource};
    use crate::overlays::load_overlays;
    use crate::testutil;
    use std::fs;

    fn game(category: &str, bytes: Vec<u8>) -> Game {
        let game = Game::from(GameRecord {
            id: "42".into(),
            name: Some("Foo".into()),
            category: category.into(),
        });
        game.with_image(GameImage::sniff(bytes, ImageSource::Official).unwrap())
    }

    fn catalog(files: &[(&str, Vec<u8>)]) -> (tempfile::TempDir, OverlayCatalog) {
        let tmp = tempfile::tempdir().unwrap();
        for (name, bytes) in files {
            fs::write(tmp.path().join(name), bytes).unwrap();
        }
        let catalog = load_overlays(tmp.path()).unwrap();
        (tmp, catalog)
    }

    #[test]
    fn blend_opaque_and_transparent() {
        let bg = Rgba([10, 20, 30, 255]);
        assert_eq!(blend_over(bg, Rgba([200, 100, 50, 0])), bg);
        assert_eq!(
            blend_over(bg, Rgba([200, 100, 50, 255])),
            Rgba([200, 100, 50, 255])
        );
    }

    #[test]
    fn blend_half_alpha_on_opaque() {
        let out = blend_over(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        assert_eq!(out[3], 255);
        assert!((127..=129).contains(&out[0]), "got {out:?}");
    }

    #[test]
    fn blend_onto_transparent_keeps_overlay_color() {
        let out = blend_over(Rgba([0, 0, 0, 0]), Rgba([200, 100, 50, 128]));
        assert_eq!(out, Rgba([200, 100, 50, 128]));
    }

    #[test]
    fn no_overlay_for_category_is_unchanged() {
        let (_tmp, overlays) = catalog(&[("indie.png", testutil::png(2, 2, [255, 0, 0, 255]))]);
        let game = game("Action", testutil::jpeg(4, 4, [0, 0, 0]));
        assert!(matches!(
            apply_overlay(&game, &overlays, DEFAULT_JPEG_QUALITY),
            StageOutcome::Unchanged
        ));
    }

    #[test]
    fn png_overlay_stretched_onto_png() {
        let (_tmp, overlays) = catalog(&[("indie.png", testutil::png(1, 1, [255, 0, 0, 255]))]);
        let clean = testutil::png(6, 3, [0, 0, 255, 255]);
        let game = game("Indie", clean.clone());

        let StageOutcome::Updated(out) = apply_overlay(&game, &overlays, DEFAULT_JPEG_QUALITY)
        else {
            panic!("expected overlay");
        };
        assert_eq!(out.image.as_ref().unwrap().bytes, clean);

        let result = image::load_from_memory(out.overlaid.as_ref().unwrap())
            .unwrap()
            .to_rgba8();
        assert_eq!(result.dimensions(), (6, 3));
        assert_eq!(result.get_pixel(5, 2).0, [255, 0, 0, 255]);
        assert_eq!(ImageKind::sniff(out.overlaid.as_ref().unwrap()), Some(ImageKind::Png));
    }

    #[test]
    fn jpeg_stays_jpeg_and_is_deterministic() {
        let (_tmp, overlays) = catalog(&[("indie.png", testutil::png(8, 8, [255, 255, 255, 100]))]);
        let game = game("indie", testutil::jpeg(16, 8, [20, 40, 60]));

        let first = apply_overlay(&game, &overlays, DEFAULT_JPEG_QUALITY);
        let second = apply_overlay(&game, &overlays, DEFAULT_JPEG_QUALITY);
        let (StageOutcome::Updated(a), StageOutcome::Updated(b)) = (first, second) else {
            panic!("expected overlays");
        };
        let bytes = a.overlaid.unwrap();
        assert_eq!(ImageKind::sniff(&bytes), Some(ImageKind::Jpeg));
        assert_ne!(bytes, a.image.unwrap().bytes);
        assert_eq!(Some(bytes), b.overlaid);
    }

    #[test]
    fn corrupt_clean_image_fails_recoverably() {
        let (_tmp, overlays) = catalog(&[("indie.png", testutil::png(1, 1, [0, 0, 0, 255]))]);
        // Valid JPEG magic, truncated body.
        let mut truncated = testutil::jpeg(8, 8, [0, 0, 0]);
        truncated.truncate(20);
        let game = game("indie", truncated);

        let StageOutcome::Failed(err) = apply_overlay(&game, &overlays, DEFAULT_JPEG_QUALITY)
        else {
            panic!("expected failure");
        };
        assert!(matches!(err, GridError::Decode(_)));
        assert!(!err.is_fatal());
    }
}
