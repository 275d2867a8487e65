use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::color::Color;
use crate::error::Result;
use crate::pipeline::extract::open_image;

/// Side of the square grid the image is sampled on.
pub const SAMPLE_DIM: u32 = 10;
/// Mean normalized lightness above which an image counts as bright.
pub const BRIGHTNESS_THRESHOLD: f32 = 0.5;

/// Classify the image at `path` as bright (true) or dark (false).
pub fn is_bright(path: &Path, sample_dim: u32, threshold: f32) -> Result<bool> {
    let img = open_image(path)?;
    Ok(is_bright_image(&img, sample_dim, threshold))
}

/// Downsample to a `sample_dim` square, take CIELAB L of every cell and
/// compare the mean (normalized by the brightest cell) against `threshold`.
pub fn is_bright_image(img: &DynamicImage, sample_dim: u32, threshold: f32) -> bool {
    let dim = sample_dim.max(1);
    let grid = img.resize_exact(dim, dim, FilterType::Triangle).to_rgb8();
    let samples: Vec<f32> = grid
        .pixels()
        .map(|p| Color::new(p[0], p[1], p[2]).to_lab().l)
        .collect();
    classify_lightness(&samples, threshold)
}

/// True iff the mean of `samples / max(samples)` is strictly greater than
/// `threshold`. An empty or all-black grid is dark.
pub fn classify_lightness(samples: &[f32], threshold: f32) -> bool {
    let max = samples.iter().copied().fold(0.0_f32, f32::max);
    if samples.is_empty() || max <= 0.0 {
        return false;
    }
    let mean = samples.iter().map(|l| l / max).sum::<f32>() / samples.len() as f32;
    mean > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |_, _| {
            image::Rgb(rgb)
        }))
    }

    #[test]
    fn white_is_bright() {
        assert!(is_bright_image(&solid(16, 16, [255, 255, 255]), SAMPLE_DIM, 0.5));
    }

    #[test]
    fn black_is_dark() {
        assert!(!is_bright_image(&solid(16, 16, [0, 0, 0]), SAMPLE_DIM, 0.5));
    }

    #[test]
    fn mean_exactly_at_threshold_is_dark() {
        assert!(!classify_lightness(&[100.0, 0.0, 100.0, 0.0], 0.5));
        assert!(classify_lightness(&[100.0, 1.0, 100.0, 0.0], 0.5));
    }

    #[test]
    fn normalizes_by_brightest_sample() {
        // 20/40 and 40/40 average to 0.75 regardless of absolute level
        assert!(classify_lightness(&[20.0, 40.0], 0.7));
        assert!(!classify_lightness(&[20.0, 40.0], 0.75));
    }

    #[test]
    fn empty_samples_are_dark() {
        assert!(!classify_lightness(&[], 0.5));
    }

    #[test]
    fn dark_field_with_highlights_is_dark() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(100, 100, |x, y| {
            if x < 20 && y < 20 {
                image::Rgb([250, 250, 250])
            } else {
                image::Rgb([32, 32, 32])
            }
        }));
        assert!(!is_bright_image(&img, SAMPLE_DIM, BRIGHTNESS_THRESHOLD));
    }

    #[test]
    fn is_bright_reads_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let white = dir.path().join("white.png");
        let black = dir.path().join("black.png");
        solid(12, 12, [255, 255, 255]).save(&white).unwrap();
        solid(12, 12, [0, 0, 0]).save(&black).unwrap();

        assert!(is_bright(&white, SAMPLE_DIM, BRIGHTNESS_THRESHOLD).unwrap());
        assert!(!is_bright(&black, SAMPLE_DIM, BRIGHTNESS_THRESHOLD).unwrap());
    }

    #[test]
    fn is_bright_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = is_bright(&dir.path().join("none.png"), SAMPLE_DIM, BRIGHTNESS_THRESHOLD)
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::ImageNotFound { .. }));
    }
}
