use std::ops::RangeInclusive;
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};

use crate::color::Color;
use crate::error::{Error, Result};

/// A dominant color extracted from the image with its pixel population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub color: Color,
    /// Fraction of sampled pixels in this cluster, in (0, 1].
    pub weight: f32,
}

/// Number of dominant colors requested when the caller does not say.
pub const DEFAULT_SAMPLES: usize = 10;
/// Accepted sample counts: three roles need distinct positions, and k-means
/// cluster indices are stored as u8.
pub const SAMPLE_RANGE: RangeInclusive<usize> = 3..=255;

const MAX_DIM: u32 = 256;
const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const SEED: u64 = 42;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5

/// Open an image, distinguishing a missing file from an undecodable one.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| {
        if !path.exists() {
            Error::ImageNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Image {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Load an image, resize to fit within 256x256 (preserving aspect ratio),
/// and convert all pixels to CIELAB space.
pub fn load_and_prepare(path: &Path) -> Result<Vec<Lab>> {
    let img = open_image(path)?;

    let img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        img.resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb_img = img.to_rgb8();

    let pixels: Vec<Lab> = rgb_img
        .pixels()
        .map(|p| {
            let srgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
            srgb.into_color()
        })
        .collect();

    Ok(pixels)
}

/// Run K-means on LAB pixels to extract up to `k` dominant colors, with `k`
/// clamped into [`SAMPLE_RANGE`].
///
/// Returns deduplicated swatches sorted by weight (descending). Uses Hamerly's
/// algorithm with K-means++ initialization and a fixed seed, so the same
/// pixels always yield the same swatches.
pub fn extract_swatches(pixels: &[Lab], k: usize) -> Vec<Swatch> {
    if pixels.is_empty() {
        return Vec::new();
    }
    let k = k.clamp(*SAMPLE_RANGE.start(), *SAMPLE_RANGE.end());
    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED);

    let total = pixels.len() as f32;

    // Count pixels per centroid to compute weights
    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut swatches: Vec<Swatch> = result
        .centroids
        .iter()
        .enumerate()
        .filter(|(i, _)| counts[*i] > 0)
        .map(|(i, lab)| Swatch {
            color: Color::from_lab(*lab),
            weight: counts[i] as f32 / total,
        })
        .collect();

    deduplicate(&mut swatches);

    swatches.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    swatches
}

/// Merge swatches that are too similar (ΔE < 5 in LAB space).
/// Keeps the first swatch and accumulates the weight.
fn deduplicate(swatches: &mut Vec<Swatch>) {
    let mut i = 0;
    while i < swatches.len() {
        let mut j = i + 1;
        while j < swatches.len() {
            let lab_i = swatches[i].color.to_lab();
            let lab_j = swatches[j].color.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                swatches[i].weight += swatches[j].weight;
                swatches.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}
