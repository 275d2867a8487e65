use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::cli::ThemeMode;
use crate::error::{Error, Result};
use crate::pipeline::assign::derive;
use crate::pipeline::detect::{is_bright_image, BRIGHTNESS_THRESHOLD, SAMPLE_DIM};
use crate::pipeline::enhance::{change_brightness, DARKEN_FACTOR, LIGHTEN_FACTOR};
use crate::pipeline::extract::{open_image, DEFAULT_SAMPLES};
use crate::theme::PALETTE_FILE;
use crate::wallpaper::WallpaperSetter;

pub const DARK_IMAGE: &str = "dark.png";
pub const LIGHT_IMAGE: &str = "light.png";

/// Tunables for [`publish`].
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub sample_count: usize,
    pub sample_dim: u32,
    pub threshold: f32,
    pub darken: f32,
    pub lighten: f32,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLES,
            sample_dim: SAMPLE_DIM,
            threshold: BRIGHTNESS_THRESHOLD,
            darken: DARKEN_FACTOR,
            lighten: LIGHTEN_FACTOR,
        }
    }
}

/// Everything a publish run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    /// Classification of the source image.
    pub source_mode: ThemeMode,
    pub dark_image: PathBuf,
    pub light_image: PathBuf,
    pub dark_palette: PathBuf,
    pub light_palette: PathBuf,
}

/// Produce both wallpaper variants and palettes, then set the light variant
/// as the wallpaper.
///
/// Steps run in order and the first failure aborts the rest; files already
/// written stay in place.
pub fn publish(
    image_path: &Path,
    dark_dir: &Path,
    light_dir: &Path,
    setter: &dyn WallpaperSetter,
    options: &PublishOptions,
) -> Result<PublishReport> {
    ensure_dir(dark_dir, "dark")?;
    ensure_dir(light_dir, "light")?;

    let source = open_image(image_path)?;
    let dark_image = dark_dir.join(DARK_IMAGE);
    let light_image = light_dir.join(LIGHT_IMAGE);

    let source_mode = if is_bright_image(&source, options.sample_dim, options.threshold) {
        log::info!("{} is bright, creating a darker version", image_path.display());
        save(&change_brightness(&source, options.darken), &dark_image)?;
        save(&source, &light_image)?;
        ThemeMode::Light
    } else {
        log::info!("{} is dark, creating a lighter version", image_path.display());
        save(&change_brightness(&source, options.lighten), &light_image)?;
        save(&source, &dark_image)?;
        ThemeMode::Dark
    };

    setter.apply(&light_image)?;

    let dark_palette = dark_dir.join(PALETTE_FILE);
    derive(image_path, false, options.sample_count)?
        .palette
        .save(&dark_palette)?;

    let light_palette = light_dir.join(PALETTE_FILE);
    derive(image_path, true, options.sample_count)?
        .palette
        .save(&light_palette)?;

    Ok(PublishReport {
        source_mode,
        dark_image,
        light_image,
        dark_palette,
        light_palette,
    })
}

fn ensure_dir(dir: &Path, label: &str) -> Result<()> {
    if !dir.exists() {
        log::info!("creating {label}-theme folder at {}", dir.display());
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

fn save(img: &DynamicImage, path: &Path) -> Result<()> {
    img.save(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("image saved at {}", path.display());
    Ok(())
}
