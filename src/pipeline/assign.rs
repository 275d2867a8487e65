use std::path::Path;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::extract::{extract_swatches, load_and_prepare, Swatch};
use crate::theme::{Palette, Role};

/// Positions 0, 1 and 2 must exist.
pub const MIN_SWATCHES: usize = 3;
/// Upper bound on the HSL lightness of the color at sorted index 1.
pub const BACKGROUND_MAX_LIGHTNESS: f32 = 0.1;

/// A palette together with the sequence it was assigned from.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub palette: Palette,
    /// Colors sorted by lightness (reversed when derived with `reverse`),
    /// after the background clamp.
    pub sorted: Vec<Color>,
    /// Swatches as extracted, sorted ascending by lightness.
    pub swatches: Vec<Swatch>,
}

/// Extract up to `sample_count` swatches from the image and assign roles.
pub fn derive(path: &Path, reverse: bool, sample_count: usize) -> Result<Derivation> {
    let pixels = load_and_prepare(path)?;
    let swatches = extract_swatches(&pixels, sample_count);
    log::debug!(
        "extracted {} swatches from {}",
        swatches.len(),
        path.display()
    );
    derive_from_swatches(swatches, reverse)
}

/// Sort swatches by lightness, clamp the background candidate, optionally
/// reverse, then assign roles.
pub fn derive_from_swatches(mut swatches: Vec<Swatch>, reverse: bool) -> Result<Derivation> {
    if swatches.len() < MIN_SWATCHES {
        return Err(Error::InsufficientPalette {
            found: swatches.len(),
        });
    }

    swatches.sort_by(|a, b| a.color.lightness().total_cmp(&b.color.lightness()));

    let mut sorted: Vec<Color> = swatches.iter().map(|s| s.color).collect();
    sorted[1] = sorted[1].with_max_lightness(BACKGROUND_MAX_LIGHTNESS);

    if reverse {
        sorted.reverse();
    }

    let palette = assign_roles(&sorted)?;
    Ok(Derivation {
        palette,
        sorted,
        swatches,
    })
}

/// Index in a sequence of `len` colors that a role is taken from.
pub fn role_index(role: Role, len: usize) -> usize {
    match role {
        Role::High => 0,
        Role::Background => 1,
        Role::Accent => 2,
        Role::Primary => len.saturating_sub(1) / 2,
        Role::Foreground => len.saturating_sub(1),
    }
}

/// Map a lightness-ordered color sequence onto the five palette roles by
/// fixed position.
pub fn assign_roles(sorted: &[Color]) -> Result<Palette> {
    if sorted.len() < MIN_SWATCHES {
        return Err(Error::InsufficientPalette {
            found: sorted.len(),
        });
    }
    let at = |role| sorted[role_index(role, sorted.len())];
    Ok(Palette {
        primary: at(Role::Primary),
        background: at(Role::Background),
        foreground: at(Role::Foreground),
        high: at(Role::High),
        accent: at(Role::Accent),
    })
}
