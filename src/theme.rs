use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};

/// Name of the palette file written next to each wallpaper variant.
pub const PALETTE_FILE: &str = "palette.json";

/// A semantic slot of a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Background,
    Foreground,
    Primary,
    Accent,
    High,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Background,
        Role::Foreground,
        Role::Primary,
        Role::Accent,
        Role::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Background => "background",
            Role::Foreground => "foreground",
            Role::Primary => "primary",
            Role::Accent => "accent",
            Role::High => "high",
        }
    }
}

/// The five-role color mapping derived from a wallpaper.
///
/// Serialized as a flat JSON object of role name to `#rrggbb`. Every role is
/// required when reading one back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Color,
    pub background: Color,
    pub foreground: Color,
    pub high: Color,
    pub accent: Color,
}

impl Palette {
    pub fn get(&self, role: Role) -> Color {
        match role {
            Role::Background => self.background,
            Role::Foreground => self.foreground,
            Role::Primary => self.primary,
            Role::Accent => self.accent,
            Role::High => self.high,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Parse palette JSON; `path` only labels errors.
    pub fn from_json(raw: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::malformed(path, e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json().map_err(|e| Error::io(path, e.into()))?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("palette written to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::MissingConfigFile {
                    path: path.to_path_buf(),
                }
            } else {
                Error::io(path, e)
            }
        })?;
        Self::from_json(&raw, path)
    }
}
