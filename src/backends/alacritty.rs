use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};
use crate::theme::Palette;

use super::ThemeBackend;

/// Alacritty terminal backend.
///
/// Writes `colors.primary.background` and `colors.primary.foreground`. The
/// format follows the file extension: `.toml` is TOML, anything else YAML.
/// A missing config is skipped.
pub struct AlacrittyBackend {
    path: PathBuf,
}

impl AlacrittyBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn is_toml(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
    }
}

impl ThemeBackend for AlacrittyBackend {
    fn name(&self) -> &str {
        "Alacritty"
    }

    fn config_path(&self) -> &Path {
        &self.path
    }

    fn requires_config(&self) -> bool {
        false
    }

    fn render(&self, existing: &str, palette: &Palette) -> Result<String> {
        let colors = [
            ("background", palette.background.to_hex()),
            ("foreground", palette.foreground.to_hex()),
        ];
        if self.is_toml() {
            render_toml(existing, &colors, &self.path)
        } else {
            render_yaml(existing, &colors, &self.path)
        }
    }
}

fn render_yaml(existing: &str, colors: &[(&str, String)], path: &Path) -> Result<String> {
    let mut doc: YamlValue = if existing.trim().is_empty() {
        YamlValue::Null
    } else {
        serde_yaml::from_str(existing).map_err(|e| Error::malformed(path, e.to_string()))?
    };
    if doc.is_null() {
        doc = YamlValue::Mapping(Mapping::new());
    }
    let root = doc
        .as_mapping_mut()
        .ok_or_else(|| Error::malformed(path, "top level is not a mapping"))?;

    let primary = yaml_child(yaml_child(root, "colors", path)?, "primary", path)?;
    for (key, hex) in colors {
        primary.insert(
            YamlValue::String((*key).to_string()),
            YamlValue::String(hex.clone()),
        );
    }

    serde_yaml::to_string(&doc).map_err(|e| Error::malformed(path, e.to_string()))
}

/// Get the mapping under `key`, creating it when absent or null.
fn yaml_child<'a>(map: &'a mut Mapping, key: &str, path: &Path) -> Result<&'a mut Mapping> {
    if matches!(map.get(key), None | Some(YamlValue::Null)) {
        map.insert(
            YamlValue::String(key.to_string()),
            YamlValue::Mapping(Mapping::new()),
        );
    }
    match map.get_mut(key) {
        Some(YamlValue::Mapping(child)) => Ok(child),
        _ => Err(Error::malformed(path, format!("`{key}` is not a mapping"))),
    }
}

fn render_toml(existing: &str, colors: &[(&str, String)], path: &Path) -> Result<String> {
    let mut doc: toml::Table = existing
        .parse()
        .map_err(|e: toml::de::Error| Error::malformed(path, e.message().to_string()))?;

    let primary = toml_child(toml_child(&mut doc, "colors", path)?, "primary", path)?;
    for (key, hex) in colors {
        primary.insert((*key).to_string(), toml::Value::String(hex.clone()));
    }

    toml::to_string(&doc).map_err(|e| Error::malformed(path, e.to_string()))
}

fn toml_child<'a>(
    table: &'a mut toml::Table,
    key: &str,
    path: &Path,
) -> Result<&'a mut toml::Table> {
    match table
        .entry(key)
        .or_insert(toml::Value::Table(toml::Table::new()))
    {
        toml::Value::Table(child) => Ok(child),
        _ => Err(Error::malformed(path, format!("`{key}` is not a table"))),
    }
}
