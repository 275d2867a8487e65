use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::theme::{Palette, Role};

use super::ThemeBackend;

pub const DEFAULT_SECTION: &str = "color";

/// Default INI key for each role written into the status bar colors.
pub fn default_keys() -> Vec<(String, Role)> {
    vec![
        ("background".to_string(), Role::Background),
        ("foreground".to_string(), Role::Foreground),
    ]
}

/// Polybar status bar backend.
///
/// Sets `key = #rrggbb` for each configured key inside one INI section.
/// Everything else in the file, comments included, is left as is.
pub struct PolybarBackend {
    path: PathBuf,
    section: String,
    keys: Vec<(String, Role)>,
}

impl PolybarBackend {
    pub fn new(path: PathBuf, section: String, keys: Vec<(String, Role)>) -> Self {
        Self {
            path,
            section,
            keys,
        }
    }
}

impl ThemeBackend for PolybarBackend {
    fn name(&self) -> &str {
        "Polybar"
    }

    fn config_path(&self) -> &Path {
        &self.path
    }

    fn render(&self, existing: &str, palette: &Palette) -> Result<String> {
        let values: Vec<(&str, String)> = self
            .keys
            .iter()
            .map(|(key, role)| (key.as_str(), palette.get(*role).to_hex()))
            .collect();
        Ok(set_ini_values(existing, &self.section, &values))
    }
}

fn section_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Byte index of the key/value separator, ignoring comment lines.
fn separator(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    if trimmed.starts_with(';') || trimmed.starts_with('#') {
        return None;
    }
    line.find(|c| c == '=' || c == ':')
}

/// Set `values` inside `[section]`.
///
/// Existing keys (matched case-insensitively) are rewritten in place keeping
/// their spacing. Missing keys are appended after the last entry of the
/// section; a missing section is appended to the end of the file.
pub fn set_ini_values(text: &str, section: &str, values: &[(&str, String)]) -> String {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut found = vec![false; values.len()];
    let mut current: Option<String> = None;
    let mut insert_at: Option<usize> = None;

    for (idx, line) in lines.iter_mut().enumerate() {
        if let Some(name) = section_name(line) {
            current = Some(name.to_string());
            if name == section && insert_at.is_none() {
                insert_at = Some(idx + 1);
            }
            continue;
        }
        if current.as_deref() != Some(section) {
            continue;
        }
        let Some(sep) = separator(line) else {
            continue;
        };
        let key = line[..sep].trim();
        if let Some(pos) = values.iter().position(|(k, _)| k.eq_ignore_ascii_case(key)) {
            let rest = &line[sep + 1..];
            let spacing = &rest[..rest.len() - rest.trim_start().len()];
            *line = format!("{}{}{}", &line[..=sep], spacing, values[pos].1);
            found[pos] = true;
        }
    }

    let missing: Vec<String> = values
        .iter()
        .zip(&found)
        .filter(|(_, done)| !**done)
        .map(|((key, value), _)| format!("{key} = {value}"))
        .collect();

    if !missing.is_empty() {
        match insert_at {
            Some(start) => {
                let end = section_end(&lines, start);
                lines.splice(end..end, missing);
            }
            None => {
                if lines.last().is_some_and(|l| !l.trim().is_empty()) {
                    lines.push(String::new());
                }
                lines.push(format!("[{section}]"));
                lines.extend(missing);
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Index just past the last non-blank line of the section starting at
/// `start`.
fn section_end(lines: &[String], start: usize) -> usize {
    let mut end = start;
    for (idx, line) in lines.iter().enumerate().skip(start) {
        if section_name(line).is_some() {
            break;
        }
        if !line.trim().is_empty() {
            end = idx + 1;
        }
    }
    end
}
