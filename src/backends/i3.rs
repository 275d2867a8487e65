use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::theme::Palette;

use super::ThemeBackend;

/// Prefix of every i3 window color rule.
const RULE_PREFIX: &str = "client.";

/// i3 window manager backend.
///
/// Drops every `client.*` color rule and appends four freshly generated ones.
/// All other lines keep their content and relative order.
pub struct I3Backend {
    path: PathBuf,
}

impl I3Backend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ThemeBackend for I3Backend {
    fn name(&self) -> &str {
        "i3"
    }

    fn config_path(&self) -> &Path {
        &self.path
    }

    fn render(&self, existing: &str, palette: &Palette) -> Result<String> {
        let mut lines: Vec<String> = existing
            .lines()
            .filter(|line| !line.trim_start().starts_with(RULE_PREFIX))
            .map(str::to_string)
            .collect();
        lines.extend(color_rules(palette));

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}

/// `client.*` rules: border, background, text, indicator. Hex suffixes are
/// alpha channels.
fn color_rules(palette: &Palette) -> [String; 4] {
    let bg = palette.background.to_hex();
    let fg = palette.foreground.to_hex();
    [
        format!("client.focused\t{bg}55 {bg} {fg} {bg}55"),
        format!("client.focused_inactive\t{bg}33 {bg}33 {fg}33 {bg}33"),
        format!("client.unfocused\t{bg}33 {bg}33 {fg}33 {bg}33"),
        format!("client.background\t{bg}"),
    ]
}
