use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::theme::Palette;

use super::ThemeBackend;

const CUSTOMIZATIONS_KEY: &str = "workbench.colorCustomizations";

/// VS Code editor backend.
///
/// Replaces the whole `workbench.colorCustomizations` block of
/// `settings.json`. Comments and trailing commas in the input are accepted;
/// the output is plain JSON with the original key order.
pub struct VscodeBackend {
    path: PathBuf,
}

impl VscodeBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ThemeBackend for VscodeBackend {
    fn name(&self) -> &str {
        "VS Code"
    }

    fn config_path(&self) -> &Path {
        &self.path
    }

    fn render(&self, existing: &str, palette: &Palette) -> Result<String> {
        let cleaned = strip_jsonc(existing);
        let mut settings = if cleaned.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&cleaned)
                .map_err(|e| Error::malformed(&self.path, e.to_string()))?
        };

        let object = settings
            .as_object_mut()
            .ok_or_else(|| Error::malformed(&self.path, "settings are not a JSON object"))?;
        object.insert(CUSTOMIZATIONS_KEY.to_string(), color_customizations(palette));

        let mut out = serde_json::to_string_pretty(&settings)
            .map_err(|e| Error::malformed(&self.path, e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}

/// The workbench colors, with receded surfaces derived from the background and
/// primary roles by lightness scaling.
fn color_customizations(palette: &Palette) -> Value {
    let regular = palette.background.to_hex();
    let accent = palette.accent.to_hex();
    let foreground = palette.foreground.to_hex();
    let primary_dark = palette.primary.adjust(0.36).to_hex();
    let primary_darkest = palette.primary.adjust(0.31).to_hex();
    let dark = palette.background.adjust(0.8).to_hex();
    let light = palette.background.adjust(1.7).to_hex();

    let entries = [
        ("menu.background", &regular),
        ("badge.background", &accent),
        ("input.background", &regular),
        ("panel.background", &regular),
        ("banner.background", &regular),
        ("button.background", &regular),
        ("editor.background", &regular),
        ("sideBar.background", &dark),
        ("minimap.background", &regular),
        ("tab.hoverBackground", &primary_darkest),
        ("terminal.background", &regular),
        ("breadcrumb.background", &regular),
        ("editor.selectionBackground", &light),
        ("list.inactiveSelectionBackground", &regular),
        ("tab.inactiveBackground", &dark),
        ("editorGroupHeader.tabsBackground", &regular),
        ("tab.activeBackground", &regular),
        ("sideBarSectionHeader.background", &regular),
        ("activityBar.background", &regular),
        ("editorWidget.background", &dark),
        ("editor.lineHighlightBackground", &light),
        ("activityBar.activeBackground", &primary_dark),
        ("foreground", &foreground),
        ("focusBorder", &foreground),
        ("icon.foreground", &accent),
        ("statusBar.background", &primary_dark),
        ("titleBar.activeBackground", &primary_dark),
    ];

    Value::Object(
        entries
            .into_iter()
            .map(|(key, hex)| (key.to_string(), Value::String(hex.clone())))
            .collect(),
    )
}

/// Remove `//` and `/* */` comments and trailing commas outside of strings.
pub fn strip_jsonc(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&n| n != '\n').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => out.push(c),
        }
    }

    strip_trailing_commas(&out)
}

fn strip_trailing_commas(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use proptest::prelude::*;

    fn palette() -> Palette {
        Palette {
            primary: Color::new(0xa1, 0xb2, 0xc3),
            background: Color::new(0x10, 0x10, 0x10),
            foreground: Color::new(0xee, 0xee, 0xee),
            high: Color::new(0xff, 0xff, 0xff),
            accent: Color::new(0xff, 0x88, 0x00),
        }
    }

    fn render(existing: &str) -> Value {
        let out = VscodeBackend::new(PathBuf::from("settings.json"))
            .render(existing, &palette())
            .unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn customizations_block_is_replaced() {
        let settings = render(
            r##"{"editor.fontSize": 13, "workbench.colorCustomizations": {"old.key": "#000000"}}"##,
        );
        let colors = settings[CUSTOMIZATIONS_KEY].as_object().unwrap();
        assert_eq!(colors.len(), 27);
        assert!(!colors.contains_key("old.key"));
        assert_eq!(colors["editor.background"], "#101010");
        assert_eq!(colors["badge.background"], "#ff8800");
        assert_eq!(colors["foreground"], "#eeeeee");
        assert_eq!(
            colors["statusBar.background"],
            palette().primary.adjust(0.36).to_hex().as_str()
        );
        assert_eq!(settings["editor.fontSize"], 13);
    }

    #[test]
    fn receded_surfaces_are_darker() {
        let settings = render("{}");
        let colors = &settings[CUSTOMIZATIONS_KEY];
        let hex = |key: &str| Color::from_hex(colors[key].as_str().unwrap()).unwrap();
        assert!(hex("sideBar.background").lightness() < palette().background.lightness());
        assert!(hex("tab.hoverBackground").lightness() < palette().primary.lightness());
        assert!(
            hex("editor.lineHighlightBackground").lightness() > palette().background.lightness()
        );
    }

    #[test]
    fn key_order_is_preserved() {
        let settings = render(r#"{"z.last": 1, "a.first": 2}"#);
        let keys: Vec<&String> = settings.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z.last", "a.first", CUSTOMIZATIONS_KEY]);
    }

    #[test]
    fn comments_and_trailing_commas_are_accepted() {
        let settings = render(
            r#"{
    // line comment
    "files.exclude": { "**/.git": true, },
    /* block
       comment */
    "http.proxy": "http://example.com/a//b", // url keeps its slashes
    "quote": "say \"/* hi */\"",
}"#,
        );
        assert_eq!(settings["http.proxy"], "http://example.com/a//b");
        assert_eq!(settings["quote"], "say \"/* hi */\"");
        assert_eq!(settings["files.exclude"]["**/.git"], true);
    }

    #[test]
    fn empty_file_becomes_object() {
        let settings = render("");
        assert!(settings[CUSTOMIZATIONS_KEY].is_object());
    }

    #[test]
    fn array_root_is_malformed() {
        let err = VscodeBackend::new(PathBuf::from("settings.json"))
            .render("[1, 2]", &palette())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = VscodeBackend::new(PathBuf::from("settings.json"))
            .render("{\"a\": }", &palette())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));
    }

    fn arb_settings() -> impl Strategy<Value = Map<String, Value>> {
        proptest::collection::btree_map("[a-z./* ,]{1,12}", "[ -~]{0,16}", 0..8).prop_map(|m| {
            m.into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn plain_json_passes_through_unchanged(settings in arb_settings()) {
            let value = Value::Object(settings);
            let pretty = serde_json::to_string_pretty(&value).unwrap();
            let parsed: Value = serde_json::from_str(&strip_jsonc(&pretty)).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
