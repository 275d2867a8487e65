//! Config rewriters for the applications a palette is propagated into.

pub mod alacritty;
pub mod i3;
pub mod polybar;
pub mod vscode;

use std::path::{Path, PathBuf};

use crate::cli::Target;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::theme::Palette;

pub use alacritty::AlacrittyBackend;
pub use i3::I3Backend;
pub use polybar::PolybarBackend;
pub use vscode::VscodeBackend;

/// What happened to one backend's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Written(PathBuf),
    /// The config did not exist and the backend treats that as a no-op.
    Skipped(PathBuf),
}

/// One application whose config carries palette colors.
pub trait ThemeBackend {
    /// Human-readable backend name (e.g. "Alacritty").
    fn name(&self) -> &str;

    fn config_path(&self) -> &Path;

    /// Rewrite the color keys of `existing` config text, keeping everything
    /// else.
    fn render(&self, existing: &str, palette: &Palette) -> Result<String>;

    /// Whether a missing config is an error (`true`) or a no-op.
    fn requires_config(&self) -> bool {
        true
    }

    /// Read the config, render it, write it back.
    fn apply(&self, palette: &Palette) -> Result<Applied> {
        let path = self.config_path();
        match read_config(path)? {
            Some(existing) => {
                let updated = self.render(&existing, palette)?;
                std::fs::write(path, updated).map_err(|e| Error::io(path, e))?;
                log::info!("{} theme written to {}", self.name(), path.display());
                Ok(Applied::Written(path.to_path_buf()))
            }
            None if self.requires_config() => Err(Error::MissingConfigFile {
                path: path.to_path_buf(),
            }),
            None => {
                log::warn!(
                    "{} config not found at {}, skipping",
                    self.name(),
                    path.display()
                );
                Ok(Applied::Skipped(path.to_path_buf()))
            }
        }
    }
}

/// Read a config file, mapping "not found" to `None`.
pub fn read_config(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Build the backend for `target` from resolved settings.
pub fn backend_for(target: Target, settings: &Settings) -> Box<dyn ThemeBackend> {
    match target {
        Target::Alacritty => Box::new(AlacrittyBackend::new(settings.alacritty.clone())),
        Target::I3 => Box::new(I3Backend::new(settings.i3.clone())),
        Target::Vscode => Box::new(VscodeBackend::new(settings.vscode.clone())),
        Target::Polybar => Box::new(PolybarBackend::new(
            settings.polybar.clone(),
            settings.polybar_section.clone(),
            settings.polybar_keys.clone(),
        )),
    }
}

/// Apply `palette` to every target in turn. The first failure aborts.
pub fn apply(palette: &Palette, targets: &[Box<dyn ThemeBackend>]) -> Result<Vec<Applied>> {
    targets.iter().map(|backend| backend.apply(palette)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use tempfile::TempDir;

    struct Upper {
        path: PathBuf,
        required: bool,
    }

    impl ThemeBackend for Upper {
        fn name(&self) -> &str {
            "Upper"
        }

        fn config_path(&self) -> &Path {
            &self.path
        }

        fn render(&self, existing: &str, palette: &Palette) -> Result<String> {
            Ok(format!("{}{}\n", existing.to_uppercase(), palette.background))
        }

        fn requires_config(&self) -> bool {
            self.required
        }
    }

    fn palette() -> Palette {
        Palette {
            primary: Color::new(1, 2, 3),
            background: Color::new(16, 16, 16),
            foreground: Color::new(238, 238, 238),
            high: Color::new(255, 255, 255),
            accent: Color::new(255, 136, 0),
        }
    }

    #[test]
    fn apply_rewrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conf");
        std::fs::write(&path, "abc\n").unwrap();
        let backend = Upper {
            path: path.clone(),
            required: true,
        };

        assert_eq!(
            backend.apply(&palette()).unwrap(),
            Applied::Written(path.clone())
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ABC\n#101010\n");
    }

    #[test]
    fn missing_required_config_fails() {
        let tmp = TempDir::new().unwrap();
        let backend = Upper {
            path: tmp.path().join("absent"),
            required: true,
        };
        let err = backend.apply(&palette()).unwrap_err();
        assert!(matches!(err, Error::MissingConfigFile { .. }));
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn missing_optional_config_is_skipped_and_not_created() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent");
        let backend = Upper {
            path: path.clone(),
            required: false,
        };
        assert_eq!(
            backend.apply(&palette()).unwrap(),
            Applied::Skipped(path.clone())
        );
        assert!(!path.exists());
    }

    #[test]
    fn apply_stops_at_first_failure() {
        let tmp = TempDir::new().unwrap();
        let later = tmp.path().join("later");
        std::fs::write(&later, "x").unwrap();
        let targets: Vec<Box<dyn ThemeBackend>> = vec![
            Box::new(Upper {
                path: tmp.path().join("absent"),
                required: true,
            }),
            Box::new(Upper {
                path: later.clone(),
                required: true,
            }),
        ];

        assert!(apply(&palette(), &targets).is_err());
        assert_eq!(std::fs::read_to_string(&later).unwrap(), "x");
    }
}
