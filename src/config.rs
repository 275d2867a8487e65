use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backends::polybar;
use crate::error::{Error, Result};
use crate::pipeline::extract::{DEFAULT_SAMPLES, SAMPLE_RANGE};
use crate::theme::Role;

/// The directory lookups path defaults depend on.
///
/// Defaults are derived from this value rather than from the process, so
/// callers and tests decide where config lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// User config directory (`$XDG_CONFIG_HOME` or `~/.config` on Linux).
    pub config_dir: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            config_dir: dirs::config_dir(),
            home: dirs::home_dir(),
        }
    }

    pub fn home_dir(&self) -> Result<PathBuf> {
        self.home.clone().ok_or(Error::NoHomeDirectory)
    }

    /// The config directory, falling back to `<home>/.config`.
    pub fn config_home(&self) -> Result<PathBuf> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.home_dir()?.join(".config")),
        }
    }

    /// Expand a leading `~/` against the home directory. Paths are returned
    /// unchanged when there is no home directory.
    pub fn expand(&self, path: &Path) -> PathBuf {
        match (path.strip_prefix("~"), &self.home) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => path.to_path_buf(),
        }
    }
}

/// Resolved configuration for both pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dark_dir: PathBuf,
    pub light_dir: PathBuf,
    pub samples: usize,
    /// Program and leading arguments; the wallpaper path is appended.
    pub wallpaper_command: Vec<String>,
    pub alacritty: PathBuf,
    pub i3: PathBuf,
    pub vscode: PathBuf,
    pub polybar: PathBuf,
    pub polybar_section: String,
    pub polybar_keys: Vec<(String, Role)>,
}

/// On-disk shape of `config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    samples: Option<usize>,
    wallpaper_command: Option<Vec<String>>,
    paths: PathsFile,
    polybar: PolybarFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PathsFile {
    dark_dir: Option<PathBuf>,
    light_dir: Option<PathBuf>,
    alacritty: Option<PathBuf>,
    i3: Option<PathBuf>,
    vscode: Option<PathBuf>,
    polybar: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PolybarFile {
    section: Option<String>,
    /// INI key -> palette role.
    keys: Option<std::collections::BTreeMap<String, Role>>,
}

impl Settings {
    /// Built-in defaults for the given environment.
    pub fn defaults(env: &Environment) -> Result<Self> {
        let config = env.config_home()?;
        Ok(Self {
            dark_dir: config.join("dark-mode.d"),
            light_dir: config.join("light-mode.d"),
            samples: DEFAULT_SAMPLES,
            wallpaper_command: vec!["nitrogen".to_string(), "--set-auto".to_string()],
            alacritty: config.join("alacritty").join("alacritty.yml"),
            i3: env.home_dir()?.join(".i3").join("config"),
            vscode: config.join("Code").join("User").join("settings.json"),
            polybar: config.join("polybar").join("colors.ini"),
            polybar_section: polybar::DEFAULT_SECTION.to_string(),
            polybar_keys: polybar::default_keys(),
        })
    }

    /// Location of the settings file when none is given explicitly.
    pub fn default_file(env: &Environment) -> Result<PathBuf> {
        Ok(env.config_home()?.join("wallhue").join("config.toml"))
    }

    /// Defaults overlaid with the settings file.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>, env: &Environment) -> Result<Self> {
        let defaults = Self::defaults(env)?;
        let (file, required) = match path {
            Some(path) => (env.expand(path), true),
            None => (Self::default_file(env)?, false),
        };

        let raw = match std::fs::read_to_string(&file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                log::debug!("no settings file at {}, using defaults", file.display());
                return Ok(defaults);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingConfigFile { path: file });
            }
            Err(e) => return Err(Error::io(&file, e)),
        };

        log::debug!("loading settings from {}", file.display());
        defaults.overlay(&raw, &file, env)
    }

    /// Apply the TOML settings in `raw` on top of `self`.
    pub fn overlay(mut self, raw: &str, file: &Path, env: &Environment) -> Result<Self> {
        let parsed: SettingsFile =
            toml::from_str(raw).map_err(|e| Error::malformed(file, e.message().to_string()))?;

        if let Some(samples) = parsed.samples {
            if !SAMPLE_RANGE.contains(&samples) {
                return Err(Error::malformed(
                    file,
                    format!(
                        "samples must be between {} and {}, got {samples}",
                        SAMPLE_RANGE.start(),
                        SAMPLE_RANGE.end()
                    ),
                ));
            }
            self.samples = samples;
        }
        if let Some(command) = parsed.wallpaper_command {
            if command.is_empty() {
                return Err(Error::malformed(file, "wallpaper_command must not be empty"));
            }
            self.wallpaper_command = command;
        }

        let paths = parsed.paths;
        let expand = |p: Option<PathBuf>, slot: &mut PathBuf| {
            if let Some(p) = p {
                *slot = env.expand(&p);
            }
        };
        expand(paths.dark_dir, &mut self.dark_dir);
        expand(paths.light_dir, &mut self.light_dir);
        expand(paths.alacritty, &mut self.alacritty);
        expand(paths.i3, &mut self.i3);
        expand(paths.vscode, &mut self.vscode);
        expand(paths.polybar, &mut self.polybar);

        if let Some(section) = parsed.polybar.section {
            self.polybar_section = section;
        }
        if let Some(keys) = parsed.polybar.keys {
            self.polybar_keys = keys.into_iter().collect();
        }

        Ok(self)
    }
}
