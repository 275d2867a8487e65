use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Sets the desktop wallpaper.
pub trait WallpaperSetter {
    fn apply(&self, path: &Path) -> Result<()>;
}

/// Runs an external program with the wallpaper path as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSetter {
    program: String,
    args: Vec<String>,
}

impl CommandSetter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from an argv list such as `["feh", "--bg-fill"]`.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// `nitrogen --set-auto <path>`.
    pub fn nitrogen() -> Self {
        Self::new("nitrogen", vec!["--set-auto".to_string()])
    }

    fn command_line(&self, path: &Path) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.push(path.display().to_string());
        parts.join(" ")
    }
}

impl Default for CommandSetter {
    fn default() -> Self {
        Self::nitrogen()
    }
}

impl WallpaperSetter for CommandSetter {
    fn apply(&self, path: &Path) -> Result<()> {
        let command = self.command_line(path);
        log::info!("setting wallpaper: {command}");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| Error::ExternalCommand {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => output.status.to_string(),
                msg => format!("{}: {msg}", output.status),
            };
            return Err(Error::ExternalCommand { command, reason });
        }
        Ok(())
    }
}

/// Leaves the wallpaper alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl WallpaperSetter for Disabled {
    fn apply(&self, path: &Path) -> Result<()> {
        log::info!("wallpaper setter disabled, not applying {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_argv_splits_program() {
        let setter = CommandSetter::from_argv(&["feh".to_string(), "--bg-fill".to_string()]);
        assert_eq!(
            setter,
            Some(CommandSetter::new("feh", vec!["--bg-fill".to_string()]))
        );
        assert_eq!(CommandSetter::from_argv(&[]), None);
    }

    #[test]
    fn command_line_appends_path() {
        let setter = CommandSetter::nitrogen();
        assert_eq!(
            setter.command_line(Path::new("/tmp/light.png")),
            "nitrogen --set-auto /tmp/light.png"
        );
    }

    #[test]
    fn missing_program_is_external_command_error() {
        let setter = CommandSetter::new("wallhue-no-such-program", vec![]);
        let err = setter.apply(Path::new("/tmp/x.png")).unwrap_err();
        assert!(matches!(err, Error::ExternalCommand { .. }), "got {err:?}");
        assert!(err.to_string().contains("wallhue-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_external_command_error() {
        let setter = CommandSetter::new("false", vec![]);
        let err = setter.apply(Path::new("/tmp/x.png")).unwrap_err();
        assert!(matches!(err, Error::ExternalCommand { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_succeeds() {
        let setter = CommandSetter::new("true", vec![]);
        setter.apply(Path::new("/tmp/x.png")).unwrap();
    }

    #[test]
    fn disabled_does_nothing() {
        Disabled.apply(Path::new("/nonexistent.png")).unwrap();
    }
}
