use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Derive a color palette from a wallpaper and theme desktop applications with it.
#[derive(Parser, Debug)]
#[command(name = "wallhue", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (defaults to $XDG_CONFIG_HOME/wallhue/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save light and dark variants of a wallpaper with their palettes, then set it
    SetBackground {
        /// Path to the background image
        image: PathBuf,

        /// Where to save the dark version and its palette
        dark_dir: Option<PathBuf>,

        /// Where to save the light version and its palette
        light_dir: Option<PathBuf>,

        /// Number of dominant colors to extract
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u8).range(3..))]
        samples: Option<u8>,

        /// Do not run the wallpaper command
        #[arg(long)]
        no_wallpaper: bool,
    },

    /// Write a saved palette into application configs
    AutoTheme {
        /// Palette produced by set-background
        #[arg(short, long, default_value = "palette.json")]
        palette: PathBuf,

        /// Only theme these applications (all by default)
        #[arg(long, value_enum, value_delimiter = ',')]
        only: Vec<Target>,
    },

    /// Print the palette of an image as JSON
    Palette {
        /// Path to the input image
        image: PathBuf,

        /// Assign roles from lightest to darkest (light-mode palette)
        #[arg(short, long)]
        reverse: bool,

        /// Number of dominant colors to extract
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u8).range(3..))]
        samples: Option<u8>,

        /// Print the sorted colors as swatches on stderr
        #[arg(long)]
        preview: bool,
    },
}

/// Whether a wallpaper reads as dark or light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

/// Applications a palette can be propagated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    Alacritty,
    I3,
    Vscode,
    Polybar,
}

impl Target {
    pub const ALL: [Target; 4] = [Target::Alacritty, Target::I3, Target::Vscode, Target::Polybar];
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn set_background_positionals() {
        let args = Args::parse_from(["wallhue", "set-background", "bg.png", "/d", "/l", "-k", "12"]);
        match args.command {
            Command::SetBackground {
                image,
                dark_dir,
                light_dir,
                samples,
                no_wallpaper,
            } => {
                assert_eq!(image, PathBuf::from("bg.png"));
                assert_eq!(dark_dir, Some(PathBuf::from("/d")));
                assert_eq!(light_dir, Some(PathBuf::from("/l")));
                assert_eq!(samples, Some(12));
                assert!(!no_wallpaper);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn auto_theme_defaults() {
        let args = Args::parse_from(["wallhue", "auto-theme"]);
        match args.command {
            Command::AutoTheme { palette, only } => {
                assert_eq!(palette, PathBuf::from("palette.json"));
                assert!(only.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn only_accepts_comma_list() {
        let args = Args::parse_from(["wallhue", "auto-theme", "--only", "i3,polybar"]);
        match args.command {
            Command::AutoTheme { only, .. } => assert_eq!(only, vec![Target::I3, Target::Polybar]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn too_few_samples_rejected() {
        assert!(Args::try_parse_from(["wallhue", "palette", "x.png", "-k", "2"]).is_err());
    }
}
