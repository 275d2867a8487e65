use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use wallhue::backends::{self, backend_for, Applied, ThemeBackend};
use wallhue::cli::{Args, Command, Target};
use wallhue::config::{Environment, Settings};
use wallhue::pipeline::derive;
use wallhue::publish::{publish, PublishOptions};
use wallhue::theme::Palette;
use wallhue::wallpaper::{CommandSetter, Disabled, WallpaperSetter};

fn init_logger(verbose: bool) {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
        return;
    }
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("wallhue", level)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let env = Environment::from_process();
    let settings =
        Settings::load(args.config.as_deref(), &env).context("failed to load settings")?;

    match args.command {
        Command::SetBackground {
            image,
            dark_dir,
            light_dir,
            samples,
            no_wallpaper,
        } => {
            let dark_dir = dark_dir.unwrap_or_else(|| settings.dark_dir.clone());
            let light_dir = light_dir.unwrap_or_else(|| settings.light_dir.clone());
            let options = PublishOptions {
                sample_count: samples.map_or(settings.samples, usize::from),
                ..PublishOptions::default()
            };

            let command = CommandSetter::from_argv(&settings.wallpaper_command)
                .unwrap_or_default();
            let setter: &dyn WallpaperSetter = if no_wallpaper { &Disabled } else { &command };

            let report = publish(&image, &dark_dir, &light_dir, setter, &options)
                .with_context(|| format!("failed to publish {}", image.display()))?;
            log::info!(
                "palettes written to {} and {}",
                report.dark_palette.display(),
                report.light_palette.display()
            );
        }
        Command::AutoTheme { palette, only } => {
            let palette_path = env.expand(&palette);
            let palette = Palette::load(&palette_path).context("failed to read palette")?;

            let selected: &[Target] = if only.is_empty() {
                &Target::ALL[..]
            } else {
                &only[..]
            };
            let targets: Vec<Box<dyn ThemeBackend>> = selected
                .iter()
                .map(|target| backend_for(*target, &settings))
                .collect();

            let applied = backends::apply(&palette, &targets).context("failed to apply theme")?;
            let written = applied
                .iter()
                .filter(|a| matches!(a, Applied::Written(_)))
                .count();
            log::info!("themed {written} of {} applications", applied.len());
        }
        Command::Palette {
            image,
            reverse,
            samples,
            preview,
        } => {
            let sample_count = samples.map_or(settings.samples, usize::from);
            let derivation = derive(&image, reverse, sample_count)
                .with_context(|| format!("failed to derive palette from {}", image.display()))?;
            if preview {
                wallhue::preview::render(&derivation, &mut std::io::stderr())?;
            }
            print!("{}", derivation.palette.to_json()?);
        }
    }

    Ok(())
}
