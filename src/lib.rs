//! Derive a five-role color palette from a wallpaper and propagate it into
//! desktop application configs.
//!
//! Two pipelines share nothing but files on disk:
//! [`publish::publish`] turns an image into light and dark wallpaper variants
//! plus a `palette.json` for each, and [`backends::apply`] rewrites the color
//! keys of application configs from a saved [`theme::Palette`].

pub mod backends;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod preview;
pub mod publish;
pub mod theme;
pub mod wallpaper;

pub use error::{Error, Result};
