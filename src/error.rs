use std::io;
use std::path::{Path, PathBuf};

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config file that must be rewritten does not exist.
    #[error("config file not found: {}", path.display())]
    MissingConfigFile { path: PathBuf },

    /// Too few distinct colors were extracted to fill every role.
    #[error("palette needs at least 3 distinct swatches, only {found} extracted")]
    InsufficientPalette { found: usize },

    /// An existing config could not be parsed in its expected format.
    #[error("malformed config {}: {reason}", path.display())]
    MalformedConfig { path: PathBuf, reason: String },

    /// The wallpaper setter or another external program failed.
    #[error("external command `{command}` failed: {reason}")]
    ExternalCommand { command: String, reason: String },

    /// The source image does not exist.
    #[error("file not found: {}", path.display())]
    ImageNotFound { path: PathBuf },

    /// The source image could not be decoded, or a variant could not be encoded.
    #[error(
        "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
        path.display()
    )]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No home directory could be determined for the default paths.
    #[error("could not determine the home directory; set HOME or pass --config with absolute paths")]
    NoHomeDirectory,

    /// Filesystem access failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Errors from parsing a `#rrggbb` color string.
#[derive(Debug, thiserror::Error)]
pub enum ParseColorError {
    #[error("invalid hex color: expected 6 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex color: `{0}` contains non-hex characters")]
    InvalidDigit(String),
}

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;
