//! Error types for the packaging pipeline.
//!
//! Every stage returns [`Result`]. Most variants are fatal and abort the
//! build; [`Error::is_recoverable`] identifies the ones the pipeline downgrades
//! to warnings (icon embedding).

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as DeriveError;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the packaging pipeline.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// The source tree has no `package.json`.
    #[error("no package.json found in source directory {}", .path.display())]
    ManifestNotFound {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// `package.json` exists but is not a JSON object.
    #[error("invalid manifest {}: {reason}", .path.display())]
    InvalidManifest {
        /// Manifest path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The icon file does not exist.
    #[error("can't find '{}'", .path.display())]
    IconNotFound {
        /// Configured icon path.
        path: PathBuf,
    },

    /// The icon file exists but can't be opened.
    #[error("can't read '{}': {error}", .path.display())]
    IconUnreadable {
        /// Configured icon path.
        path: PathBuf,
        /// Underlying error.
        error: io::Error,
    },

    /// Settings could not be assembled.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The requested target platform is not supported.
    #[error("unsupported target platform '{0}'")]
    UnsupportedTarget(String),

    /// A required path is missing or of the wrong kind.
    #[error("{reason}: {}", .path.display())]
    PathError {
        /// Offending path.
        path: PathBuf,
        /// What was expected of it.
        reason: String,
    },

    /// A packed runtime distribution could not be extracted.
    #[error("failed to extract {}: {reason}", .path.display())]
    Extraction {
        /// Archive path.
        path: PathBuf,
        /// Codec message.
        reason: String,
    },

    /// The resource editor is not where the tools directory says it is.
    #[error("can't find the resource editor at {}: {reason}", .path.display())]
    ToolNotFound {
        /// Expected tool path.
        path: PathBuf,
        /// Lookup failure.
        reason: String,
    },

    /// The resource editor ran and reported failure.
    #[error("can't embed the icon resource: {tool} {reason}")]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// Exit status or timeout description.
        reason: String,
    },

    /// Spawning an external command failed.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command name.
        command: String,
        /// Spawn error.
        error: io::Error,
    },

    /// Filesystem error with operation context.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        error: io::Error,
    },

    /// Plain IO error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Zip codec error while writing the application archive.
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal error.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix error while computing relative paths.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Whether the pipeline may continue after this error.
    ///
    /// Icon and resource editor failures only cost the custom icon; all other
    /// errors abort the build.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::IconNotFound { .. }
                | Error::IconUnreadable { .. }
                | Error::ToolNotFound { .. }
                | Error::ToolFailed { .. }
                | Error::CommandFailed { .. }
        )
    }

    /// Builds a [`Error::PathError`].
    pub fn path(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Error::PathError {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps the error with the operation being performed and the path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts a missing value into [`Error::GenericError`].
pub trait Context<T> {
    /// Adds a message describing what was expected.
    fn context<C: Display + Send + Sync + 'static>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display + Send + Sync + 'static>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
