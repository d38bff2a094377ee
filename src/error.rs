//! Comprehensive error types for bundler operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Writing to the terminal failed
    #[error("Output failed: {0}")]
    Output(#[source] std::io::Error),
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error;

        match self {
            BundlerError::Bundler(Error::ManifestNotFound { path }) => vec![format!(
                "Point --src at the directory that contains package.json (looked in {})",
                path.display()
            )],
            BundlerError::Bundler(Error::PathError { .. }) => vec![
                "Check that --nw points at an NW.js directory or a .zip/.tar.gz distribution"
                    .to_string(),
            ],
            BundlerError::Bundler(Error::InvalidSettings(_)) | BundlerError::Cli(_) => {
                vec!["Run with --help to see the accepted arguments".to_string()]
            }
            _ => vec!["Run with RUST_LOG=debug for per-stage details".to_string()],
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        2
    }
}
