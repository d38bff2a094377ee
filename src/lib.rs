//! NW.js application bundler library
//!
//! This library packages an NW.js project and a runtime distribution into a
//! single self-contained executable for Windows (`win64`):
//! - zips the application sources into a payload
//! - appends the payload to the NW.js launcher and embeds a custom icon
//! - copies the remaining runtime files next to the executable
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
