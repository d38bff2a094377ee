//! External tool detection and availability checking.
//!
//! The resource editor is not looked up on `PATH`; it must sit at a fixed
//! location under the build tools directory.

use crate::bundler::{Error, Result};
use std::path::{Path, PathBuf};

/// Checks that the resource editor exists and is executable.
///
/// Returns the path to run.
pub fn locate_resource_editor(expected: &Path) -> Result<PathBuf> {
    match which::which(expected) {
        Ok(path) => {
            log::debug!("Found resource editor at: {}", path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!(
                "Resource editor not found at {}: {}. Icon embedding will be skipped.",
                expected.display(),
                e
            );
            Err(Error::ToolNotFound {
                path: expected.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}
