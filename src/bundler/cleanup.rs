//! Temporary artifact tracking and removal.

use crate::bundler::utils::fs;
use std::path::{Path, PathBuf};

/// Something that went wrong without failing the build.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildWarning {
    /// The icon could not be embedded.
    IconNotEmbedded(String),
    /// A temp artifact could not be removed.
    Cleanup {
        /// Artifact path.
        path: PathBuf,
        /// Removal error.
        reason: String,
    },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::IconNotEmbedded(reason) => write!(f, "icon not embedded: {reason}"),
            BuildWarning::Cleanup { path, reason } => {
                write!(f, "could not remove {}: {reason}", path.display())
            }
        }
    }
}

/// Temp files and directories created by one packaging run.
///
/// Paths are registered before they are written, so a stage that fails half
/// way still has its leftovers removed. [`TempArtifacts::cleanup`] consumes the
/// tracker, which makes a second cleanup of the same run impossible.
#[derive(Debug, Default)]
pub struct TempArtifacts {
    paths: Vec<PathBuf>,
}

impl TempArtifacts {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a path for removal.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            log::debug!("Tracking temp artifact {}", path.display());
            self.paths.push(path);
        }
    }

    /// Registered paths, in registration order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Removes every registered artifact, newest first.
    ///
    /// Artifacts that no longer exist are fine. Anything that can't be
    /// removed becomes a warning; cleanup itself never fails.
    pub async fn cleanup(self) -> Vec<BuildWarning> {
        let mut warnings = Vec::new();

        for path in self.paths.iter().rev() {
            if let Err(e) = remove(path).await {
                log::warn!("Could not remove temp artifact {}: {}", path.display(), e);
                warnings.push(BuildWarning::Cleanup {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            } else {
                log::debug!("Removed temp artifact {}", path.display());
            }
        }

        warnings
    }
}

async fn remove(path: &Path) -> crate::bundler::Result<()> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removes_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.nw");
        let tree = dir.path().join("app-runtime");
        std::fs::write(&file, b"zip").unwrap();
        std::fs::create_dir_all(tree.join("locales")).unwrap();
        std::fs::write(tree.join("locales/en-US.pak"), b"pak").unwrap();

        let mut temp = TempArtifacts::new();
        temp.track(&file);
        temp.track(&tree);
        temp.track(&file);
        assert_eq!(temp.paths().len(), 2);

        let warnings = temp.cleanup().await;

        assert!(warnings.is_empty());
        assert!(!file.exists());
        assert!(!tree.exists());
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn already_missing_artifacts_are_not_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let mut temp = TempArtifacts::new();
        temp.track(dir.path().join("never-created.nw"));

        assert!(temp.cleanup().await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn removal_failures_become_warnings() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir_all(&locked).unwrap();
        let file = locked.join("app.nw");
        std::fs::write(&file, b"zip").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let mut temp = TempArtifacts::new();
        temp.track(&file);
        let warnings = temp.cleanup().await;

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        // Root ignores directory permissions, in which case removal succeeds.
        if file.exists() {
            assert_eq!(warnings.len(), 1);
            assert!(matches!(&warnings[0], BuildWarning::Cleanup { path, .. } if path == &file));
        } else {
            assert!(warnings.is_empty());
        }
    }
}
