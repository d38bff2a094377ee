//! Application manifest (`package.json`) discovery and parsing.

use crate::bundler::{
    Error, Result,
    error::ErrorExt,
    settings::MANIFEST_FILE,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fields of an NW.js `package.json` the bundler reports on.
///
/// Everything else in the manifest is carried into the archive untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppManifest {
    /// Application name.
    #[serde(default)]
    pub name: Option<String>,

    /// Application version.
    #[serde(default)]
    pub version: Option<String>,

    /// Entry point (HTML page or script).
    #[serde(default)]
    pub main: Option<String>,

    /// Where the manifest was read from.
    #[serde(skip)]
    pub path: PathBuf,
}

/// Path of the manifest inside a source tree.
pub fn manifest_path(source_dir: &Path) -> PathBuf {
    source_dir.join(MANIFEST_FILE)
}

/// Loads `package.json` from the root of `source_dir`.
///
/// # Errors
///
/// - [`Error::PathError`] if `source_dir` is not a directory
/// - [`Error::ManifestNotFound`] if the manifest is missing
/// - [`Error::InvalidManifest`] if it is not a JSON object
pub async fn load_manifest(source_dir: &Path) -> Result<AppManifest> {
    if !tokio::fs::metadata(source_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Err(Error::path(source_dir, "source directory not found"));
    }

    let path = manifest_path(source_dir);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ManifestNotFound {
                path: source_dir.to_path_buf(),
            });
        }
        Err(e) => return Err(e).fs_context("reading manifest", &path),
    };

    let invalid = |reason: String| Error::InvalidManifest {
        path: path.clone(),
        reason,
    };
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    if !value.is_object() {
        return Err(invalid("top-level value must be a JSON object".into()));
    }
    let mut manifest: AppManifest =
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    manifest.path = path;

    log::debug!(
        "Loaded manifest {} (name: {:?}, version: {:?}, main: {:?})",
        manifest.path.display(),
        manifest.name,
        manifest.version,
        manifest.main
    );

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_known_fields_and_ignores_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name":"demo","version":"1.0.0","main":"index.html","window":{"width":800}}"#,
        )
        .unwrap();

        let manifest = load_manifest(dir.path()).await.unwrap();
        assert_eq!(manifest.name.as_deref(), Some("demo"));
        assert_eq!(manifest.main.as_deref(), Some("index.html"));
        assert_eq!(manifest.path, dir.path().join("package.json"));
    }

    #[tokio::test]
    async fn missing_manifest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound { .. }));
    }

    #[tokio::test]
    async fn malformed_manifest_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "[1, 2").unwrap();
        let err = load_manifest(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidManifest { .. }));
    }

    #[tokio::test]
    async fn non_object_manifest_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for content in [r#"["demo","1.0","index.html"]"#, "\"demo\"", "null"] {
            std::fs::write(dir.path().join("package.json"), content).unwrap();
            let err = load_manifest(dir.path()).await.unwrap_err();
            assert!(matches!(err, Error::InvalidManifest { .. }), "{content}: {err}");
        }
    }

    #[tokio::test]
    async fn missing_source_directory_is_a_path_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, Error::PathError { .. }));
    }
}
