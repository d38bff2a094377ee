//! Copies the runtime distribution next to the assembled executable.

use super::ExclusionSet;
use crate::bundler::{
    Error, Result,
    builder::checksum::files_identical,
    error::ErrorExt,
    utils::fs::is_same_file,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What the runtime copy did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CopySummary {
    /// Files written to the output directory.
    pub copied: usize,
    /// Files already present with identical content.
    pub unchanged: usize,
    /// Files skipped by the exclusion set.
    pub excluded: usize,
    /// Zero-length files skipped.
    pub empty: usize,
    /// Symlinks and other non-regular entries skipped.
    pub special: usize,
    /// Bytes written.
    pub bytes: u64,
}

/// Copies every runtime file under `runtime_root` into `output_dir`,
/// preserving relative paths.
///
/// Zero-length files, non-regular entries and excluded names are skipped. A
/// destination that already holds the same file, or identical content, is
/// left alone, so repeated builds into the same directory only write what
/// changed.
pub async fn copy_runtime_tree(
    runtime_root: &Path,
    output_dir: &Path,
    exclusions: &ExclusionSet,
) -> Result<CopySummary> {
    if !tokio::fs::metadata(runtime_root)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Err(Error::path(runtime_root, "runtime directory not found"));
    }

    let root = runtime_root.to_path_buf();
    let output = output_dir.to_path_buf();
    let exclusions = exclusions.clone();

    let summary = tokio::task::spawn_blocking(move || copy_tree(&root, &output, &exclusions))
        .await
        .map_err(|e| Error::GenericError(format!("Runtime copy task panicked: {}", e)))??;

    log::info!(
        "Copied {} runtime files ({} bytes) into {}; {} unchanged, {} excluded, {} empty",
        summary.copied,
        summary.bytes,
        output_dir.display(),
        summary.unchanged,
        summary.excluded,
        summary.empty
    );

    Ok(summary)
}

fn copy_tree(root: &Path, output: &Path, exclusions: &ExclusionSet) -> Result<CopySummary> {
    let mut summary = CopySummary::default();
    std::fs::create_dir_all(output).fs_context("creating output directory", output)?;

    // Never walk into the output directory when it lives inside the runtime.
    let output_canonical: Option<PathBuf> = std::fs::canonicalize(output).ok();
    let root_canonical = std::fs::canonicalize(root).fs_context("resolving runtime root", root)?;

    let walker = WalkDir::new(&root_canonical)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| Some(entry.path()) != output_canonical.as_deref());

    for entry in walker {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(&root_canonical)?;
        let dest_path = output.join(rel_path);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            continue;
        }

        if !file_type.is_file() {
            log::debug!("  skip (not a regular file): {}", rel_path.display());
            summary.special += 1;
            continue;
        }

        let len = entry.metadata()?.len();
        if len == 0 {
            log::debug!("  skip (empty): {}", rel_path.display());
            summary.empty += 1;
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if let Some(reason) = exclusions.check(&name) {
            log::debug!("  skip ({:?}): {}", reason, rel_path.display());
            summary.excluded += 1;
            continue;
        }

        if dest_path.exists() && up_to_date(entry.path(), &dest_path)? {
            log::debug!("  unchanged: {}", rel_path.display());
            summary.unchanged += 1;
            continue;
        }

        std::fs::copy(entry.path(), &dest_path).fs_context("copying runtime file to", &dest_path)?;
        log::debug!("  copied: {} ({} bytes)", rel_path.display(), len);
        summary.copied += 1;
        summary.bytes += len;
    }

    Ok(summary)
}

/// Whether `dest` already matches `src`: the same underlying file, or a
/// regular file with identical content.
fn up_to_date(src: &Path, dest: &Path) -> Result<bool> {
    if is_same_file(src, dest) {
        return Ok(true);
    }
    if !dest.is_file() {
        return Ok(false);
    }
    files_identical(src, dest).fs_context("comparing with", dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::TargetPlatform;

    fn runtime_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("nw.exe"), b"launcher").unwrap();
        std::fs::write(root.join("nwjc.exe"), b"compiler").unwrap();
        std::fs::write(root.join("credits.html"), b"credits").unwrap();
        std::fs::write(root.join("pdf.dll"), b"pdf").unwrap();
        std::fs::write(root.join("nw.pak"), b"pak").unwrap();
        std::fs::write(root.join("empty.dat"), b"").unwrap();
        std::fs::create_dir_all(root.join("locales")).unwrap();
        std::fs::write(root.join("locales/en-US.pak"), b"en").unwrap();
        dir
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(dir)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }

    #[tokio::test]
    async fn copies_tree_without_excluded_or_empty_files() {
        let runtime = runtime_tree();
        let out = tempfile::tempdir().unwrap();
        let exclusions = ExclusionSet::for_target(TargetPlatform::Win64, false);

        let summary = copy_runtime_tree(runtime.path(), out.path(), &exclusions)
            .await
            .unwrap();

        assert_eq!(listing(out.path()), ["locales/en-US.pak", "nw.pak"]);
        assert_eq!(summary.copied, 2);
        assert_eq!(summary.excluded, 4);
        assert_eq!(summary.empty, 1);
        assert_eq!(
            std::fs::read(out.path().join("locales/en-US.pak")).unwrap(),
            b"en"
        );
    }

    #[tokio::test]
    async fn pdf_library_copied_only_when_enabled() {
        let runtime = runtime_tree();

        let without = tempfile::tempdir().unwrap();
        copy_runtime_tree(
            runtime.path(),
            without.path(),
            &ExclusionSet::for_target(TargetPlatform::Win64, false),
        )
        .await
        .unwrap();
        assert!(!without.path().join("pdf.dll").exists());

        let with = tempfile::tempdir().unwrap();
        copy_runtime_tree(
            runtime.path(),
            with.path(),
            &ExclusionSet::for_target(TargetPlatform::Win64, true),
        )
        .await
        .unwrap();
        assert_eq!(std::fs::read(with.path().join("pdf.dll")).unwrap(), b"pdf");
    }

    #[tokio::test]
    async fn second_run_skips_identical_files_and_refreshes_changed_ones() {
        let runtime = runtime_tree();
        let out = tempfile::tempdir().unwrap();
        let exclusions = ExclusionSet::for_target(TargetPlatform::Win64, false);

        copy_runtime_tree(runtime.path(), out.path(), &exclusions)
            .await
            .unwrap();
        std::fs::write(out.path().join("nw.pak"), b"tampered").unwrap();

        let summary = copy_runtime_tree(runtime.path(), out.path(), &exclusions)
            .await
            .unwrap();

        assert_eq!(summary.copied, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(std::fs::read(out.path().join("nw.pak")).unwrap(), b"pak");
    }

    #[tokio::test]
    async fn copying_onto_itself_is_a_no_op() {
        let runtime = runtime_tree();
        let exclusions = ExclusionSet::new();

        let summary = copy_runtime_tree(runtime.path(), runtime.path(), &exclusions)
            .await
            .unwrap();

        assert_eq!(summary.copied, 0);
        assert_eq!(std::fs::read(runtime.path().join("nw.pak")).unwrap(), b"pak");
    }

    #[tokio::test]
    async fn output_inside_runtime_is_not_walked() {
        let runtime = runtime_tree();
        let out = runtime.path().join("release");
        let exclusions = ExclusionSet::for_target(TargetPlatform::Win64, false);

        copy_runtime_tree(runtime.path(), &out, &exclusions)
            .await
            .unwrap();
        copy_runtime_tree(runtime.path(), &out, &exclusions)
            .await
            .unwrap();

        assert!(!out.join("release").exists());
    }

    #[tokio::test]
    async fn missing_runtime_is_a_path_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_runtime_tree(&dir.path().join("nw"), dir.path(), &ExclusionSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PathError { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_not_copied() {
        let runtime = runtime_tree();
        std::os::unix::fs::symlink(
            runtime.path().join("nw.pak"),
            runtime.path().join("link.pak"),
        )
        .unwrap();
        let out = tempfile::tempdir().unwrap();

        let summary = copy_runtime_tree(runtime.path(), out.path(), &ExclusionSet::new())
            .await
            .unwrap();

        assert_eq!(summary.special, 1);
        assert!(!out.path().join("link.pak").exists());
    }
}
