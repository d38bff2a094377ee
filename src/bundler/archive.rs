//! Application archive creation.
//!
//! Packs the NW.js source tree into the zip payload that is later appended to
//! the launcher. The runtime finds the payload by scanning backward for the
//! zip end-of-central-directory record, so the file written here must be a
//! complete, standalone zip.

use crate::bundler::{
    Error, Result,
    error::ErrorExt,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// The zip payload produced from the source tree.
#[derive(Debug, Clone)]
pub struct ArchivePayload {
    path: PathBuf,
    size: u64,
    files: usize,
}

impl ArchivePayload {
    /// Wraps an existing zip file as a payload.
    pub async fn open(path: &Path) -> Result<Self> {
        let size = tokio::fs::metadata(path)
            .await
            .fs_context("reading payload metadata", path)?
            .len();
        Ok(Self {
            path: path.to_path_buf(),
            size,
            files: 0,
        })
    }

    /// Location of the payload in the temp directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of file entries written, zero for payloads opened with
    /// [`ArchivePayload::open`].
    pub fn files(&self) -> usize {
        self.files
    }
}

/// Archives every file under `source_dir` into `dest_path`.
///
/// Entries are stored when `compress` is false and deflated otherwise. An
/// existing `dest_path` is overwritten. `source_dir` must contain
/// `package.json`; its absence is reported before anything is written.
pub async fn build_archive(
    source_dir: &Path,
    dest_path: &Path,
    compress: bool,
) -> Result<ArchivePayload> {
    build_archive_excluding(source_dir, dest_path, compress, &[]).await
}

/// Like [`build_archive`], but never descends into `skip` paths.
///
/// The payload itself is always skipped, so a temp directory inside the
/// source tree does not end up archiving its own output.
pub async fn build_archive_excluding(
    source_dir: &Path,
    dest_path: &Path,
    compress: bool,
    skip: &[PathBuf],
) -> Result<ArchivePayload> {
    crate::metadata::load_manifest(source_dir).await?;

    let root = tokio::fs::canonicalize(source_dir)
        .await
        .fs_context("resolving source directory", source_dir)?;

    if let Some(parent) = dest_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating archive directory", parent)?;
    }

    let mut skip: Vec<PathBuf> = skip.iter().map(|p| resolve(p)).collect();
    skip.push(resolve(dest_path));

    let dest = dest_path.to_path_buf();
    let method = if compress {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    };

    let written = {
        let dest = dest.clone();
        tokio::task::spawn_blocking(move || write_zip(&root, &dest, method, &skip))
            .await
            .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))?
    };

    let files = match written {
        Ok(files) => files,
        Err(e) => {
            // Never leave a truncated zip behind.
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(e);
        }
    };

    let size = tokio::fs::metadata(&dest)
        .await
        .fs_context("reading archive metadata", &dest)?
        .len();

    log::info!(
        "Archived {} files from {} into {} ({} bytes, {:?})",
        files,
        source_dir.display(),
        dest.display(),
        size,
        method
    );

    Ok(ArchivePayload {
        path: dest,
        size,
        files,
    })
}

/// Canonical form of `path`, resolving through the parent when the path
/// itself does not exist yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(p) = std::fs::canonicalize(path) {
        return p;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

fn write_zip(
    root: &Path,
    dest: &Path,
    method: CompressionMethod,
    skip: &[PathBuf],
) -> Result<usize> {
    let file = File::create(dest).fs_context("creating archive", dest)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(method);
    let mut files = 0usize;

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !skip.iter().any(|s| entry.path() == s.as_path()));

    for entry in walker {
        let entry = entry?;
        if entry.depth() == 0 {
            continue;
        }

        let name = entry_name(entry.path().strip_prefix(root)?)?;

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
            continue;
        }

        let len = entry.metadata()?.len();
        let file_options = options.large_file(len >= u64::from(u32::MAX));
        zip.start_file(name.as_str(), file_options)?;

        let mut input = File::open(entry.path()).fs_context("reading source file", entry.path())?;
        std::io::copy(&mut input, &mut zip).fs_context("archiving", entry.path())?;
        log::debug!("  + {} ({} bytes)", name, len);
        files += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush().fs_context("flushing archive", dest)?;
    writer
        .get_ref()
        .sync_all()
        .fs_context("syncing archive", dest)?;

    Ok(files)
}

/// Zip entry name for a path relative to the archive root: `/`-separated,
/// no leading slash.
fn entry_name(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            Error::path(relative, "file name is not valid UTF-8 and can't be archived")
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
