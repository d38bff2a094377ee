//! File system utilities for bundling.
//!
//! Idempotent create/remove helpers and the byte-exact copy and append
//! primitives the assembler is built on.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::{fs, io::AsyncWriteExt};

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing file",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist. Returns the
/// number of bytes copied.
pub async fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let metadata = fs::metadata(from)
        .await
        .fs_context("reading metadata of", from)?;
    if !metadata.is_file() {
        return Err(Error::path(from, "not a regular file"));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)
}

/// Appends the bytes of `src` to the end of `dest`, verbatim.
///
/// Nothing is written besides the source bytes: no separator, no length
/// prefix. The destination must already exist. Returns the number of bytes
/// appended.
pub async fn append_file(dest: &Path, src: &Path) -> Result<u64> {
    let mut input = fs::File::open(src)
        .await
        .fs_context("opening payload", src)?;
    let mut output = fs::OpenOptions::new()
        .append(true)
        .open(dest)
        .await
        .fs_context("opening for append", dest)?;

    let written = tokio::io::copy(&mut input, &mut output)
        .await
        .fs_context("appending to", dest)?;
    output.flush().await.fs_context("flushing", dest)?;
    output.sync_all().await.fs_context("syncing", dest)?;

    Ok(written)
}

/// Whether two paths name the same underlying file.
///
/// Paths that can't be resolved are never the same file.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
