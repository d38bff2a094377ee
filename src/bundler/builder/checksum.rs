//! Artifact checksum calculation.
//!
//! SHA-256 digests for the assembled executable and for the content
//! comparison that lets incremental runtime copies skip unchanged files.

use crate::bundler::{Result, error::ErrorExt};
use sha2::{Digest, Sha256};
use std::{fs::File, io::Read, path::Path};
use tokio::io::AsyncReadExt;

/// Calculates SHA256 checksum of a file.
///
/// Reads the file in 8KB chunks to handle large files efficiently.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If the file cannot be read
pub async fn calculate_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Blocking SHA-256 of a file, for use inside `spawn_blocking`.
pub fn sha256_file_blocking(file_path: &Path) -> std::io::Result<[u8; 32]> {
    let mut file = File::open(file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize().into())
}

/// Whether two files have the same length and the same SHA-256.
pub fn files_identical(a: &Path, b: &Path) -> std::io::Result<bool> {
    if std::fs::metadata(a)?.len() != std::fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(sha256_file_blocking(a)? == sha256_file_blocking(b)?)
}
