//! Resolves the configured runtime distribution into a directory.

use crate::bundler::{
    Error, Result,
    error::ErrorExt,
    utils::fs,
};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// Packed distribution formats, detected by file extension.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PackedFormat {
    /// `.zip`, the format NW.js ships for Windows.
    Zip,
    /// `.tar.gz` / `.tgz`.
    TarGz,
}

impl PackedFormat {
    /// Detects the format from the file name.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(PackedFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(PackedFormat::TarGz)
        } else {
            None
        }
    }
}

/// Where the runtime files live for this build.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RuntimeRoot {
    /// An unpacked distribution used in place.
    Directory(PathBuf),
    /// A packed distribution extracted into the temp directory.
    Extracted {
        /// Directory holding the runtime files.
        root: PathBuf,
        /// Extraction directory to remove during cleanup.
        work_dir: PathBuf,
    },
}

impl RuntimeRoot {
    /// Directory holding `nw.exe` and the rest of the runtime.
    pub fn path(&self) -> &Path {
        match self {
            RuntimeRoot::Directory(root) => root,
            RuntimeRoot::Extracted { root, .. } => root,
        }
    }

    /// Temp directory created for extraction, if any.
    pub fn work_dir(&self) -> Option<&Path> {
        match self {
            RuntimeRoot::Directory(_) => None,
            RuntimeRoot::Extracted { work_dir, .. } => Some(work_dir),
        }
    }
}

/// Turns the runtime source into a usable directory.
///
/// A directory is returned unchanged. A packed distribution is extracted into
/// `work_dir` (emptied first); when the archive wraps everything in a single
/// top-level directory, that directory is the runtime root.
///
/// # Errors
///
/// - [`Error::PathError`] if the source is missing or is neither a directory
///   nor a supported archive
/// - [`Error::Extraction`] if the archive is corrupt
pub async fn materialize_runtime(runtime_source: &Path, work_dir: &Path) -> Result<RuntimeRoot> {
    let metadata = match tokio::fs::metadata(runtime_source).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::path(runtime_source, "NW.js runtime not found"));
        }
        Err(e) => return Err(e).fs_context("reading runtime metadata", runtime_source),
    };

    if metadata.is_dir() {
        log::info!("Using NW.js runtime directory {}", runtime_source.display());
        return Ok(RuntimeRoot::Directory(runtime_source.to_path_buf()));
    }

    let format = PackedFormat::detect(runtime_source).ok_or_else(|| {
        Error::path(
            runtime_source,
            "NW.js runtime must be a directory or a .zip/.tar.gz archive",
        )
    })?;

    fs::create_dir_all(work_dir, true).await?;

    log::info!(
        "Extracting NW.js runtime {} into {}",
        runtime_source.display(),
        work_dir.display()
    );

    let archive = runtime_source.to_path_buf();
    let target = work_dir.to_path_buf();
    tokio::task::spawn_blocking(move || extract(format, &archive, &target))
        .await
        .map_err(|e| Error::GenericError(format!("Extraction task panicked: {}", e)))??;

    let root = single_top_level_dir(work_dir)
        .await?
        .unwrap_or_else(|| work_dir.to_path_buf());
    log::debug!("Runtime root: {}", root.display());

    Ok(RuntimeRoot::Extracted {
        root,
        work_dir: work_dir.to_path_buf(),
    })
}

fn extract(format: PackedFormat, archive: &Path, target: &Path) -> Result<()> {
    let file = File::open(archive).fs_context("opening runtime archive", archive)?;
    let extraction_error = |reason: String| Error::Extraction {
        path: archive.to_path_buf(),
        reason,
    };

    match format {
        PackedFormat::Zip => {
            let mut zip = zip::ZipArchive::new(BufReader::new(file))
                .map_err(|e| extraction_error(e.to_string()))?;
            zip.extract(target)
                .map_err(|e| extraction_error(e.to_string()))?;
        }
        PackedFormat::TarGz => {
            let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
            tar::Archive::new(decoder)
                .unpack(target)
                .map_err(|e| extraction_error(e.to_string()))?;
        }
    }

    Ok(())
}

/// The only entry of `dir`, if that entry is a directory.
async fn single_top_level_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .fs_context("reading extracted runtime", dir)?;

    let mut only = None;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading extracted runtime", dir)?
    {
        if only.is_some() {
            return Ok(None);
        }
        only = Some(entry);
    }

    match only {
        Some(entry) if entry.file_type().await?.is_dir() => Ok(Some(entry.path())),
        _ => Ok(None),
    }
}
