//! Core Settings struct and implementations.

use super::TargetPlatform;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Name of the manifest every NW.js project carries at its root.
pub const MANIFEST_FILE: &str = "package.json";

/// Resource editor location, relative to the build tools directory.
pub const RESOURCE_EDITOR: &str = "ar/Resourcer.exe";

/// Resolved configuration for one packaging run.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder) and passed
/// by reference to every stage. Nothing in the pipeline mutates it.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nw::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_nw::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .source_dir("./my-app")
///     .output_dir("./nw-release")
///     .runtime_source("./buildTools/nw")
///     .project_name("myapp")
///     .build()?;
///
/// assert!(settings.executable_path().ends_with("myapp.exe"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Application source tree (contains `package.json`).
    source_dir: PathBuf,

    /// Directory receiving the executable and runtime files.
    output_dir: PathBuf,

    /// Runtime distribution: an unpacked directory or a packed archive.
    runtime_source: PathBuf,

    /// Icon to embed, if any.
    icon: Option<PathBuf>,

    /// Base name of the assembled executable.
    project_name: String,

    /// Where the payload and extracted runtime live during the build.
    temp_dir: PathBuf,

    /// Deflate archive entries instead of storing them.
    compress: bool,

    /// Copy the PDF library next to the executable.
    include_pdf: bool,

    target: TargetPlatform,

    /// Build tools directory holding the resource editor.
    tools_dir: PathBuf,

    /// Delete and recreate the output directory instead of updating it.
    clean_rebuild: bool,

    /// Upper bound on the resource editor's run time.
    tool_timeout: Option<Duration>,
}

impl Settings {
    /// Returns the application source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the runtime distribution path as configured.
    pub fn runtime_source(&self) -> &Path {
        &self.runtime_source
    }

    /// Returns the icon path, if one is configured.
    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    /// Returns the project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Returns the temp directory.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Whether archive entries are deflated.
    pub fn compress(&self) -> bool {
        self.compress
    }

    /// Whether the PDF library is copied.
    pub fn include_pdf(&self) -> bool {
        self.include_pdf
    }

    /// Returns the target platform.
    pub fn target(&self) -> TargetPlatform {
        self.target
    }

    /// Returns the build tools directory.
    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    /// Whether the output directory is recreated from scratch.
    pub fn clean_rebuild(&self) -> bool {
        self.clean_rebuild
    }

    /// Returns the resource editor timeout.
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout
    }

    /// Path of the assembled executable, `<out>/<name>.<ext>`.
    pub fn executable_path(&self) -> PathBuf {
        self.output_dir
            .join(self.target.executable_name(&self.project_name))
    }

    /// Path of the application archive in the temp directory.
    pub fn archive_path(&self) -> PathBuf {
        self.temp_dir.join(format!("{}.nw", self.project_name))
    }

    /// Directory a packed runtime is extracted into.
    pub fn runtime_work_dir(&self) -> PathBuf {
        self.temp_dir.join(format!("{}-runtime", self.project_name))
    }

    /// First build input that lives inside the output directory, if any.
    ///
    /// Checks the source tree, the runtime source, the temp directory and the
    /// tools directory. A clean rebuild erases the output directory, so none
    /// of these may be inside it.
    pub fn output_overlap(&self) -> Option<&Path> {
        [
            &self.source_dir,
            &self.runtime_source,
            &self.temp_dir,
            &self.tools_dir,
        ]
        .into_iter()
        .map(PathBuf::as_path)
        .find(|input| is_within(input, &self.output_dir))
    }

    /// Expected location of the resource editor.
    pub fn resource_editor_path(&self) -> PathBuf {
        self.tools_dir.join(RESOURCE_EDITOR)
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        source_dir: PathBuf,
        output_dir: PathBuf,
        runtime_source: PathBuf,
        icon: Option<PathBuf>,
        project_name: String,
        temp_dir: PathBuf,
        compress: bool,
        include_pdf: bool,
        target: TargetPlatform,
        tools_dir: PathBuf,
        clean_rebuild: bool,
        tool_timeout: Option<Duration>,
    ) -> Self {
        Self {
            source_dir,
            output_dir,
            runtime_source,
            icon,
            project_name,
            temp_dir,
            compress,
            include_pdf,
            target,
            tools_dir,
            clean_rebuild,
            tool_timeout,
        }
    }
}

/// Whether `inner` is `outer` or lies below it, comparing absolute paths and,
/// when both exist, their canonical forms.
fn is_within(inner: &Path, outer: &Path) -> bool {
    if inner.starts_with(outer) {
        return true;
    }
    match (std::fs::canonicalize(inner), std::fs::canonicalize(outer)) {
        (Ok(inner), Ok(outer)) => inner.starts_with(outer),
        _ => false,
    }
}
