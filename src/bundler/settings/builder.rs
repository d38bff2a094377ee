//! Builder for constructing Settings.

use super::{Settings, TargetPlatform};
use crate::bundler::{Error, Result};
use path_absolutize::Absolutize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "nw-release";

/// Default project name.
pub const DEFAULT_PROJECT_NAME: &str = "app";

/// Name of the build tools directory next to this executable.
pub const TOOLS_DIR_NAME: &str = "buildTools";

/// Builder for constructing [`Settings`].
///
/// Every field has a default, so `SettingsBuilder::new().build()` packages the
/// current directory with the runtime found under the default tools directory.
/// All paths are made absolute once, here.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nw::bundler::{SettingsBuilder, TargetPlatform};
///
/// # fn example() -> kodegen_bundler_nw::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .source_dir("app-src")
///     .runtime_source("nwjs-v0.12.0-win-x64.zip")
///     .icon("app.ico")
///     .project_name("viewer")
///     .target(TargetPlatform::Win64)
///     .compress(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    runtime_source: Option<PathBuf>,
    icon: Option<PathBuf>,
    project_name: Option<String>,
    temp_dir: Option<PathBuf>,
    compress: bool,
    include_pdf: bool,
    target: TargetPlatform,
    tools_dir: Option<PathBuf>,
    clean_rebuild: bool,
    tool_timeout: Option<Duration>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the application source directory.
    ///
    /// Default: current directory
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: `nw-release`
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the runtime distribution (directory or `.zip`/`.tar.gz`).
    ///
    /// Default: `<tools_dir>/nw`
    pub fn runtime_source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.runtime_source = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the icon to embed.
    ///
    /// Default: None (no icon embedding)
    pub fn icon<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icon = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the project name used for the executable.
    ///
    /// Default: `app`
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Sets the temp directory.
    ///
    /// Default: the system temp directory
    pub fn temp_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.temp_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Deflate archive entries.
    ///
    /// Default: false (stored)
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Copy the PDF library with the runtime.
    ///
    /// Default: false
    pub fn include_pdf(mut self, include: bool) -> Self {
        self.include_pdf = include;
        self
    }

    /// Sets the target platform.
    ///
    /// Default: [`TargetPlatform::Win64`]
    pub fn target(mut self, target: TargetPlatform) -> Self {
        self.target = target;
        self
    }

    /// Sets the build tools directory.
    ///
    /// Default: `buildTools` next to the running executable
    pub fn tools_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.tools_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Recreate the output directory instead of updating it in place.
    ///
    /// Default: false (incremental)
    pub fn clean_rebuild(mut self, clean: bool) -> Self {
        self.clean_rebuild = clean;
        self
    }

    /// Bounds the resource editor's run time.
    ///
    /// Default: None (wait indefinitely)
    pub fn tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if the project name is empty or
    /// contains path separators, if a path can't be made absolute, or if a
    /// clean rebuild would erase the sources, runtime, temp or tools directory.
    pub fn build(self) -> Result<Settings> {
        let project_name = self
            .project_name
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
        validate_project_name(&project_name)?;

        let tools_dir = match self.tools_dir {
            Some(dir) => absolute(&dir)?,
            None => default_tools_dir()?,
        };
        let runtime_source = match self.runtime_source {
            Some(path) => absolute(&path)?,
            None => tools_dir.join("nw"),
        };
        let source_dir = absolute(self.source_dir.as_deref().unwrap_or(Path::new(".")))?;
        let output_dir = absolute(
            self.output_dir
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_OUTPUT_DIR)),
        )?;
        let temp_dir = match self.temp_dir {
            Some(dir) => absolute(&dir)?,
            None => std::env::temp_dir(),
        };
        let icon = self.icon.as_deref().map(absolute).transpose()?;

        if output_dir == source_dir {
            return Err(Error::InvalidSettings(
                "output directory must differ from the source directory".into(),
            ));
        }

        let settings = Settings::new(
            source_dir,
            output_dir,
            runtime_source,
            icon,
            project_name,
            temp_dir,
            self.compress,
            self.include_pdf,
            self.target,
            tools_dir,
            self.clean_rebuild,
            self.tool_timeout,
        );

        if settings.clean_rebuild() {
            if let Some(input) = settings.output_overlap() {
                return Err(Error::InvalidSettings(format!(
                    "clean rebuild would erase {} inside output directory {}",
                    input.display(),
                    settings.output_dir().display()
                )));
            }
        }

        Ok(settings)
    }
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidSettings("project name is empty".into()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::InvalidSettings(format!(
            "project name '{name}' must be a plain file name"
        )));
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| Error::InvalidSettings(format!("can't resolve {}: {e}", path.display())))
}

/// `buildTools` directory next to the running executable.
pub fn default_tools_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| Error::path(&exe, "executable has no parent directory"))?;
    Ok(dir.join(TOOLS_DIR_NAME))
}
