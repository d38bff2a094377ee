//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! stages in order and guarantees cleanup on every exit path.

use crate::bundler::{
    Result, Settings,
    error::Context,
    archive::build_archive_excluding,
    assembler::{AssembledExecutable, IconStatus, assemble, remove_output},
    cleanup::{BuildWarning, TempArtifacts},
    resources::{CommandRunner, ProcessRunner},
    runtime::{CopySummary, ExclusionSet, PackedFormat, copy_runtime_tree, materialize_runtime},
};
use std::fmt;

use super::checksum::calculate_sha256;

/// Pipeline states, in the order a successful build visits them.
///
/// `Failed` can follow any state before `Cleaned`; a failed build still
/// passes through `Cleaned`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BuildStage {
    /// Nothing done yet.
    Init,
    /// The application archive exists in the temp directory.
    ArchiveBuilt,
    /// The runtime is available as a directory.
    RuntimeResolved,
    /// Launcher and payload are joined in the output directory.
    Assembled,
    /// The custom icon made it into the executable.
    IconEmbedded,
    /// Runtime files sit next to the executable.
    RuntimeCopied,
    /// Temp artifacts removed.
    Cleaned,
    /// Build finished successfully.
    Done,
    /// A fatal error stopped the build.
    Failed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::Init => "init",
            BuildStage::ArchiveBuilt => "archive built",
            BuildStage::RuntimeResolved => "runtime resolved",
            BuildStage::Assembled => "executable assembled",
            BuildStage::IconEmbedded => "icon embedded",
            BuildStage::RuntimeCopied => "runtime copied",
            BuildStage::Cleaned => "cleaned",
            BuildStage::Done => "done",
            BuildStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BundleReport {
    /// The assembled executable.
    pub executable: AssembledExecutable,
    /// Hex SHA-256 of the executable.
    pub checksum: String,
    /// Runtime copy statistics.
    pub copy: CopySummary,
    /// Non-fatal problems, in the order they occurred.
    pub warnings: Vec<BuildWarning>,
    /// Every state the pipeline entered.
    pub stages: Vec<BuildStage>,
}

type StageObserver = Box<dyn Fn(BuildStage) + Send + Sync>;

/// Main bundler orchestrator.
///
/// Runs archive → runtime → assemble (with icon) → runtime copy → cleanup,
/// strictly in sequence. Temp artifacts are removed after every run,
/// successful or not, and a failed run leaves no executable behind.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_nw::bundler::{Bundler, SettingsBuilder};
///
/// # async fn example() -> kodegen_bundler_nw::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .source_dir("app")
///     .runtime_source("nwjs-v0.12.0-win-x64.zip")
///     .project_name("viewer")
///     .build()?;
///
/// let report = Bundler::new(settings).bundle().await?;
/// println!("Created {} ({} bytes)", report.executable.path.display(), report.executable.size());
/// # Ok(())
/// # }
/// ```
pub struct Bundler<R = ProcessRunner> {
    settings: Settings,
    runner: R,
    observer: Option<StageObserver>,
}

impl<R> fmt::Debug for Bundler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .finish_non_exhaustive()
    }
}

impl Bundler<ProcessRunner> {
    /// Creates a bundler that runs the resource editor as a child process.
    pub fn new(settings: Settings) -> Self {
        let runner = ProcessRunner::with_timeout(settings.tool_timeout());
        Self::with_runner(settings, runner)
    }
}

impl<R: CommandRunner> Bundler<R> {
    /// Creates a bundler with a custom command runner.
    pub fn with_runner(settings: Settings, runner: R) -> Self {
        Self {
            settings,
            runner,
            observer: None,
        }
    }

    /// Calls `observer` every time the pipeline enters a state.
    pub fn on_stage(mut self, observer: impl Fn(BuildStage) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. By the time it is returned, temp
    /// artifacts have been removed and any executable written by this run
    /// has been deleted.
    pub async fn bundle(&self) -> Result<BundleReport> {
        let mut run = Run {
            stages: Vec::new(),
            temp: TempArtifacts::new(),
            assembled: None,
            warnings: Vec::new(),
        };
        self.enter(&mut run, BuildStage::Init);

        let result = self.run_stages(&mut run).await;

        if let Err(e) = &result {
            let last = run.stages.last().copied().unwrap_or(BuildStage::Init);
            log::error!("Build failed after stage '{}': {}", last, e);
            self.enter(&mut run, BuildStage::Failed);
            if let Some(exe) = &run.assembled {
                remove_output(&exe.path, self.settings.output_dir(), exe.created_output_dir)
                    .await;
            }
        }

        let temp = std::mem::take(&mut run.temp);
        let cleanup_warnings = temp.cleanup().await;
        self.enter(&mut run, BuildStage::Cleaned);

        let (copy, checksum) = result?;
        run.warnings.extend(cleanup_warnings);
        self.enter(&mut run, BuildStage::Done);

        let executable = run
            .assembled
            .take()
            .context("pipeline finished without an assembled executable")?;

        Ok(BundleReport {
            executable,
            checksum,
            copy,
            warnings: run.warnings,
            stages: run.stages,
        })
    }

    async fn run_stages(&self, run: &mut Run) -> Result<(CopySummary, String)> {
        let settings = &self.settings;

        let archive_path = settings.archive_path();
        run.temp.track(&archive_path);
        let payload = build_archive_excluding(
            settings.source_dir(),
            &archive_path,
            settings.compress(),
            &[settings.output_dir().to_path_buf(), settings.runtime_work_dir()],
        )
        .await?;
        self.enter(run, BuildStage::ArchiveBuilt);

        if PackedFormat::detect(settings.runtime_source()).is_some() {
            run.temp.track(settings.runtime_work_dir());
        }
        let runtime = materialize_runtime(settings.runtime_source(), &settings.runtime_work_dir())
            .await?;
        self.enter(run, BuildStage::RuntimeResolved);

        let executable = assemble(settings, runtime.path(), &payload, &self.runner).await?;
        let icon = executable.icon.clone();
        let executable_name = settings
            .target()
            .executable_name(settings.project_name());
        run.assembled = Some(executable);
        self.enter(run, BuildStage::Assembled);

        match icon {
            IconStatus::Embedded => self.enter(run, BuildStage::IconEmbedded),
            IconStatus::Failed(reason) => run.warnings.push(BuildWarning::IconNotEmbedded(reason)),
            IconStatus::NotRequested => {}
        }

        // A runtime file must never overwrite the executable just written.
        let exclusions = ExclusionSet::for_settings(settings).always(executable_name);
        let copy = copy_runtime_tree(runtime.path(), settings.output_dir(), &exclusions).await?;
        self.enter(run, BuildStage::RuntimeCopied);

        let checksum = calculate_sha256(&settings.executable_path()).await?;

        Ok((copy, checksum))
    }

    fn enter(&self, run: &mut Run, stage: BuildStage) {
        log::debug!("Pipeline stage: {}", stage);
        run.stages.push(stage);
        if let Some(observer) = &self.observer {
            observer(stage);
        }
    }
}

/// Mutable state of one `bundle()` call.
struct Run {
    stages: Vec<BuildStage>,
    temp: TempArtifacts,
    assembled: Option<AssembledExecutable>,
    warnings: Vec<BuildWarning>,
}
