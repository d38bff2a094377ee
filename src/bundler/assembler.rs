//! Final executable assembly.
//!
//! The packaged executable is the launcher followed directly by the zip
//! payload:
//!
//! ```text
//! [nw.exe bytes][app.nw bytes]
//! ```
//!
//! There is no separator, length prefix or padding. NW.js finds the payload
//! by scanning backward for the zip end-of-central-directory signature, so
//! both parts must be written verbatim.

use crate::bundler::{
    ArchivePayload, Error, Result, Settings,
    resources::{CommandRunner, embed_icon},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Outcome of the icon step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IconStatus {
    /// No icon configured.
    NotRequested,
    /// Icon embedded.
    Embedded,
    /// Embedding failed; the executable keeps the launcher's icon.
    Failed(String),
}

/// The assembled executable.
#[derive(Clone, Debug)]
pub struct AssembledExecutable {
    /// Where it was written.
    pub path: PathBuf,
    /// Bytes taken from the launcher (after icon embedding).
    pub launcher_len: u64,
    /// Bytes taken from the payload.
    pub payload_len: u64,
    /// What happened to the icon.
    pub icon: IconStatus,
    /// Whether this build created the output directory.
    pub created_output_dir: bool,
}

impl AssembledExecutable {
    /// Total size, `launcher_len + payload_len`.
    pub fn size(&self) -> u64 {
        self.launcher_len + self.payload_len
    }
}

/// Builds `<out>/<name>.exe` from the runtime launcher and the payload.
///
/// Steps, in order:
///
/// 1. Prepare the output directory (recreated on clean rebuilds; otherwise
///    only a stale executable is removed)
/// 2. Copy the launcher verbatim
/// 3. Embed the icon into the copy, if one is configured
/// 4. Append the payload verbatim
///
/// If any of steps 2–4 fails, the partial executable (and an output directory
/// this call created) is removed before the error is returned. Icon failures
/// are not errors; they are reported through [`IconStatus::Failed`].
pub async fn assemble<R: CommandRunner>(
    settings: &Settings,
    runtime_root: &Path,
    payload: &ArchivePayload,
    runner: &R,
) -> Result<AssembledExecutable> {
    let launcher = runtime_root.join(settings.target().launcher_name());
    if !tokio::fs::metadata(&launcher)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return Err(Error::path(&launcher, "NW.js launcher not found"));
    }

    let output_dir = settings.output_dir();
    let executable = settings.executable_path();
    let created_output_dir = prepare_output_dir(settings, &executable).await?;

    match write_executable(settings, &launcher, &executable, payload, runner).await {
        Ok((launcher_len, icon)) => Ok(AssembledExecutable {
            path: executable,
            launcher_len,
            payload_len: payload.size(),
            icon,
            created_output_dir,
        }),
        Err(e) => {
            log::error!(
                "Assembling {} failed, removing partial output: {}",
                executable.display(),
                e
            );
            remove_output(&executable, output_dir, created_output_dir).await;
            Err(e)
        }
    }
}

/// Removes an executable and, when this build created it, the output
/// directory. Failures are logged; the caller is already reporting an error.
pub async fn remove_output(executable: &Path, output_dir: &Path, created_output_dir: bool) {
    if let Err(e) = fs::remove_file(executable).await {
        log::warn!("{}", e);
    }
    if created_output_dir {
        if let Err(e) = fs::remove_dir_all(output_dir).await {
            log::warn!("{}", e);
        }
    }
}

/// Returns whether the output directory had to be created.
async fn prepare_output_dir(settings: &Settings, executable: &Path) -> Result<bool> {
    let output_dir = settings.output_dir();

    if settings.clean_rebuild() {
        if let Some(input) = settings.output_overlap() {
            return Err(Error::InvalidSettings(format!(
                "refusing to erase {}: it contains {}",
                output_dir.display(),
                input.display()
            )));
        }
        log::info!("Clean rebuild: recreating {}", output_dir.display());
        fs::create_dir_all(output_dir, true).await?;
        return Ok(true);
    }

    let existed = tokio::fs::try_exists(output_dir).await.unwrap_or(false);
    fs::create_dir_all(output_dir, false).await?;
    if existed {
        fs::remove_file(executable).await?;
    }
    Ok(!existed)
}

async fn write_executable<R: CommandRunner>(
    settings: &Settings,
    launcher: &Path,
    executable: &Path,
    payload: &ArchivePayload,
    runner: &R,
) -> Result<(u64, IconStatus)> {
    fs::copy_file(launcher, executable).await?;
    log::debug!(
        "Copied launcher {} to {}",
        launcher.display(),
        executable.display()
    );

    let icon = match settings.icon() {
        None => IconStatus::NotRequested,
        Some(icon) => {
            match embed_icon(runner, &settings.resource_editor_path(), executable, icon).await {
                Ok(()) => IconStatus::Embedded,
                Err(e) if e.is_recoverable() => {
                    log::warn!("Icon not embedded: {}", e);
                    IconStatus::Failed(e.to_string())
                }
                Err(e) => return Err(e),
            }
        }
    };

    // The resource editor may resize the file, so measure after it ran.
    let launcher_len = tokio::fs::metadata(executable).await?.len();

    let appended = fs::append_file(executable, payload.path()).await?;
    let total = tokio::fs::metadata(executable).await?.len();
    if appended != payload.size() || total != launcher_len + payload.size() {
        crate::bail!(
            "{} is {} bytes, expected {} launcher + {} payload bytes",
            executable.display(),
            total,
            launcher_len,
            payload.size()
        );
    }

    log::info!(
        "Assembled {} ({} launcher + {} payload bytes)",
        executable.display(),
        launcher_len,
        payload.size()
    );
    Ok((launcher_len, icon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{
        SettingsBuilder,
        resources::{ToolInvocation, ToolOutput},
    };

    struct FixedRunner(ToolOutput);

    impl CommandRunner for FixedRunner {
        async fn run(&self, _invocation: &ToolInvocation) -> Result<ToolOutput> {
            Ok(self.0.clone())
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        runtime: PathBuf,
        payload: ArchivePayload,
    }

    async fn fixture(launcher: &[u8], payload: &[u8]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let runtime = dir.path().join("nw");
        std::fs::create_dir_all(&runtime).unwrap();
        std::fs::write(runtime.join("nw.exe"), launcher).unwrap();
        let payload_path = dir.path().join("app.nw");
        std::fs::write(&payload_path, payload).unwrap();
        let payload = ArchivePayload::open(&payload_path).await.unwrap();
        Fixture {
            dir,
            runtime,
            payload,
        }
    }

    fn settings(f: &Fixture) -> SettingsBuilder {
        SettingsBuilder::new()
            .source_dir(f.dir.path().join("src"))
            .output_dir(f.dir.path().join("out"))
            .tools_dir(f.dir.path().join("buildTools"))
            .project_name("demo")
    }

    #[tokio::test]
    async fn executable_is_launcher_followed_by_payload() {
        let launcher: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let payload: Vec<u8> = (0..500u32).map(|i| (i % 13) as u8).collect();
        let f = fixture(&launcher, &payload).await;
        let settings = settings(&f).build().unwrap();

        let exe = assemble(&settings, &f.runtime, &f.payload, &FixedRunner(ToolOutput::ok()))
            .await
            .unwrap();

        let bytes = std::fs::read(&exe.path).unwrap();
        assert_eq!(exe.path, f.dir.path().join("out/demo.exe"));
        assert_eq!(bytes.len(), 1500);
        assert_eq!(&bytes[..1000], &launcher[..]);
        assert_eq!(&bytes[1000..], &payload[..]);
        assert_eq!(exe.size(), 1500);
        assert_eq!(exe.icon, IconStatus::NotRequested);
        assert!(exe.created_output_dir);
    }

    #[tokio::test]
    async fn rebuild_replaces_stale_executable_and_keeps_other_files() {
        let f = fixture(b"LAUNCHER", b"PAYLOAD").await;
        let out = f.dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("demo.exe"), b"an older, much longer build").unwrap();
        std::fs::write(out.join("nw.pak"), b"pak").unwrap();
        let settings = settings(&f).build().unwrap();

        let exe = assemble(&settings, &f.runtime, &f.payload, &FixedRunner(ToolOutput::ok()))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&exe.path).unwrap(), b"LAUNCHERPAYLOAD");
        assert!(out.join("nw.pak").exists());
        assert!(!exe.created_output_dir);
    }

    #[tokio::test]
    async fn clean_rebuild_empties_output_directory() {
        let f = fixture(b"LAUNCHER", b"PAYLOAD").await;
        let out = f.dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("leftover.dll"), b"old").unwrap();
        let settings = settings(&f).clean_rebuild(true).build().unwrap();

        assemble(&settings, &f.runtime, &f.payload, &FixedRunner(ToolOutput::ok()))
            .await
            .unwrap();

        assert!(!out.join("leftover.dll").exists());
        assert!(out.join("demo.exe").exists());
    }

    #[tokio::test]
    async fn icon_failure_is_reported_not_fatal() {
        let f = fixture(b"LAUNCHER", b"PAYLOAD").await;
        let settings = settings(&f)
            .icon(f.dir.path().join("missing.ico"))
            .build()
            .unwrap();

        let exe = assemble(&settings, &f.runtime, &f.payload, &FixedRunner(ToolOutput::ok()))
            .await
            .unwrap();

        assert!(matches!(exe.icon, IconStatus::Failed(_)));
        assert_eq!(std::fs::read(&exe.path).unwrap(), b"LAUNCHERPAYLOAD");
    }

    #[tokio::test]
    async fn missing_launcher_fails_before_touching_output() {
        let f = fixture(b"LAUNCHER", b"PAYLOAD").await;
        std::fs::remove_file(f.runtime.join("nw.exe")).unwrap();
        let settings = settings(&f).build().unwrap();

        let err = assemble(&settings, &f.runtime, &f.payload, &FixedRunner(ToolOutput::ok()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PathError { .. }));
        assert!(!f.dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn failed_append_removes_partial_executable() {
        let f = fixture(b"LAUNCHER", b"PAYLOAD").await;
        std::fs::remove_file(f.payload.path()).unwrap();
        let settings = settings(&f).build().unwrap();

        let err = assemble(&settings, &f.runtime, &f.payload, &FixedRunner(ToolOutput::ok()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Fs { .. }));
        assert!(!f.dir.path().join("out/demo.exe").exists());
        assert!(!f.dir.path().join("out").exists());
    }
}
