//! Command line interface for the NW.js bundler.
//!
//! This module provides the CLI for packaging runs,
//! with argument parsing, pipeline execution, and user feedback.

mod args;
mod output;

pub use args::{Args, DEFAULT_ICON, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{BuildStage, BundleReport, Bundler, Settings, TargetPlatform};
use crate::error::{CliError, Result};

/// NW.js release the launcher layout is built for.
pub const NW_VERSION: &str = "1.2.0";

/// Anolis Resourcer release used for icon embedding.
pub const RESOURCER_VERSION: &str = "0.9.0";

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = RuntimeConfig::from(&args);

    if args.targets {
        print_targets(&config)?;
        return Ok(0);
    }
    if args.version {
        print_versions(&config)?;
        return Ok(0);
    }

    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let settings = args.to_settings()?;

    print_configuration(&config, &settings)?;

    let output = *config.output();
    let bundler = Bundler::new(settings).on_stage(move |stage| {
        if let Some(line) = stage_line(stage) {
            if let Err(e) = output.step(line) {
                log::debug!("Could not write progress line: {}", e);
            }
        }
    });

    let report = bundler.bundle().await?;
    print_summary(&config, &report)?;

    Ok(0)
}

fn print_targets(config: &RuntimeConfig) -> Result<()> {
    let out = config.output();
    out.println("Available target platforms:").map_err(CliError::Output)?;
    for target in TargetPlatform::ALL {
        out.indent(&format!("* {target}")).map_err(CliError::Output)?;
    }
    Ok(())
}

fn print_versions(config: &RuntimeConfig) -> Result<()> {
    let out = config.output();
    out.println(&format!("kodegen_bundler_nw version {}", clap::crate_version!()))
        .map_err(CliError::Output)?;
    out.println(&format!("nw.js version {NW_VERSION}"))
        .map_err(CliError::Output)?;
    out.println(&format!("Anolis Resourcer version {RESOURCER_VERSION}"))
        .map_err(CliError::Output)?;
    Ok(())
}

fn print_configuration(config: &RuntimeConfig, settings: &Settings) -> Result<()> {
    let icon = settings
        .icon()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());

    config.section("kodegen_bundler_nw").map_err(CliError::Output)?;
    for line in [
        format!("NW.js runtime: {}", settings.runtime_source().display()),
        format!("Source directory: {}", settings.source_dir().display()),
        format!("Output directory: {}", settings.output_dir().display()),
        format!("Icon path: {icon}"),
        format!("Output executable: {}", settings.executable_path().display()),
        format!("Temporary directory: {}", settings.temp_dir().display()),
    ] {
        config.indent(&line).map_err(CliError::Output)?;
    }
    config.println("").map_err(CliError::Output)?;
    Ok(())
}

fn stage_line(stage: BuildStage) -> Option<&'static str> {
    match stage {
        BuildStage::ArchiveBuilt => Some("Application archive created"),
        BuildStage::RuntimeResolved => Some("NW.js runtime resolved"),
        BuildStage::Assembled => Some("Executable assembled"),
        BuildStage::IconEmbedded => Some("Icon embedded"),
        BuildStage::RuntimeCopied => Some("Runtime files copied"),
        BuildStage::Cleaned => Some("Temporary files removed"),
        BuildStage::Init | BuildStage::Done | BuildStage::Failed => None,
    }
}

fn print_summary(config: &RuntimeConfig, report: &BundleReport) -> Result<()> {
    for warning in &report.warnings {
        config.warn(&warning.to_string()).map_err(CliError::Output)?;
    }

    let exe = &report.executable;
    config.println("").map_err(CliError::Output)?;
    config
        .success(&format!("Done! Created {}", exe.path.display()))
        .map_err(CliError::Output)?;
    config
        .indent(&format!(
            "Size: {} bytes (launcher {} + payload {})",
            exe.size(),
            exe.launcher_len,
            exe.payload_len
        ))
        .map_err(CliError::Output)?;
    config
        .indent(&format!("SHA-256: {}", report.checksum))
        .map_err(CliError::Output)?;
    config
        .indent(&format!(
            "Runtime files: {} copied, {} unchanged, {} excluded",
            report.copy.copied, report.copy.unchanged, report.copy.excluded
        ))
        .map_err(CliError::Output)?;
    Ok(())
}
