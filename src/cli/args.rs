//! Command line argument parsing and validation.
//!
//! This module provides comprehensive CLI argument parsing using clap,
//! with proper validation and error handling.

use crate::bundler::{
    Settings, SettingsBuilder, TargetPlatform,
    settings::{DEFAULT_OUTPUT_DIR, DEFAULT_PROJECT_NAME},
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default icon, relative to the working directory.
pub const DEFAULT_ICON: &str = "icon.ico";

/// NW.js application packager
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_nw",
    about = "Packages an NW.js application into a single branded executable",
    long_about = "Packages an NW.js application into a single branded executable.

Zips the source directory, appends the zip to the NW.js launcher, embeds the
icon with Anolis Resourcer and copies the runtime files next to the result.

Usage:
  kodegen_bundler_nw --src ./app --name viewer
  kodegen_bundler_nw --src ./app --nw nwjs-win-x64.zip --cmp --pdf --out dist

Exit code 0 = executable and runtime files are in the output directory.
Exit code 2 = the build failed; temporary files were removed.",
    disable_version_flag = true
)]
pub struct Args {
    /// Source directory containing all project files, including package.json
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub src: PathBuf,

    /// Output directory for the packaged application
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub out: PathBuf,

    /// Application icon
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ICON)]
    pub icon: PathBuf,

    /// NW.js runtime: a directory, or a .zip / .tar.gz distribution
    ///
    /// Defaults to `nw` inside the build tools directory.
    #[arg(long, value_name = "PATH", env = "NW_BUNDLER_RUNTIME")]
    pub nw: Option<PathBuf>,

    /// Target platform
    #[arg(long, value_name = "TARGET", default_value = "win64", value_parser = parse_target)]
    pub target: TargetPlatform,

    /// Application name, used for the executable file name
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PROJECT_NAME)]
    pub name: String,

    /// Temporary files directory
    ///
    /// Defaults to the system temp directory.
    #[arg(long, value_name = "DIR", env = "NW_BUNDLER_TMP")]
    pub tmp: Option<PathBuf>,

    /// Compress the application archive
    #[arg(long)]
    pub cmp: bool,

    /// Ship pdf.dll for PDF support (large)
    #[arg(long)]
    pub pdf: bool,

    /// Show available target platforms
    #[arg(long)]
    pub targets: bool,

    /// Show the versions and required versions of external tools
    #[arg(long)]
    pub version: bool,

    /// Build tools directory (holds `nw/` and `ar/Resourcer.exe`)
    ///
    /// Defaults to `buildTools` next to this executable.
    #[arg(long, value_name = "DIR", env = "NW_BUNDLER_TOOLS")]
    pub tools: Option<PathBuf>,

    /// Empty the output directory before building
    #[arg(long)]
    pub clean: bool,

    /// Kill the resource editor after this many seconds
    #[arg(long, value_name = "SECS")]
    pub tool_timeout: Option<u64>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_target(value: &str) -> Result<TargetPlatform, String> {
    value.parse().map_err(|e: crate::bundler::Error| e.to_string())
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("--name cannot be empty".to_string());
        }

        if self.tool_timeout == Some(0) {
            return Err("--tool-timeout must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Resolves the arguments into build settings.
    pub fn to_settings(&self) -> crate::bundler::Result<Settings> {
        let mut builder = SettingsBuilder::new()
            .source_dir(&self.src)
            .output_dir(&self.out)
            .icon(&self.icon)
            .project_name(&self.name)
            .target(self.target)
            .compress(self.cmp)
            .include_pdf(self.pdf)
            .clean_rebuild(self.clean)
            .tool_timeout(self.tool_timeout.map(Duration::from_secs));

        if let Some(nw) = &self.nw {
            builder = builder.runtime_source(nw);
        }
        if let Some(tmp) = &self.tmp {
            builder = builder.temp_dir(tmp);
        }
        if let Some(tools) = &self.tools {
            builder = builder.tools_dir(tools);
        }

        builder.build()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print a plain line
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        self.output.println(message)
    }

    /// Print success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = Args::try_parse_from(["kodegen_bundler_nw"]).unwrap();

        assert_eq!(args.src, PathBuf::from("."));
        assert_eq!(args.out, PathBuf::from("nw-release"));
        assert_eq!(args.icon, PathBuf::from("icon.ico"));
        assert_eq!(args.target, TargetPlatform::Win64);
        assert_eq!(args.name, "app");
        assert!(!args.cmp);
        assert!(!args.pdf);
        assert!(!args.clean);
        assert!(!args.quiet);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "kodegen_bundler_nw",
            "--src",
            "app",
            "--out",
            "dist",
            "--icon",
            "brand.ico",
            "--nw",
            "nwjs.zip",
            "--target",
            "WIN64",
            "--name",
            "viewer",
            "--tmp",
            "scratch",
            "--cmp",
            "--pdf",
            "--tools",
            "tools",
            "--clean",
            "--tool-timeout",
            "30",
        ])
        .unwrap();

        assert_eq!(args.nw, Some(PathBuf::from("nwjs.zip")));
        assert_eq!(args.tmp, Some(PathBuf::from("scratch")));
        assert_eq!(args.tool_timeout, Some(30));
        assert!(args.cmp && args.pdf && args.clean);

        let settings = args.to_settings().unwrap();
        assert_eq!(settings.project_name(), "viewer");
        assert!(settings.runtime_source().ends_with("nwjs.zip"));
        assert!(settings.tools_dir().ends_with("tools"));
        assert_eq!(settings.tool_timeout(), Some(Duration::from_secs(30)));
        assert!(settings.executable_path().ends_with("dist/viewer.exe"));
    }

    #[test]
    fn unknown_target_is_an_argument_error() {
        let err = Args::try_parse_from(["kodegen_bundler_nw", "--target", "mac64"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let args =
            Args::try_parse_from(["kodegen_bundler_nw", "--tool-timeout", "0"]).unwrap();
        assert!(args.validate().is_err());
    }
}
