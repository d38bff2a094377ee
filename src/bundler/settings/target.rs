//! Target platform profiles.

use std::{fmt, str::FromStr};

/// Platform the packaged application is built for.
///
/// Each target fixes the launcher file name, the executable extension and the
/// runtime files that never belong in the output directory.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_nw::bundler::TargetPlatform;
///
/// let target: TargetPlatform = "win64".parse().unwrap();
/// assert_eq!(target.launcher_name(), "nw.exe");
/// assert_eq!(target.executable_name("myapp"), "myapp.exe");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TargetPlatform {
    /// 64-bit Windows NW.js distribution.
    #[default]
    Win64,
}

impl TargetPlatform {
    /// Every supported target, in the order `--targets` lists them.
    pub const ALL: &'static [TargetPlatform] = &[TargetPlatform::Win64];

    /// Identifier accepted by `--target`.
    pub fn id(self) -> &'static str {
        match self {
            TargetPlatform::Win64 => "win64",
        }
    }

    /// File name of the runtime launcher inside the distribution.
    pub fn launcher_name(self) -> &'static str {
        match self {
            TargetPlatform::Win64 => "nw.exe",
        }
    }

    /// Extension of the assembled executable, without the dot.
    pub fn executable_extension(self) -> &'static str {
        match self {
            TargetPlatform::Win64 => "exe",
        }
    }

    /// Output file name for a project.
    pub fn executable_name(self, project_name: &str) -> String {
        format!("{}.{}", project_name, self.executable_extension())
    }

    /// Runtime files that are never copied next to the executable.
    ///
    /// The launcher is already inside the assembled executable; the snapshot
    /// compiler and the credits page are not needed at runtime.
    pub fn omitted_files(self) -> &'static [&'static str] {
        match self {
            TargetPlatform::Win64 => &["nwjc.exe", "nw.exe", "credits.html"],
        }
    }

    /// PDF rendering library, only copied when explicitly requested.
    pub fn pdf_library(self) -> &'static str {
        match self {
            TargetPlatform::Win64 => "pdf.dll",
        }
    }

    /// Whether runtime file names compare case-insensitively on this target.
    pub fn case_insensitive_names(self) -> bool {
        match self {
            TargetPlatform::Win64 => true,
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TargetPlatform {
    type Err = crate::bundler::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetPlatform::ALL
            .iter()
            .copied()
            .find(|t| t.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::bundler::Error::UnsupportedTarget(s.to_string()))
    }
}
