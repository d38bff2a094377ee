//! Runtime files that stay out of the output directory.

use crate::bundler::{Settings, TargetPlatform};

/// A file excluded unless its guard flag is set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConditionalExclusion {
    /// File name to match.
    pub name: String,
    /// When true the file is copied after all.
    pub enabled: bool,
}

/// Why a runtime file is not copied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Excluded {
    /// Always left out.
    Always,
    /// Left out because its guard flag is off.
    FlagOff,
}

/// File names the runtime copier must skip.
///
/// Names are matched against the final path component only.
#[derive(Clone, Debug, Default)]
pub struct ExclusionSet {
    always: Vec<String>,
    conditional: Vec<ConditionalExclusion>,
    case_insensitive: bool,
}

impl ExclusionSet {
    /// Empty set with exact name matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusions for a target and the build's feature flags.
    pub fn for_settings(settings: &Settings) -> Self {
        Self::for_target(settings.target(), settings.include_pdf())
    }

    /// Exclusions for a target: its omitted files, plus the PDF library
    /// unless `include_pdf`.
    pub fn for_target(target: TargetPlatform, include_pdf: bool) -> Self {
        let mut set = Self::new().case_insensitive(target.case_insensitive_names());
        for name in target.omitted_files() {
            set = set.always(*name);
        }
        set.conditional(target.pdf_library(), include_pdf)
    }

    /// Adds an unconditional exclusion.
    pub fn always(mut self, name: impl Into<String>) -> Self {
        self.always.push(name.into());
        self
    }

    /// Adds an exclusion that is lifted when `enabled` is true.
    pub fn conditional(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.conditional.push(ConditionalExclusion {
            name: name.into(),
            enabled,
        });
        self
    }

    /// Compare names ignoring ASCII case.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Whether and why `file_name` is excluded.
    pub fn check(&self, file_name: &str) -> Option<Excluded> {
        if self.always.iter().any(|n| self.matches(n, file_name)) {
            return Some(Excluded::Always);
        }
        self.conditional
            .iter()
            .find(|c| !c.enabled && self.matches(&c.name, file_name))
            .map(|_| Excluded::FlagOff)
    }

    /// Whether `file_name` must not be copied.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.check(file_name).is_some()
    }

    fn matches(&self, pattern: &str, file_name: &str) -> bool {
        if self.case_insensitive {
            pattern.eq_ignore_ascii_case(file_name)
        } else {
            pattern == file_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win64_omits_launcher_compiler_and_credits() {
        let set = ExclusionSet::for_target(TargetPlatform::Win64, false);
        assert_eq!(set.check("nw.exe"), Some(Excluded::Always));
        assert_eq!(set.check("NWJC.EXE"), Some(Excluded::Always));
        assert_eq!(set.check("credits.html"), Some(Excluded::Always));
        assert_eq!(set.check("nw.pak"), None);
    }

    #[test]
    fn pdf_library_follows_flag() {
        let without = ExclusionSet::for_target(TargetPlatform::Win64, false);
        let with = ExclusionSet::for_target(TargetPlatform::Win64, true);
        assert_eq!(without.check("pdf.dll"), Some(Excluded::FlagOff));
        assert_eq!(with.check("pdf.dll"), None);
    }

    #[test]
    fn unconditional_wins_over_enabled_conditional() {
        let set = ExclusionSet::new().always("a.dll").conditional("a.dll", true);
        assert!(set.is_excluded("a.dll"));
    }

    #[test]
    fn exact_matching_by_default() {
        let set = ExclusionSet::new().always("nw.exe");
        assert!(set.is_excluded("nw.exe"));
        assert!(!set.is_excluded("NW.EXE"));
    }
}
