//! Terminal output for the CLI.
//!
//! Progress goes to stdout, warnings and errors to stderr. Status markers are
//! colored only when the target stream supports it, so redirected output
//! stays plain text.

use owo_colors::{OwoColorize, Stream};
use std::io::{self, Write};

mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
}

/// Writes user-facing messages, honoring quiet mode.
///
/// Errors are always written, even when quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputManager {
    quiet: bool,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print a plain line
    pub fn println(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout().lock(), "{message}")?;
        }
        Ok(())
    }

    /// Print a completed pipeline step
    pub fn step(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(
                io::stdout().lock(),
                "  {} {}",
                symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
                message
            )?;
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(
                io::stdout().lock(),
                "{}",
                message.if_supports_color(Stream::Stdout, |s| s.green())
            )?;
        }
        Ok(())
    }

    /// Print a warning to stderr
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(
                io::stderr().lock(),
                "{} {}",
                format!("{} warning:", symbols::WARNING)
                    .if_supports_color(Stream::Stderr, |s| s.yellow()),
                message
            )?;
        }
        Ok(())
    }

    /// Print an error to stderr, even in quiet mode
    pub fn error(&self, message: &str) -> io::Result<()> {
        writeln!(
            io::stderr().lock(),
            "{} {}",
            format!("{} error:", symbols::ERROR).if_supports_color(Stream::Stderr, |s| s.red()),
            message
        )
    }

    /// Print a follow-up hint for an error, even in quiet mode
    pub fn hint(&self, message: &str) -> io::Result<()> {
        writeln!(
            io::stderr().lock(),
            "  {} {}",
            "hint:".if_supports_color(Stream::Stderr, |s| s.dimmed()),
            message
        )
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> io::Result<()> {
        if !self.quiet {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", title.if_supports_color(Stream::Stdout, |s| s.cyan()))?;
            writeln!(out, "---")?;
        }
        Ok(())
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout().lock(), "  {message}")?;
        }
        Ok(())
    }
}
