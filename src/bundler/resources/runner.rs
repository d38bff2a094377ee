//! External command execution.
//!
//! The resource editor is the only external process the pipeline starts. It
//! is invoked through [`CommandRunner`] so the pipeline can be exercised
//! without the real tool.

use crate::bundler::{Error, Result};
use std::{
    ffi::OsString,
    future::Future,
    path::PathBuf,
    process::Stdio,
    time::Duration,
};

/// A program and its arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToolInvocation {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<OsString>,
}

impl ToolInvocation {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program file name, for messages.
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// How a finished command exited.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ToolOutput {
    /// Exit status was success.
    pub success: bool,
    /// Exit code, when the platform reports one.
    pub code: Option<i32>,
    /// Captured standard error.
    pub stderr: String,
}

impl ToolOutput {
    /// A successful exit.
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// A failed exit with `code`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
        }
    }
}

/// Runs external commands to completion.
pub trait CommandRunner: Send + Sync {
    /// Runs `invocation` and reports how it exited.
    ///
    /// An `Err` means the command could not be run at all; a command that ran
    /// and failed is an `Ok` with `success == false`.
    fn run(&self, invocation: &ToolInvocation) -> impl Future<Output = Result<ToolOutput>> + Send;
}

/// Runs commands as child processes via tokio.
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Runner that waits for commands indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills commands that run longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        log::debug!(
            "Running {} {:?}",
            invocation.program.display(),
            invocation.args
        );

        let mut command = tokio::process::Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| Error::ToolFailed {
                    tool: invocation.name(),
                    reason: format!("timed out after {}s", limit.as_secs()),
                })?,
            None => command.output().await,
        }
        .map_err(|error| Error::CommandFailed {
            command: invocation.name(),
            error,
        })?;

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
