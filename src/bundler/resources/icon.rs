//! Icon embedding via Anolis Resourcer.
//!
//! Replaces the launcher's main program icon (`RT_GROUP_ICON`,
//! `IDR_MAINFRAME`) in the freshly copied executable. Must run before the
//! payload is appended: the resource editor rewrites the PE resource section
//! and does not preserve trailing overlay data.

use super::{
    runner::{CommandRunner, ToolInvocation},
    tool_detection::locate_resource_editor,
};
use crate::bundler::{Error, Result};
use std::{
    ffi::OsString,
    io,
    path::Path,
};

/// Resourcer operation code for "update resource".
pub const OP_UPDATE: &str = "upd";

/// `RT_GROUP_ICON` resource type.
pub const ICON_RESOURCE_TYPE: u16 = 14;

/// Resource name of the main program icon in NW.js launchers.
pub const MAIN_ICON_NAME: &str = "IDR_MAINFRAME";

/// Embeds `icon` into `executable`.
///
/// # Errors
///
/// All errors are recoverable (see [`Error::is_recoverable`]):
///
/// - [`Error::IconNotFound`] / [`Error::IconUnreadable`] for a bad icon path
/// - [`Error::ToolNotFound`] if `resource_editor` is missing
/// - [`Error::ToolFailed`] / [`Error::CommandFailed`] if the tool fails
pub async fn embed_icon<R: CommandRunner>(
    runner: &R,
    resource_editor: &Path,
    executable: &Path,
    icon: &Path,
) -> Result<()> {
    check_icon(icon).await?;
    let tool = locate_resource_editor(resource_editor)?;

    let invocation = resourcer_invocation(&tool, executable, icon);
    let output = runner.run(&invocation).await?;

    if !output.success {
        let status = match output.code {
            Some(code) => format!("exited with code {code}"),
            None => "was terminated by a signal".to_string(),
        };
        let stderr = output.stderr.trim();
        return Err(Error::ToolFailed {
            tool: invocation.name(),
            reason: if stderr.is_empty() {
                status
            } else {
                format!("{status}: {stderr}")
            },
        });
    }

    log::info!(
        "Embedded icon {} into {}",
        icon.display(),
        executable.display()
    );
    Ok(())
}

/// Resourcer command line: `-op:upd -src:<exe> -type:14 -name:IDR_MAINFRAME -file:<icon>`.
pub fn resourcer_invocation(tool: &Path, executable: &Path, icon: &Path) -> ToolInvocation {
    ToolInvocation::new(tool)
        .arg(format!("-op:{OP_UPDATE}"))
        .arg(prefixed("-src:", executable))
        .arg(format!("-type:{ICON_RESOURCE_TYPE}"))
        .arg(format!("-name:{MAIN_ICON_NAME}"))
        .arg(prefixed("-file:", icon))
}

fn prefixed(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path.as_os_str());
    arg
}

async fn check_icon(icon: &Path) -> Result<()> {
    let unreadable = |error: io::Error| Error::IconUnreadable {
        path: icon.to_path_buf(),
        error,
    };

    let metadata = match tokio::fs::metadata(icon).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::IconNotFound {
                path: icon.to_path_buf(),
            });
        }
        Err(e) => return Err(unreadable(e)),
    };
    if !metadata.is_file() {
        return Err(unreadable(io::Error::other("not a regular file")));
    }

    tokio::fs::File::open(icon).await.map_err(unreadable)?;
    Ok(())
}
