//! Configuration structures for packaging runs.
//!
//! [`Settings`] is the single immutable configuration value threaded through
//! every stage; [`SettingsBuilder`] resolves defaults and absolute paths once.

mod builder;
mod core;
mod target;

pub use builder::{
    DEFAULT_OUTPUT_DIR, DEFAULT_PROJECT_NAME, SettingsBuilder, TOOLS_DIR_NAME, default_tools_dir,
};
pub use core::{MANIFEST_FILE, RESOURCE_EDITOR, Settings};
pub use target::TargetPlatform;
