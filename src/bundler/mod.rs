//! NW.js application packaging.
//!
//! Turns an NW.js project and a runtime distribution into a branded,
//! self-contained executable plus the runtime files it needs:
//!
//! - [`archive`] - source tree → zip payload
//! - [`runtime`] - runtime distribution → directory, and the filtered copy
//! - [`resources`] - icon embedding through an external resource editor
//! - [`assembler`] - launcher + payload → executable
//! - [`cleanup`] - temp artifact removal
//!
//! [`Bundler`] runs them in order.

pub mod archive;
pub mod assembler;
mod builder;
pub mod cleanup;
pub mod error;
pub mod resources;
pub mod runtime;
pub mod settings;
pub mod utils;

pub use archive::{ArchivePayload, build_archive};
pub use assembler::{AssembledExecutable, IconStatus};
pub use builder::{BuildStage, BundleReport, Bundler};
pub use cleanup::{BuildWarning, TempArtifacts};
pub use error::{Error, Result};
pub use resources::{CommandRunner, ProcessRunner, ToolInvocation, ToolOutput};
pub use runtime::{CopySummary, ExclusionSet};
pub use settings::{Settings, SettingsBuilder, TargetPlatform};
