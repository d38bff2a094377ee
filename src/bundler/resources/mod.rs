//! Windows resource editing.
//!
//! - [`icon`] - main program icon replacement
//! - [`runner`] - the [`CommandRunner`] seam external tools are started through
//! - [`tool_detection`] - resource editor lookup under the tools directory

pub mod icon;
pub mod runner;
pub mod tool_detection;

pub use icon::embed_icon;
pub use runner::{CommandRunner, ProcessRunner, ToolInvocation, ToolOutput};
