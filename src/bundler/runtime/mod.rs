//! NW.js runtime handling.
//!
//! - [`materialize`] turns the configured distribution (directory or packed
//!   archive) into a directory
//! - [`copy`] mirrors that directory into the output, minus [`exclusions`]

pub mod copy;
pub mod exclusions;
pub mod materialize;

pub use copy::{CopySummary, copy_runtime_tree};
pub use exclusions::{ConditionalExclusion, Excluded, ExclusionSet};
pub use materialize::{PackedFormat, RuntimeRoot, materialize_runtime};
