//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that drives the
//! packaging pipeline:
//!
//! 1. Archive the application sources into a zip payload
//! 2. Resolve the NW.js runtime (directory or packed distribution)
//! 3. Assemble the executable: launcher + icon + payload
//! 4. Copy the remaining runtime files next to it
//! 5. Remove temp artifacts, whatever happened before
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct and the pipeline state machine

pub(crate) mod checksum;
mod orchestrator;

pub use orchestrator::{BuildStage, BundleReport, Bundler};
