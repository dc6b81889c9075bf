//! World tile renderer service library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod cli;
pub mod config;
pub mod pipeline;

pub use config::TilerConfig;
pub use pipeline::{run, run_with_provider, RunSummary};
