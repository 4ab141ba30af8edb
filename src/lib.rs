//! msgprep — console message preparation
//!
//! Command-line front end over [`msgprep_core`]. Fixtures are read through
//! [`msgprep_fixtures`], pushed through the pipeline, and one view of the
//! result is written as JSON. This crate exposes the CLI definition and the
//! command runner as public modules so integration tests can drive them
//! without spawning a process.
//!
//! # Architecture
//!
//! ```text
//! FIXTURE|- ──► load ──► Registry ──► export ──► view ──► stdout
//! ```

pub mod cli;
pub mod commands;
