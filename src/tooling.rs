//! Tooling & Integration Layer
//!
//! Command-line front end for the database service.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
