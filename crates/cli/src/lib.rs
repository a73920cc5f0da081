//! CLI tool for exercising consistent hash rings.
//!
//! Provides commands for:
//! - Replaying the add/remove demonstration scenario
//! - Looking up key owners
//! - Inspecting ring state and ownership skew
//! - Measuring how many keys move when a node joins

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
