//! CLI tool for exercising resource mesh networks.
//!
//! Provides commands for:
//! - Running a randomized multi-network simulation
//! - Printing directory statistics and the debug dump

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
