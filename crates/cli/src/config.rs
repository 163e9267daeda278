//! CLI configuration and entry.

use crate::commands::Command;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Exercise resource mesh networks from the command line.
#[derive(Debug, Parser)]
#[command(name = "resource-mesh", version, about)]
pub struct CliConfig {
    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log));
        tracing_subscriber::fmt().with_env_filter(filter).init();

        let result = self.command.execute()?;
        println!("{}", result.report);
        Ok(())
    }
}
