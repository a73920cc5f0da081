//! Command-line configuration.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use corelib::partitioner::{Crc32Partitioner, Xxh3Partitioner};
use corelib::{PartitionerKind, RingConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::commands::{execute, Command};

/// Consistent hash ring explorer.
#[derive(Parser, Debug)]
#[command(name = "hashring", version, about = "Consistent hash ring explorer")]
pub struct CliConfig {
    /// JSON ring configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Virtual nodes per node (overrides the config file).
    #[arg(long, global = true)]
    pub vnodes: Option<usize>,

    /// Hash function for keys and virtual nodes (overrides the config file).
    #[arg(long, global = true, value_enum)]
    pub partitioner: Option<PartitionerArg>,

    /// Node address; repeat for several nodes (replaces the config file list).
    #[arg(long = "node", global = true)]
    pub nodes: Vec<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartitionerArg {
    Crc32,
    Xxh3,
}

impl From<PartitionerArg> for PartitionerKind {
    fn from(arg: PartitionerArg) -> Self {
        match arg {
            PartitionerArg::Crc32 => PartitionerKind::Crc32,
            PartitionerArg::Xxh3 => PartitionerKind::Xxh3,
        }
    }
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        setup_tracing(&self.log_level);

        let ring_config = self.ring_config()?;
        info!(
            vnodes = ring_config.vnodes_per_node,
            partitioner = ?ring_config.partitioner,
            nodes = ring_config.nodes.len(),
            "ring configuration resolved"
        );

        let result = match ring_config.partitioner {
            PartitionerKind::Crc32 => execute(&self.command, &ring_config, Crc32Partitioner)?,
            PartitionerKind::Xxh3 => execute(&self.command, &ring_config, Xxh3Partitioner)?,
        };
        for line in result.lines {
            println!("{}", line);
        }
        Ok(())
    }

    /// Config file (or defaults) with command-line overrides applied.
    pub fn ring_config(&self) -> anyhow::Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => RingConfig::load(path)
                .with_context(|| format!("loading ring config from {}", path.display()))?,
            None => RingConfig::default(),
        };
        if let Some(vnodes) = self.vnodes {
            config.vnodes_per_node = vnodes;
        }
        if let Some(partitioner) = self.partitioner {
            config.partitioner = partitioner.into();
        }
        if !self.nodes.is_empty() {
            config.nodes = self.nodes.clone();
        }
        config.validate().context("invalid ring configuration")?;
        debug!(?config, "effective ring configuration");
        Ok(config)
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set.
fn setup_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
