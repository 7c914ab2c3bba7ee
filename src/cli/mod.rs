//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// VRMA batch exporter - converts humanoid animation clips to VRM Animation files
#[derive(Parser, Debug)]
#[command(name = "vrma-batch")]
#[command(version, about, long_about = None)]
#[command(author = "VRMA Batch Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vrma-batch.toml", env = "VRMA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VRMA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every humanoid clip of the input folder to VRMA
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
