//! CLI interface for the assessment driver
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Executive Edge assessment
///
/// Three rounds (capital allocation, collision cards, speed trade-offs)
/// reduced to seven dimension scores and an outlier probability.
#[derive(Parser, Debug)]
#[command(name = "edge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Take the assessment interactively
    Run,

    /// Score an allocation directly, skipping the question rounds
    Score {
        /// Category allocation as key=value (repeatable, must total 100)
        #[arg(short, long = "alloc", value_name = "KEY=VALUE", required = true)]
        alloc: Vec<String>,
    },

    /// Show the active assessment content
    Catalog,
}
