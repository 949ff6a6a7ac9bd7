//! Command-line argument parsing for Sentinel.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Natural-language SQL assistant with a safety validation engine.
#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Role to validate as
    #[arg(short, long, value_name = "ROLE", default_value = "user")]
    pub role: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a SQL query against the safety pipeline
    Validate {
        /// SQL text to validate
        sql: String,
    },
    /// Estimate the impact of a SQL query
    Impact {
        /// SQL text to analyze
        sql: String,
    },
    /// Suggest improvements for a SQL query
    Suggest {
        /// SQL text to analyze
        sql: String,
    },
    /// Show the permission summary for a role
    Permissions {
        /// Role name (defaults to --role)
        name: Option<String>,
    },
    /// Answer a natural-language question using the mock LLM and database
    Ask {
        /// The business question
        question: String,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path, falling back to the platform default.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }
}
