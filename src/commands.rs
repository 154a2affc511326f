//! CLI command definitions
//!
//! Defines the clap commands for the catalog test suite.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios against the catalog service
    Run {
        /// Scenario to run; repeat to run several (default: all)
        #[arg(long = "scenario", short = 's')]
        scenarios: Vec<String>,

        #[command(flatten)]
        service: ServiceArgs,

        /// YAML file overriding the fixture data
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Use fixture titles as-is instead of tagging them with a run id
        #[arg(long)]
        no_tag: bool,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// List available scenarios
    List,

    /// Print the resolved configuration (secrets masked)
    Config {
        #[command(flatten)]
        service: ServiceArgs,
    },
}

/// Options shared by commands that talk to the service
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Configuration file (default: platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the catalog service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Pre-issued bearer token; skips the login call
    #[arg(long)]
    pub token: Option<String>,
}
