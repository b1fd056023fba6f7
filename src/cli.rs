//! CLI definitions for the signup bridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Signup bridge CLI.
#[derive(Parser)]
#[command(name = "signup-bridge")]
#[command(about = "Relay signup submissions to a hosted form via browser automation")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        env = "SIGNUP_BRIDGE_CONFIG",
        default_value = "config/bridge.toml",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP server in foreground (default)
    Run {
        /// Server host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Submit one signup and print the outcome as JSON
    Submit {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        /// Select the "scientist" option on the form
        #[arg(long)]
        scientist: bool,
    },

    /// Validate the configuration and print errors and warnings
    CheckConfig,
}
