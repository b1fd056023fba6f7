//! Signup bridge
//!
//! Main entry point for the signup bridge CLI and server.

mod cli;
mod cmd_submit;
mod server;

use clap::Parser;
use tracing::error;

use signup_config::ConfigLoader;
use signup_relay::SignupRequest;

use crate::cli::{Cli, Commands};
use crate::cmd_submit::{handle_check_config, handle_submit};
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_with_env(&cli.config)?;
    init_tracing(&config.logging)?;

    let ok = match cli.command {
        None => {
            run_server(config).await?;
            true
        }
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
            true
        }
        Some(Commands::Submit {
            first_name,
            last_name,
            email,
            scientist,
        }) => {
            let request = SignupRequest {
                first_name: Some(first_name),
                last_name: Some(last_name),
                email: Some(email),
                is_scientist: Some(scientist),
            };
            handle_submit(config, request).await?
        }
        Some(Commands::CheckConfig) => handle_check_config(&config)?,
    };

    if !ok {
        error!("Command failed");
        std::process::exit(1);
    }
    Ok(())
}
