use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use health_registry::{config, logging, server, ui};

const CONSOLE_LOG_FILE: &str = "health-registry-console.log";

#[derive(Parser)]
#[command(name = "health-registry", version, about = "Health program registry")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the JSON API server
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Open the terminal admin console
    Console {
        /// Overrides API_URL
        #[arg(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init()?;

    match cli.command {
        Command::Serve { port } => {
            logging::init_server(config.log_format)?;
            server::serve(&config, port.unwrap_or(config.port)).await
        }
        Command::Console { api_url } => {
            logging::init_console(Path::new(CONSOLE_LOG_FILE))?;
            let api_url = api_url.unwrap_or_else(|| config.api_url.clone());
            ui::run(&api_url).await
        }
    }
}
