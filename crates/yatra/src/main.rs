use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod http;

#[derive(Parser)]
#[command(name = "yatra")]
#[command(author, version, about = "Place search for travel itineraries")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to the places dataset (default: YATRA_DATASET, else the bundled dataset)
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for places matching a query
    Search {
        /// Search query
        query: String,

        /// Maximum results
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Only return places in this state or territory
        #[arg(long)]
        destination: Option<String>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every place in a state or territory
    Places {
        /// State or territory name
        state: String,
    },

    /// Show corpus and index statistics
    Stats,

    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Allowed CORS origin (default: any)
        #[arg(long)]
        cors_origin: Option<String>,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Search {
            query,
            limit,
            destination,
            json,
        } => commands::search(&query, cli.dataset, limit, destination, json).await,
        Commands::Places { state } => commands::places(&state, cli.dataset).await,
        Commands::Stats => commands::stats(cli.dataset).await,
        Commands::Serve { port, cors_origin } => {
            commands::serve(cli.dataset, port, cors_origin).await
        }
    }
}
