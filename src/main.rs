mod cli;
mod server;
mod tools;

use anyhow::Result;
use attention_tape::config::TapeConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tape", version, about = "Attention tape: interest log and branchable interest lists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport unless --http)
    Serve {
        /// Serve Streamable HTTP on the configured host and port
        #[arg(long)]
        http: bool,
    },
    /// Show the trajectory of interests around now
    Trajectory {
        #[arg(long)]
        owner: Option<String>,
        /// How many entries to walk back
        #[arg(long)]
        depth: Option<usize>,
        /// Walk through pruned entries
        #[arg(long)]
        include_pruned: bool,
    },
    /// Show which kinds of interest paid off
    Insights {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Search interests by text
    Search {
        query: String,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List interest lists
    Lists {
        #[arg(long)]
        owner: Option<String>,
        /// Include archived lists
        #[arg(long)]
        all: bool,
    },
    /// Show one list with its items and branches
    Show { list_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TapeConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { http } => {
            if http || config.server.transport == "http" {
                server::serve_http(config).await?;
            } else {
                server::serve_stdio(config).await?;
            }
        }
        Command::Trajectory {
            owner,
            depth,
            include_pruned,
        } => cli::trajectory::trajectory(&config, owner.as_deref(), depth, include_pruned)?,
        Command::Insights { owner } => cli::insights::insights(&config, owner.as_deref())?,
        Command::Search {
            query,
            owner,
            limit,
        } => cli::search::search(&config, owner.as_deref(), &query, limit)?,
        Command::Lists { owner, all } => cli::lists::lists(&config, owner.as_deref(), all)?,
        Command::Show { list_id } => cli::lists::show(&config, &list_id)?,
    }

    Ok(())
}
