//! Synapse CLI - Command-line interface for Synapse
//!
//! Builds knowledge graphs from document exports and runs the engine's
//! operations on them, either one at a time or as a long-running worker
//! speaking line-delimited JSON over stdio.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use synapse_graph::{LayoutSettings, DEFAULT_DAMPING, DEFAULT_ITERATIONS};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "synapse")]
#[command(author = "Synapse Contributors")]
#[command(version)]
#[command(about = "Knowledge graph layout and analysis", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from a JSON array of documents
    Build {
        /// Documents file
        input: PathBuf,

        /// Output file for the graph JSON (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute a force-directed layout
    Layout {
        /// Graph or documents file
        input: PathBuf,

        /// Canvas width
        #[arg(long, default_value = "800")]
        width: f64,

        /// Canvas height
        #[arg(long, default_value = "600")]
        height: f64,

        /// Simulation steps
        #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,

        /// Damping factor in (0, 1]
        #[arg(short, long, default_value_t = DEFAULT_DAMPING)]
        damping: f64,

        /// Output file for the positioned graph (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show density, degree and clustering metrics
    Analyze {
        /// Graph or documents file
        input: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Group nodes into communities
    Communities {
        /// Graph or documents file
        input: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Recompute node centrality
    Centrality {
        /// Graph or documents file
        input: PathBuf,

        /// Maximum rows to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Serve engine requests as line-delimited JSON on stdin/stdout
    Worker,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config = match commands::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Build { input, output } => commands::build(&input, output.as_deref()),
        Commands::Layout {
            input,
            width,
            height,
            iterations,
            damping,
            output,
        } => {
            let settings = LayoutSettings::new(width, height)
                .with_iterations(iterations)
                .with_damping(damping);
            commands::layout(&config, &input, settings, output.as_deref()).await
        }
        Commands::Analyze { input, json } => commands::analyze(&config, &input, json).await,
        Commands::Communities { input, json } => {
            commands::communities(&config, &input, json).await
        }
        Commands::Centrality { input, limit, json } => {
            commands::centrality(&config, &input, limit, json).await
        }
        Commands::Worker => commands::worker(&config).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
