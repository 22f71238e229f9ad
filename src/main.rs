//! rampup - get up to speed on an unfamiliar codebase
//!
//! Scans a source tree into a JSON summary and hands the summary plus
//! selected files to a hosted chat model for explanations, learning
//! resources and Q&A.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod ai;
mod cli;
mod config;
mod error;
mod prompt;
mod scan;
mod session;
mod summary;
mod ui;

/// rampup - ramp up on a codebase with AI assistance
#[derive(Parser)]
#[command(name = "rampup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan a codebase and ramp up on it with an AI assistant", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a folder and write the repository summary
    Scan {
        /// Folder to scan
        root: String,

        /// File extensions, comma-separated (e.g. "py, .js, ts")
        #[arg(short, long)]
        ext: Option<String>,

        /// Summary file name, relative to the current directory
        #[arg(short, long)]
        output: Option<String>,

        /// Match the ignore list against whole path components
        #[arg(long)]
        segment_match: bool,

        /// Skip files that cannot be read instead of aborting
        #[arg(long)]
        skip_unreadable: bool,

        /// Send the summary to the model after scanning
        #[arg(long)]
        prime: bool,
    },

    /// List files from the last summary
    Files {
        /// Summary file to read
        #[arg(short, long)]
        summary: Option<String>,

        /// Only show paths containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Explain a file in the context of its repository
    Explain {
        /// Folder to scan
        root: String,

        /// File to explain, relative to the folder; pick interactively if omitted
        file: Option<String>,

        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Suggest learning resources for the concepts a file uses
    Learn {
        /// Folder to scan
        root: String,

        /// File to study, relative to the folder; pick interactively if omitted
        file: Option<String>,

        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Chat with the assistant about a file
    Chat {
        /// Folder to scan
        root: String,

        /// File to discuss, relative to the folder; pick interactively if omitted
        file: Option<String>,

        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },

    /// Show version and configuration info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the flag
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;
    config.verbose = cli.verbose;

    debug!("rampup v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Scan {
            root,
            ext,
            output,
            segment_match,
            skip_unreadable,
            prime,
        } => {
            let args = cli::scan::ScanArgs {
                root,
                extensions: ext,
                output,
                segment_match,
                skip_unreadable,
                prime,
            };
            cli::scan::run(config, args).await?;
        }
        Commands::Files { summary, filter } => {
            cli::files::run(&config, summary.as_deref(), filter.as_deref())?;
        }
        Commands::Explain { root, file, ext } => {
            cli::explain::run(config, &root, file.as_deref(), ext.as_deref(), cli::explain::Mode::Analyze).await?;
        }
        Commands::Learn { root, file, ext } => {
            cli::explain::run(config, &root, file.as_deref(), ext.as_deref(), cli::explain::Mode::Learn).await?;
        }
        Commands::Chat { root, file, ext } => {
            cli::chat::run(config, &root, file.as_deref(), ext.as_deref()).await?;
        }
        Commands::Config { show, init } => {
            if init {
                config::init_config(cli.config.as_deref())?;
            } else if show {
                config::show_config(&config)?;
            }
        }
        Commands::Info => {
            cli::info::run(&config)?;
        }
    }

    Ok(())
}
