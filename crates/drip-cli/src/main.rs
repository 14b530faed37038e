mod cmd;
mod output;
mod root;
mod twilio;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "drip",
    about = "Rotating content delivery — one item per recipient per run, no repeats until the tour is done",
    version,
    propagate_version = true
)]
struct Cli {
    /// State root (default: auto-detect from .drip/ or .git/)
    #[arg(long, global = true, env = "DRIP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize drip in the current directory
    Init,

    /// Deliver each recipient's next item and advance their cursors
    Send {
        /// Resolve and print instead of sending; nothing is persisted
        #[arg(long)]
        dry_run: bool,

        /// Content snapshot to use instead of the configured one
        #[arg(long, env = "DRIP_LIBRARY")]
        library: Option<PathBuf>,
    },

    /// Show each recipient's position in the tour
    Status {
        /// Content snapshot to use instead of the configured one
        #[arg(long, env = "DRIP_LIBRARY")]
        library: Option<PathBuf>,
    },

    /// Discard the persisted tour order and shuffle a fresh one
    Reshuffle {
        /// Also clear every recipient's saved position
        #[arg(long)]
        reset: bool,

        /// Content snapshot to use instead of the configured one
        #[arg(long, env = "DRIP_LIBRARY")]
        library: Option<PathBuf>,
    },

    /// Validate the configuration
    Check,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Send { dry_run, library } => {
            cmd::send::run(&root, library.as_deref(), dry_run, cli.json)
        }
        Commands::Status { library } => cmd::status::run(&root, library.as_deref(), cli.json),
        Commands::Reshuffle { reset, library } => {
            cmd::reshuffle::run(&root, library.as_deref(), reset)
        }
        Commands::Check => cmd::check::run(&root, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
