//! CLI parser and dispatch.

mod commands;
mod helpers;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;
use crate::models::MediaKind;

#[derive(Parser)]
#[command(name = "boardsync")]
#[command(about = "Sync the media request board into the catalog and announce stored files")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Tv,
    Movie,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tv => MediaKind::Tv,
            KindArg::Movie => MediaKind::Movie,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog table if it does not exist
    Init,

    /// Reconcile every card on the list and publish discovered files
    Sync {
        /// Log events instead of sending them to the broker
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how each card on the list parses, without touching anything
    Parse,

    /// Scan storage for one title and print the events
    Discover {
        /// Media kind
        #[arg(value_enum)]
        kind: KindArg,
        /// Catalog id to put on the events
        media_id: String,
        /// Display name (the directory under the kind prefix)
        name: String,
        /// Publish the events to the broker
        #[arg(long)]
        publish: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Commands::Init => commands::init::cmd_init(&settings).await,
        Commands::Sync { dry_run } => commands::sync::cmd_sync(&settings, dry_run).await,
        Commands::Parse => commands::parse::cmd_parse(&settings).await,
        Commands::Discover {
            kind,
            media_id,
            name,
            publish,
        } => {
            commands::discover::cmd_discover(&settings, kind.into(), &media_id, &name, publish)
                .await
        }
    }
}
