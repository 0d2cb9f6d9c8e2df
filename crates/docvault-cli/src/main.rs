//! docvault CLI - Encrypted document archive with watch-folder consumption.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// docvault - Encrypted document archive with watch-folder consumption
#[derive(Parser)]
#[command(name = "docvault")]
#[command(version)]
#[command(about = "Encrypted document archive with watch-folder consumption", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize docvault (create config, directories and database)
    Init,

    /// Run a single consumption pass over the watch directory
    Consume,

    /// Run consumption passes on a timer until interrupted
    Watch {
        /// Seconds between passes (overrides the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// List recent documents
    List {
        /// Maximum number of documents to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Show details of a document
    Show {
        /// Document ID
        id: String,
    },

    /// Decrypt a document's content artifact to a local file
    Export {
        /// Document ID
        id: String,

        /// Output path (defaults to "<title>.<ext>" in the current directory)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage tags
    #[command(subcommand)]
    Tag(TagCommands),

    /// Show archive statistics
    Status,
}

#[derive(Subcommand)]
enum TagCommands {
    /// List all tags and their match rules
    List,

    /// Create a tag with a content match rule
    Add {
        /// Tag slug (lowercase identifier)
        slug: String,

        /// Match text evaluated against document content
        #[arg(default_value = "")]
        match_text: String,

        /// Match algorithm: any, all or literal
        #[arg(short, long, default_value = "any")]
        algorithm: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Consume => commands::consume::run(),
        Commands::Watch { interval } => commands::watch::run(interval),
        Commands::List { limit } => commands::list::run(limit),
        Commands::Show { id } => commands::show::run(&id),
        Commands::Export { id, output } => commands::export::run(&id, output.as_deref()),
        Commands::Tag(TagCommands::List) => commands::tag::list(),
        Commands::Tag(TagCommands::Add {
            slug,
            match_text,
            algorithm,
        }) => commands::tag::add(&slug, &match_text, &algorithm),
        Commands::Status => commands::status::run(),
    }
}
