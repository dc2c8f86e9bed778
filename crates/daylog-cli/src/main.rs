mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "daylog")]
#[command(about = "Daily commit and work-item report across services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show your commits for one day across the configured services
    Commits {
        /// Date to query (dd.mm.yyyy, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Bypass the commit cache and query the services again
        #[arg(short, long)]
        refresh: bool,
    },
    /// Show open work items assigned to you
    Tasks {
        /// Bypass the five-minute work-item cache
        #[arg(short, long)]
        refresh: bool,
    },
    /// Manage keyword-to-ticket mappings used to auto-tag commits
    Map {
        #[command(subcommand)]
        action: MapAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum MapAction {
    /// Map a keyword to a ticket (e.g. `daylog map add checkout TCK-1`)
    Add { slug: String, ticket: String },
    /// Remove one ticket from a keyword, or the whole keyword
    Remove {
        slug: String,
        ticket: Option<String>,
    },
    /// List all mappings
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Set a configuration value (e.g. `github.token`, `commits_source`)
    Set { key: String, value: String },
    /// List all configuration (tokens masked)
    List,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Commits { date, refresh } => commands::commits::run(date, refresh).await,
        Commands::Tasks { refresh } => commands::tasks::run(refresh).await,
        Commands::Map { action } => match action {
            MapAction::Add { slug, ticket } => commands::map::add(&slug, &ticket),
            MapAction::Remove { slug, ticket } => commands::map::remove(&slug, ticket.as_deref()),
            MapAction::List => commands::map::list(),
        },
        Commands::Config { action } => match action {
            ConfigAction::Set { key, value } => commands::config::set(&key, &value),
            ConfigAction::List => commands::config::list(),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
