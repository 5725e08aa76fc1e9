//! Command-line interface for the indie-radar binary.
//!
//! The CLI exposes an `update` subcommand that searches GitHub for matching
//! repositories and merges the results into the README's auto-generated
//! table block.

use std::{path::PathBuf, process};

use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use indie_radar::{
    Error, LocationCache, MergeOptions, build_client, build_rows, fetch_owner_locations,
    load_config, merge_document, resolve_token, search_repositories, surviving_logins,
    update_readme,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line interface for refreshing the curated project table.
#[derive(Debug, Parser)]
#[command(name = "indie-radar", version, about = "Refresh the curated indie project table")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
/// Supported commands exposed by the CLI.
enum Command {
    /// Search GitHub and merge new entries into the README table.
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
/// Arguments accepted by the `update` subcommand.
struct UpdateArgs {
    /// Path to the configuration file (JSON or YAML).
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Path to the README holding the auto-generated table block.
    #[arg(long = "readme", value_name = "PATH", default_value = "README.md")]
    readme: PathBuf,

    /// Print the merged table instead of writing the README.
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(error) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from configuration loading, the GitHub
/// search and the README merge.
async fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Command::Update(args) => run_update(args).await,
    }
}

async fn run_update(args: UpdateArgs) -> Result<(), Error> {
    let config = load_config(&args.config)?;

    let token = resolve_token().ok_or_else(|| {
        Error::validation(
            "no GitHub token found; set GITHUB_TOKEN or GH_TOKEN, or run `gh auth login` \
             (unauthenticated search is rate limited immediately)"
        )
    })?;

    let client = build_client(&token)?;
    let records = search_repositories(&client, &config).await?;
    let now = Utc::now();

    let mut locations = if config.github.include_owner_location {
        let logins = surviving_logins(&records, &config, now);
        let directory = fetch_owner_locations(&client, &logins).await;
        LocationCache::new(Box::new(move |login: &str| directory.get(login).cloned())
            as Box<dyn FnMut(&str) -> Option<String>>)
    } else {
        LocationCache::new(
            Box::new(|_: &str| None) as Box<dyn FnMut(&str) -> Option<String>>
        )
    };

    let rows = build_rows(&records, &config, &mut locations, now);
    info!("{} candidate rows after ranking", rows.len());

    let options = MergeOptions {
        max_total:              config.github.max_total,
        max_description_length: config.github.max_description_length,
        exclude_keywords:       config.filters.exclude_keywords.clone(),
        prune_existing:         config.filters.prune_existing
    };

    if args.dry_run {
        let content = std::fs::read_to_string(&args.readme)
            .map_err(|source| indie_radar::io_error(&args.readme, source))?;
        let (updated, added) = merge_document(&content, &rows, &options)?;
        let block = updated
            .split(indie_radar::AUTO_START)
            .nth(1)
            .and_then(|rest| rest.split(indie_radar::AUTO_END).next())
            .unwrap_or_default();
        println!("{}", block.trim());
        println!("新增条目: {added}");
        return Ok(());
    }

    let added = update_readme(&args.readme, &rows, &options)?;
    println!("新增条目: {added}");
    Ok(())
}
