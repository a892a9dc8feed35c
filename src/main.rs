//! Phrase-Crawl main entry point
//!
//! This is the command-line interface for activating hosts and searching
//! their pages for a phrase.

use anyhow::Context;
use clap::{Parser, Subcommand};
use phrase_crawl::config::{load_config, Config};
use phrase_crawl::crawler::Coordinator;
use phrase_crawl::storage::{open_storage, EndpointStore};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Phrase-Crawl: cached phrase search over crawled hosts
///
/// Hosts are activated once by crawling their front page; searches then reuse
/// every confirmation already recorded and only fetch what is still unknown.
#[derive(Parser, Debug)]
#[command(name = "phrase-crawl")]
#[command(version)]
#[command(about = "Cached phrase search over crawled hosts", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search every known host for pages containing a phrase
    Search {
        /// Exact, case-sensitive phrase to look for
        phrase: String,
    },

    /// Crawl hosts' front pages and make them searchable
    Activate {
        /// Host names; defaults to the [[host]] entries of the config
        hosts: Vec<String>,
    },

    /// List known hosts and their endpoints
    Hosts,

    /// List phrases confirmed for one endpoint
    Phrases {
        /// Host name as it was activated
        host: String,

        /// Endpoint path, e.g. /about
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Command::Search { phrase } => handle_search(&config, &phrase).await,
        Command::Activate { hosts } => handle_activate(&config, hosts).await,
        Command::Hosts => handle_hosts(&config),
        Command::Phrases { host, path } => handle_phrases(&config, &host, &path),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("phrase_crawl=info,warn"),
            1 => EnvFilter::new("phrase_crawl=debug,info"),
            2 => EnvFilter::new("phrase_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns a token that is cancelled on Ctrl-C
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            trigger.cancel();
        }
    });
    token
}

/// Handles the search command
async fn handle_search(config: &Config, phrase: &str) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?;
    let cancel = cancel_on_interrupt();

    let groups = coordinator.search(phrase, &cancel).await?;
    if groups.is_empty() {
        println!("No pages contain {:?}", phrase);
        return Ok(());
    }

    for group in &groups {
        println!("{}", group.host);
        for page in &group.pages {
            println!("  {}  {}", page.path, page.title);
        }
    }

    Ok(())
}

/// Handles the activate command
async fn handle_activate(config: &Config, hosts: Vec<String>) -> anyhow::Result<()> {
    let names = if hosts.is_empty() {
        config.hosts.iter().map(|h| h.name.clone()).collect()
    } else {
        hosts
    };

    if names.is_empty() {
        anyhow::bail!("no hosts given and none configured under [[host]]");
    }

    let coordinator = Coordinator::from_config(config)?;
    let cancel = cancel_on_interrupt();

    let added = coordinator.activate(&names, &cancel).await?;
    println!("✓ Activated {} hosts, {} endpoints added", names.len(), added);

    Ok(())
}

/// Handles the hosts command
fn handle_hosts(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.storage.database_path))?;

    let hosts = storage.list_hosts_with_endpoints()?;
    if hosts.is_empty() {
        println!("No hosts registered");
        return Ok(());
    }

    for host in &hosts {
        let state = if host.is_searchable {
            "searchable"
        } else {
            "not activated"
        };
        println!("{} ({}, {} endpoints)", host.host, state, host.endpoints.len());
        for endpoint in &host.endpoints {
            println!("  {}  {}", endpoint.path, endpoint.title);
        }
    }

    Ok(())
}

/// Handles the phrases command
fn handle_phrases(config: &Config, host_name: &str, path: &str) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.storage.database_path))?;

    let host = storage
        .get_host(host_name)?
        .with_context(|| format!("unknown host {}", host_name))?;

    let phrases = storage.list_endpoint_phrases(&host, path)?;
    if phrases.is_empty() {
        println!("No phrases confirmed for {}{}", host.name, path);
    }
    for phrase in phrases {
        println!("{}", phrase);
    }

    Ok(())
}
