//! webfaction-ddns - update a DNS A record when the host's IP changes.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webfaction_ddns::cache::IpCache;
use webfaction_ddns::detector::IpFetcher;
use webfaction_ddns::updater::{DdnsUpdater, UpdateOutcome};
use webfaction_ddns::webfaction::WebfactionClient;

#[derive(Parser)]
#[command(name = "webfaction-ddns")]
#[command(about = "Update a WebFaction DNS A record for a host with a dynamic IP")]
#[command(version)]
struct Cli {
    /// DNS hostname to update
    #[arg(short, long)]
    domain: String,

    /// WebFaction account username
    #[arg(short, long)]
    username: String,

    /// WebFaction account password
    #[arg(short, long)]
    password: String,

    /// Path to the cached IP address file (default: ~/.current-ip-address)
    #[arg(short, long)]
    current_ip_address_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cache_path = match cli.current_ip_address_file {
        Some(path) => path,
        None => IpCache::default_path()?,
    };

    let updater = DdnsUpdater::new(
        IpCache::new(cache_path),
        Box::new(IpFetcher::new()),
        Box::new(WebfactionClient::new(cli.username, cli.password)),
        cli.domain.clone(),
    );

    match updater.run().await? {
        UpdateOutcome::Unchanged { current } => {
            println!(
                "IP address already up to date for {} ({})",
                cli.domain, current
            );
        }
        UpdateOutcome::Updated { previous, current } => {
            println!(
                "Updated IP address for {} ({} => {})",
                cli.domain,
                previous.as_deref().unwrap_or("none"),
                current
            );
        }
    }

    Ok(())
}
