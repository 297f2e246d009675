use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nf_core::config::{DEFAULT_OUTPUT_PATH, MAX_ITEMS, TOPICS};
use nf_feeds::logging::init_logging;
use nf_feeds::{FeedManager, FeedSource, GoogleNewsSource};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fetch topic news feeds into a JSON snapshot",
    long_about = None
)]
pub struct Cli {
    /// Where the snapshot is written
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    /// Maximum number of items kept in the snapshot
    #[arg(long, default_value_t = MAX_ITEMS)]
    max_items: usize,
    /// Print the snapshot to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch all topics and write the snapshot (default)
    Fetch,
    /// List configured topics
    Topics,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logger = init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Fetch) {
        Commands::Topics => {
            println!("Configured topics:");
            for topic in TOPICS {
                println!("  {} ({}): {}", topic.name, topic.tag, topic.query);
            }
        }
        Commands::Fetch => {
            let storage_kind = if cli.dry_run { "memory" } else { "json" };
            let storage = nf_storage::create_storage(storage_kind, &cli.output)?;
            let source: Arc<dyn FeedSource> = Arc::new(GoogleNewsSource::new()?);

            match storage.latest_snapshot().await {
                Ok(Some(previous)) => logger.info(&format!(
                    "Replacing snapshot from {} ({} items)",
                    previous.generated_at,
                    previous.items.len()
                )),
                Ok(None) => {}
                Err(e) => logger.warn(&format!(
                    "Ignoring unreadable snapshot at {}: {}",
                    storage.location(),
                    e
                )),
            }

            logger.info(&format!("🦗 Fetching {} topics from {}", TOPICS.len(), source.name()));
            let manager = FeedManager::new(source, storage.clone()).with_max_items(cli.max_items);
            let snapshot = manager
                .run()
                .await
                .with_context(|| format!("Failed to write snapshot to {}", storage.location()))?;

            if cli.dry_run {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
        }
    }

    Ok(())
}
