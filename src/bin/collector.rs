//! Batch collection job. One invocation = one full sequential pass over all
//! active tracked products; meant to be scheduled (cron or similar).

use tracing::error;
use tracing_subscriber::EnvFilter;

use pricewatch::collector::Collector;
use pricewatch::config::{CollectorConfig, Config};
use pricewatch::db::Store;
use pricewatch::error::Result;
use pricewatch::notifier::SlackNotifier;
use pricewatch::search::NaverSearchClient;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    // Missing search credentials are fatal: the job must not start a pass
    // it cannot execute.
    let collector_cfg = match CollectorConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cfg, collector_cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config, collector_cfg: CollectorConfig) -> Result<()> {
    let store = Store::connect(&cfg.db_path).await?;

    let search = NaverSearchClient::new(&collector_cfg)?;
    let notifier = if collector_cfg.slack_enabled && !collector_cfg.slack_webhook_url.is_empty() {
        Some(SlackNotifier::new(collector_cfg.slack_webhook_url.clone())?)
    } else {
        None
    };

    let collector = Collector::new(collector_cfg, store, search, notifier);
    collector.run().await?;

    Ok(())
}
