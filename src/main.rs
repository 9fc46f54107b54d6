mod api;
mod config;
mod error;
mod feed;
mod pipeline;
mod poller;
mod runner;
mod slack;
mod types;
mod watermark;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::feed::client::StackClient;
use crate::poller::Poller;
use crate::runner::Runner;
use crate::slack::SlackNotifier;
use crate::watermark::WatermarkStore;

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

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let feed = StackClient::new(cfg.clone())?;
    let notifier = SlackNotifier::new(cfg.clone())?;
    let store = WatermarkStore::new(&cfg.watermark_path, cfg.lookback_secs);
    let runner = Arc::new(Runner::new(feed, notifier, store, cfg.clone()));
    let run_lock = Arc::new(tokio::sync::Mutex::new(()));
    let health = Arc::new(HealthState::new());

    info!(
        "Watching [{}] on {} (dry_run={}, watermark file: {})",
        cfg.tags, cfg.site, cfg.dry_run, cfg.watermark_path,
    );

    if cfg.poll_interval_secs > 0 {
        let poller = Poller::new(
            Arc::clone(&runner),
            Arc::clone(&run_lock),
            Arc::clone(&health),
            cfg.poll_interval_secs,
        );
        tokio::spawn(async move { poller.run().await });
        info!("Background poll every {}s", cfg.poll_interval_secs);
    }

    let state = ApiState { runner, run_lock, health };
    let app = router(state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP trigger listening on {bind_addr} (POST /run, GET /health)");

    axum::serve(listener, app).await?;

    Ok(())
}
