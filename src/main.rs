use std::sync::Arc;

use convictor::adapter::{FileSubscriptionStore, GammaFetcher, JsonlPublisher};
use convictor::app::{Config, Runner};
use convictor::detector::Detector;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".into());

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config {config_path}: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!(environment = %config.environment, "convictor starting");

    let fetcher = match GammaFetcher::new(&config.network, config.rate_limit_delay()) {
        Ok(f) => Arc::new(f),
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    let publisher = match JsonlPublisher::create(&config.publisher.path) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!(error = %e, "Failed to open event sink");
            std::process::exit(1);
        }
    };

    let subscriptions = Arc::new(FileSubscriptionStore::new(&config.subscriptions.path));
    let detector = Detector::new(config.detector.clone());

    let mut runner = Runner::new((&config).into(), detector, subscriptions, fetcher, publisher);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        let _ = shutdown_tx.send(true);
    });

    if let Err(e) = runner.run(shutdown_rx).await {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }

    info!("convictor stopped");
}
