//! Flight Delay Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, init_metrics, load_dataset, run_server, AppConfig, AppState};
use inference_engine::train;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging.level);

    info!("=== Flight Delay Service v{} ===", env!("CARGO_PKG_VERSION"));

    let dataset = load_dataset(&config.data.dataset_path)
        .with_context(|| format!("failed to load dataset {}", config.data.dataset_path))?;
    let model = train(&dataset, &config.classifier).context("failed to train delay model")?;
    let metrics = init_metrics()?;

    let state = Arc::new(AppState::new(Arc::new(model), Some(metrics)));
    run_server(&config.server.bind_addr, state).await?;

    Ok(())
}
