use anyhow::Context;
use std::process::ExitCode;
use tracing::{error, info};

use dwh_loader::config::{Config, DEFAULT_CONFIG_PATH};
use dwh_loader::services::{LoadOrchestrator, PgSessionFactory};
use dwh_loader::{queries, RunReport};

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::from_file(DEFAULT_CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            error!("Failed to load configuration from {}: {}", DEFAULT_CONFIG_PATH, e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level);

    match run(&config).await {
        Ok(report) => {
            info!(
                "Load completed: {} statement(s) committed in {} ms",
                report.committed(),
                report.total_elapsed_ms()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Load failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<RunReport> {
    let catalog = queries::default_catalog(&config.catalog_params())
        .context("Failed to build statement catalog")?;

    let mut session = PgSessionFactory::connect(&config.cluster)
        .await
        .context("Failed to open warehouse session")?;

    let result = LoadOrchestrator::new().run(&mut session, &catalog).await;

    // Close regardless of outcome
    session.close().await;

    result.context("Two-phase load aborted")
}
