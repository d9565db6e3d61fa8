//! Sync job entry point.

use std::process::ExitCode;

use sync_job::{SyncConfig, SyncOutcome};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SyncConfig::default();

    match sync_job::run(&config).await {
        Ok(SyncOutcome::Unchanged { states }) => {
            tracing::info!(states, path = %config.store_path.display(), "metadata already up to date");
            ExitCode::SUCCESS
        }
        Ok(SyncOutcome::Updated {
            states,
            cities,
            synced_at,
        }) => {
            tracing::info!(
                states,
                cities,
                %synced_at,
                path = %config.store_path.display(),
                "metadata updated"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "metadata sync failed");
            ExitCode::FAILURE
        }
    }
}
