//! Agendo Server — application entry point.
//!
//! Wires the database layer together; the HTTP surface lives outside
//! the scheduling core and is attached here once it exists.

use agendo_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("agendo=info".parse().expect("valid directive")),
        )
        .json()
        .init();

    tracing::info!("Starting Agendo server...");

    let config = DbConfig::default();
    match DbManager::connect(&config).await {
        Ok(manager) => {
            if let Err(e) = agendo_db::run_migrations(manager.client()).await {
                tracing::error!(error = %e, "Migration failed");
                return;
            }
            tracing::info!("Database ready");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return;
        }
    }

    tracing::info!("Agendo server stopped.");
}
