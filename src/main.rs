//! Payroll engine HTTP server entry point.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::AppConfig;
use payroll_engine::engine::ApprovalEngine;
use payroll_engine::models::Role;
use payroll_engine::notify::TracingDelivery;
use payroll_engine::store::PayrollStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let store = Arc::new(PayrollStore::new());
    let engine = Arc::new(ApprovalEngine::new(store, Arc::new(TracingDelivery)));

    // The store starts empty; seed an administrator so the API is usable.
    let admin = engine
        .create_user(&config.seed_admin_username, Some(Role::Admin))
        .await?;
    info!(admin_id = admin.id, username = %admin.username, "Seeded administrator");

    let router = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Payroll engine listening");
    axum::serve(listener, router).await?;
    Ok(())
}
