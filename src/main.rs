// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use secret_cloner::config::Config;
use secret_cloner::kubernetes::{connect, watch_pods, KubeSecretStore};
use secret_cloner::reconcilers::Controller;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting secret clone controller");

    // Load configuration
    let config = Config::from_env()?;
    for rule in &config.rules {
        info!("Loaded rule: {}", rule);
    }

    // Create Kubernetes client
    let client = connect().await?;

    let store = Arc::new(KubeSecretStore::new(client.clone()));
    let controller = Controller::new(store, &config);

    controller
        .run(watch_pods(client), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}
