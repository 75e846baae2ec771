// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client bootstrap

use crate::error::{ClonerError, Result};
use kube::Client;
use tracing::info;

/// Create a client from the in-cluster environment or the local kubeconfig
pub async fn connect() -> Result<Client> {
    let client = Client::try_default()
        .await
        .map_err(|e| ClonerError::Connectivity(format!("Failed to create client: {}", e)))?;

    let version = client
        .apiserver_version()
        .await
        .map_err(|e| ClonerError::Connectivity(format!("Failed to reach API server: {}", e)))?;
    info!(
        "Connected to Kubernetes cluster (version {}.{})",
        version.major, version.minor
    );

    Ok(client)
}
