// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret access behind a trait so the replicator can run against a fake.

use crate::error::{ClonerError, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{api::PostParams, Api, Client, ResourceExt};
use tracing::{debug, instrument};

/// Read/create access to secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch `namespace/name`, `None` when it does not exist
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>>;

    /// Create `secret` in `namespace`. An object that already exists counts as
    /// created; a write conflict is reported as [`ClonerError::Conflict`].
    async fn create(&self, namespace: &str, secret: &Secret) -> Result<()>;
}

/// [`SecretStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    #[instrument(skip(self))]
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        match secrets.get(name).await {
            Ok(secret) => Ok(Some(secret)),
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("Secret {}/{} does not exist", namespace, name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, secret))]
    async fn create(&self, namespace: &str, secret: &Secret) -> Result<()> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        match secrets.create(&PostParams::default(), secret).await {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(err)) if err.code == 409 && err.reason == "AlreadyExists" => {
                debug!("Secret {} already exists in {}", secret.name_any(), namespace);
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 409 => {
                Err(ClonerError::Conflict(err.message))
            }
            Err(e) => Err(e.into()),
        }
    }
}
