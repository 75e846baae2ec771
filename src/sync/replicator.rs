// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Idempotent clone of a source secret into a target namespace.

use crate::constants::annotations;
use crate::error::{ClonerError, Result};
use crate::kubernetes::SecretStore;
use crate::sync::cache::DedupCache;
use crate::sync::retry::{retry_on_conflict, RetryPolicy};
use crate::types::WorkItem;
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct Replicator<S> {
    store: Arc<S>,
    cache: Arc<DedupCache>,
    conflict_retry: RetryPolicy,
}

impl<S: SecretStore> Replicator<S> {
    pub fn new(store: Arc<S>, cache: Arc<DedupCache>) -> Self {
        Self::with_retry_policy(store, cache, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        store: Arc<S>,
        cache: Arc<DedupCache>,
        conflict_retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            cache,
            conflict_retry,
        }
    }

    pub fn cache(&self) -> &Arc<DedupCache> {
        &self.cache
    }

    /// Make sure `item.rule.secret_name` exists in `item.namespace`, copying it
    /// from the rule's source namespace when it does not.
    ///
    /// The dedup cache is only written here; the matcher reads it before
    /// queueing, so every call still checks the store.
    #[instrument(
        skip(self, item),
        fields(namespace = %item.namespace, secret = %item.rule.secret_name)
    )]
    pub async fn replicate(&self, item: &WorkItem) -> Result<()> {
        let namespace = item.namespace.as_str();
        let rule = &item.rule;

        if self.store.get(namespace, &rule.secret_name).await?.is_some() {
            debug!("Secret already present in target namespace");
            self.cache.mark_present(item.dedup_key());
            return Ok(());
        }

        let source = self
            .store
            .get(&rule.source_namespace, &rule.secret_name)
            .await?
            .ok_or_else(|| ClonerError::SourceNotFound {
                namespace: rule.source_namespace.clone(),
                name: rule.secret_name.clone(),
            })?;

        let replica = build_replica(&source, namespace);

        info!(
            source = %format!("{}/{}", rule.source_namespace, rule.secret_name),
            "Cloning secret into namespace"
        );
        retry_on_conflict(&self.conflict_retry, "create_secret", || {
            self.store.create(namespace, &replica)
        })
        .await?;

        self.cache.mark_present(item.dedup_key());
        info!("Secret cloned");
        Ok(())
    }
}

/// Copy `source` into `target_namespace` as a new object: server-assigned
/// metadata (uid, resourceVersion, timestamps, owners) is left empty.
pub fn build_replica(source: &Secret, target_namespace: &str) -> Secret {
    let mut annotations = source.metadata.annotations.clone().unwrap_or_default();
    annotations.insert(
        annotations::REPLICATED_FROM.to_string(),
        format!(
            "{}/{}",
            source.metadata.namespace.as_deref().unwrap_or_default(),
            source.metadata.name.as_deref().unwrap_or_default()
        ),
    );

    Secret {
        metadata: ObjectMeta {
            name: source.metadata.name.clone(),
            namespace: Some(target_namespace.to_string()),
            labels: source.metadata.labels.clone(),
            annotations: Some(annotations),
            ..Default::default()
        },
        data: source.data.clone(),
        string_data: source.string_data.clone(),
        type_: source.type_.clone(),
        immutable: source.immutable,
    }
}
