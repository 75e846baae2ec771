// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A replication rule: pods whose primary image contains `image_match` get a
/// copy of `source_namespace/secret_name` in their own namespace.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub secret_name: String,
    pub source_namespace: String,
    pub image_match: String,
}

impl Rule {
    pub fn new(secret_name: &str, source_namespace: &str, image_match: &str) -> Self {
        Self {
            secret_name: secret_name.to_string(),
            source_namespace: source_namespace.to_string(),
            image_match: image_match.to_string(),
        }
    }

    /// Plain substring containment, no glob or regex semantics
    pub fn matches_image(&self, image: &str) -> bool {
        image.contains(&self.image_match)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} for images matching '{}'",
            self.source_namespace, self.secret_name, self.image_match
        )
    }
}

/// A pod add/update reduced to what matching needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodEvent {
    pub namespace: String,
    pub primary_image: String,
}

impl PodEvent {
    /// Build an event from a pod. Only the first container is inspected;
    /// init and sidecar containers are ignored.
    pub fn from_pod(pod: &Pod) -> Option<Self> {
        let namespace = pod.namespace()?;
        let primary_image = pod
            .spec
            .as_ref()?
            .containers
            .first()?
            .image
            .clone()?;

        Some(Self {
            namespace,
            primary_image,
        })
    }
}

/// Unit of work on the queue: replicate `rule` into `namespace`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkItem {
    pub namespace: String,
    pub rule: Rule,
}

impl WorkItem {
    pub fn new(namespace: &str, rule: Rule) -> Self {
        Self {
            namespace: namespace.to_string(),
            rule,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            namespace: self.namespace.clone(),
            secret_name: self.rule.secret_name.clone(),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.rule.secret_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub namespace: String,
    pub secret_name: String,
}
