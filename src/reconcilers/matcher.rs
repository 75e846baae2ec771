// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod matcher - turns pod notifications into queued work items.

use crate::queue::WorkQueue;
use crate::sync::DedupCache;
use crate::types::{PodEvent, Rule, WorkItem};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Matcher {
    rules: Vec<Rule>,
    queue: WorkQueue<WorkItem>,
    cache: Arc<DedupCache>,
}

impl Matcher {
    pub fn new(rules: Vec<Rule>, queue: WorkQueue<WorkItem>, cache: Arc<DedupCache>) -> Self {
        Self {
            rules,
            queue,
            cache,
        }
    }

    /// One work item per rule whose pattern occurs in the event's primary image
    pub fn matching_items(&self, event: &PodEvent) -> Vec<WorkItem> {
        self.rules
            .iter()
            .filter(|rule| rule.matches_image(&event.primary_image))
            .map(|rule| WorkItem::new(&event.namespace, rule.clone()))
            .collect()
    }

    /// Queue work for a pod add/update. Returns the number of items submitted.
    ///
    /// Items already confirmed in the dedup cache are skipped. This runs on the
    /// watch task and never blocks.
    pub fn on_pod(&self, pod: &Pod) -> usize {
        let Some(event) = PodEvent::from_pod(pod) else {
            debug!("Pod {} has no namespace or containers, skipping", pod.name_any());
            return 0;
        };

        let mut submitted = 0;
        for item in self.matching_items(&event) {
            if self.cache.contains(&item.dedup_key()) {
                debug!(
                    namespace = %item.namespace,
                    secret = %item.rule.secret_name,
                    "Secret already replicated, skipping"
                );
                continue;
            }

            info!(
                namespace = %item.namespace,
                secret = %item.rule.secret_name,
                image = %event.primary_image,
                "Found pod with matching image"
            );
            self.queue.add(item);
            submitted += 1;
        }

        submitted
    }
}
