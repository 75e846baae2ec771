// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Controller wiring: pod watch → matcher → work queue → workers.

use crate::config::Config;
use crate::kubernetes::{applied_pod, SecretStore};
use crate::queue::{ExponentialBackoff, WorkQueue};
use crate::reconcilers::matcher::Matcher;
use crate::reconcilers::worker::spawn_workers;
use crate::sync::{DedupCache, Replicator};
use crate::types::WorkItem;
use futures::{pin_mut, Stream, StreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube_runtime::watcher;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct Controller<S> {
    matcher: Matcher,
    queue: WorkQueue<WorkItem>,
    replicator: Arc<Replicator<S>>,
    worker_count: usize,
}

impl<S: SecretStore + 'static> Controller<S> {
    pub fn new(store: Arc<S>, config: &Config) -> Self {
        Self::with_parts(
            config,
            WorkQueue::new(ExponentialBackoff::default()),
            Replicator::new(store, Arc::new(DedupCache::new())),
        )
    }

    /// Build a controller around an existing queue and replicator
    pub fn with_parts(
        config: &Config,
        queue: WorkQueue<WorkItem>,
        replicator: Replicator<S>,
    ) -> Self {
        let replicator = Arc::new(replicator);
        let matcher = Matcher::new(
            config.rules.clone(),
            queue.clone(),
            replicator.cache().clone(),
        );

        Self {
            matcher,
            queue,
            replicator,
            worker_count: config.worker_count.max(1),
        }
    }

    pub fn queue(&self) -> &WorkQueue<WorkItem> {
        &self.queue
    }

    pub fn cache(&self) -> &Arc<DedupCache> {
        self.replicator.cache()
    }

    /// Feed `events` to the workers until `shutdown` resolves or the stream
    /// ends, then stop the queue and wait for in-flight items to finish.
    pub async fn run<E, F>(self, events: E, shutdown: F) -> anyhow::Result<()>
    where
        E: Stream<Item = watcher::Result<watcher::Event<Pod>>>,
        F: Future<Output = ()>,
    {
        let workers = spawn_workers(self.worker_count, &self.queue, &self.replicator);

        pin_mut!(events);
        pin_mut!(shutdown);

        info!("Watching pods in all namespaces");
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        if let Some(pod) = applied_pod(event) {
                            self.matcher.on_pod(&pod);
                        }
                    }
                    Some(Err(e)) => warn!("Pod watch error: {}", e),
                    None => {
                        warn!("Pod watch stream ended");
                        break;
                    }
                },
            }
        }

        self.queue.shut_down();
        for result in futures::future::join_all(workers).await {
            if let Err(e) = result {
                error!("Worker task failed: {}", e);
            }
        }

        info!("Controller stopped");
        Ok(())
    }
}
