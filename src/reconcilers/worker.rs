// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconcile worker - drains the work queue into the replicator.

use crate::kubernetes::SecretStore;
use crate::queue::WorkQueue;
use crate::sync::Replicator;
use crate::types::WorkItem;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Process items until the queue is shut down
pub async fn run_worker<S: SecretStore>(
    id: usize,
    queue: WorkQueue<WorkItem>,
    replicator: Arc<Replicator<S>>,
) {
    debug!(worker = id, "Worker started");

    while let Some(item) = queue.get().await {
        process_item(&queue, &replicator, &item).await;
        queue.done(&item);
    }

    debug!(worker = id, "Worker stopped");
}

/// Replicate one item and report the outcome to the queue. Returns whether the
/// replication succeeded.
pub async fn process_item<S: SecretStore>(
    queue: &WorkQueue<WorkItem>,
    replicator: &Replicator<S>,
    item: &WorkItem,
) -> bool {
    match replicator.replicate(item).await {
        Ok(()) => {
            queue.forget(item);
            true
        }
        Err(e) => {
            warn!(
                namespace = %item.namespace,
                secret = %item.rule.secret_name,
                requeues = queue.num_requeues(item),
                error = %e,
                "Failed to replicate secret, requeueing"
            );
            queue.add_rate_limited(item.clone());
            false
        }
    }
}

/// Spawn `count` workers sharing one queue
pub fn spawn_workers<S: SecretStore + 'static>(
    count: usize,
    queue: &WorkQueue<WorkItem>,
    replicator: &Arc<Replicator<S>>,
) -> Vec<tokio::task::JoinHandle<()>> {
    info!("Starting {} reconcile workers", count);
    (0..count)
        .map(|id| tokio::spawn(run_worker(id, queue.clone(), replicator.clone())))
        .collect()
}
