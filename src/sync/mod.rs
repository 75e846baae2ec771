// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret replication: dedup cache, conflict retry and the replicator.

pub mod cache;
pub mod replicator;
pub mod retry;

pub use cache::DedupCache;
pub use replicator::{build_replica, Replicator};
pub use retry::{retry_on_conflict, retry_with_backoff, RetryPolicy};
