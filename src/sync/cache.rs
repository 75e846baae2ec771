// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Process-local memo of secrets already confirmed present in a namespace.

use crate::types::DedupKey;
use std::collections::HashSet;
use std::sync::RwLock;

/// Set of (namespace, secret) pairs this process has seen replicated.
///
/// Never persisted and never treated as the truth: the replicator still asks
/// the store before creating anything.
#[derive(Debug, Default)]
pub struct DedupCache {
    keys: RwLock<HashSet<DedupKey>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key)
    }

    /// Record the key; returns `true` if it was not yet present
    pub fn mark_present(&self, key: DedupKey) -> bool {
        self.keys
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
