// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Domain types shared by the watcher, queue and replicator.

pub mod rule;

pub use rule::{DedupKey, PodEvent, Rule, WorkItem};
