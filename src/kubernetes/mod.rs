// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, secret access and the pod watch.

pub mod client;
pub mod pods;
pub mod store;

pub use client::connect;
pub use pods::{applied_pod, watch_pods};
pub use store::{KubeSecretStore, SecretStore};
