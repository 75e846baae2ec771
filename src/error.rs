// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClonerError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to connect to Kubernetes: {0}")]
    Connectivity(String),

    #[error("Source secret {namespace}/{name} not found")]
    SourceNotFound { namespace: String, name: String },

    #[error("Write conflict: {0}")]
    Conflict(String),
}

impl ClonerError {
    /// Whether this error is an optimistic-concurrency conflict on write
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClonerError::Conflict(_))
    }
}

pub type Result<T> = std::result::Result<T, ClonerError>;
