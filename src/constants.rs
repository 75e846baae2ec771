// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys set on replicated secrets
pub mod annotations {
    /// `<namespace>/<name>` of the secret a replica was cloned from
    pub const REPLICATED_FROM: &str = "secret-cloner.io/replicated-from";
}

/// Environment variable names read at startup
pub mod env {
    pub const SECRET_RULES: &str = "SECRET_RULES";
    pub const RULES_FILE: &str = "RULES_FILE";
    pub const SECRET_NAME: &str = "SECRET_NAME";
    pub const SOURCE_NAMESPACE: &str = "SOURCE_NAMESPACE";
    pub const TARGET_IMAGE: &str = "TARGET_IMAGE";
    pub const WORKER_COUNT: &str = "WORKER_COUNT";

    /// Separates rules in `SECRET_RULES`
    pub const RULE_DELIMITER: char = ';';
    /// Separates the fields of one rule in `SECRET_RULES`
    pub const FIELD_DELIMITER: char = ',';

    pub const DEFAULT_WORKER_COUNT: usize = 2;
}

/// Per-item backoff of the work queue
pub mod queue {
    pub const BASE_DELAY_MILLIS: u64 = 5;
    pub const MAX_DELAY_SECS: u64 = 1000;
}

/// Retry policy for secret creation hitting a write conflict
pub mod conflict_retry {
    pub const MAX_ATTEMPTS: u32 = 5;
    pub const INITIAL_DELAY_MILLIS: u64 = 10;
    pub const FACTOR: f64 = 2.0;
    pub const MAX_DELAY_MILLIS: u64 = 1000;
}
