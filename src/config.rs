// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::env::{self, DEFAULT_WORKER_COUNT, FIELD_DELIMITER, RULE_DELIMITER};
use crate::error::{ClonerError, Result};
use crate::types::Rule;
use std::fs;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Replication rules, never empty
    pub rules: Vec<Rule>,
    /// Number of concurrent reconcile workers
    pub worker_count: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Rules are collected from `RULES_FILE`, then `SECRET_RULES`, then the
    /// single-rule variables. The single-rule variables are mandatory only when
    /// neither of the list sources is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut rules = Vec::new();

        let rules_file = get(env::RULES_FILE);
        if let Some(path) = &rules_file {
            rules.extend(load_rules_file(path)?);
        }

        let secret_rules = get(env::SECRET_RULES);
        if let Some(encoded) = &secret_rules {
            rules.extend(parse_rules(encoded)?);
        }

        let single = (
            get(env::SECRET_NAME),
            get(env::SOURCE_NAMESPACE),
            get(env::TARGET_IMAGE),
        );
        match single {
            (Some(name), Some(namespace), Some(image)) => {
                rules.push(Rule::new(name.trim(), namespace.trim(), image.trim()));
            }
            (None, None, None) if rules_file.is_some() || secret_rules.is_some() => {}
            _ => {
                return Err(ClonerError::Config(format!(
                    "{}, {} and {} must all be set (or configure {} / {})",
                    env::SECRET_NAME,
                    env::SOURCE_NAMESPACE,
                    env::TARGET_IMAGE,
                    env::SECRET_RULES,
                    env::RULES_FILE
                )));
            }
        }

        let mut unique: Vec<Rule> = Vec::with_capacity(rules.len());
        for rule in rules {
            if !unique.contains(&rule) {
                unique.push(rule);
            }
        }

        if unique.is_empty() {
            return Err(ClonerError::Config("no replication rules configured".to_string()));
        }

        let worker_count = match get(env::WORKER_COUNT) {
            Some(v) => v.trim().parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ClonerError::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    env::WORKER_COUNT,
                    v
                ))
            })?,
            None => DEFAULT_WORKER_COUNT,
        };

        Ok(Config {
            rules: unique,
            worker_count,
        })
    }
}

/// Parse `name,namespace,image;name,namespace,image` into rules
pub fn parse_rules(encoded: &str) -> Result<Vec<Rule>> {
    encoded
        .split(RULE_DELIMITER)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let fields: Vec<&str> = entry.split(FIELD_DELIMITER).map(str::trim).collect();
            match fields.as_slice() {
                [name, namespace, image]
                    if !name.is_empty() && !namespace.is_empty() && !image.is_empty() =>
                {
                    Ok(Rule::new(name, namespace, image))
                }
                _ => Err(ClonerError::Config(format!(
                    "malformed rule '{}', expected secretName{}sourceNamespace{}imageMatch",
                    entry, FIELD_DELIMITER, FIELD_DELIMITER
                ))),
            }
        })
        .collect()
}

fn load_rules_file(path: &str) -> Result<Vec<Rule>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ClonerError::Config(format!("Failed to read rules file {}: {}", path, e)))?;
    let rules: Vec<Rule> = serde_yaml::from_str(&contents)
        .map_err(|e| ClonerError::Config(format!("Failed to parse rules file {}: {}", path, e)))?;

    if let Some(rule) = rules.iter().find(|r| {
        r.secret_name.is_empty() || r.source_namespace.is_empty() || r.image_match.is_empty()
    }) {
        return Err(ClonerError::Config(format!(
            "rules file {} contains a rule with an empty field: {:?}",
            path, rule
        )));
    }

    Ok(rules)
}
