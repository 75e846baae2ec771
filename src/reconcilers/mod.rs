// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod-driven reconciliation: matching, queue workers and the controller loop.

pub mod controller;
pub mod matcher;
pub mod worker;

pub use controller::Controller;
pub use matcher::Matcher;
pub use worker::{process_item, run_worker, spawn_workers};
