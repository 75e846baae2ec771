// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster-wide pod watch stream.

use futures::Stream;
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client};
use kube_runtime::{watcher, WatchStreamExt};

/// Watch all pods in all namespaces.
///
/// There is no periodic resync; the initial list and subsequent add/update
/// notifications come through the same stream. Reconnects after stream errors
/// are handled by the watcher's default backoff.
pub fn watch_pods(
    client: Client,
) -> impl Stream<Item = watcher::Result<watcher::Event<Pod>>> + Send {
    let pods: Api<Pod> = Api::all(client);
    watcher(pods, watcher::Config::default()).default_backoff()
}

/// The pod carried by an add/update notification. Deletes and list markers
/// yield nothing.
pub fn applied_pod(event: watcher::Event<Pod>) -> Option<Pod> {
    match event {
        watcher::Event::Apply(pod) | watcher::Event::InitApply(pod) => Some(pod),
        watcher::Event::Delete(_) | watcher::Event::Init | watcher::Event::InitDone => None,
    }
}
