// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::queue::ExponentialBackoff;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::sleep;
use tracing::debug;

/// FIFO queue that coalesces duplicate items and serializes work per item.
///
/// Consumers follow the protocol `get` → `forget` | `add_rate_limited` →
/// `done`. While an item is being processed, `add` of the same item is a no-op,
/// so two workers never hold the same item at once. A delayed retry that fires
/// before `done` is parked and queued once `done` is called.
pub struct WorkQueue<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    notify: Notify,
    backoff: ExponentialBackoff<T>,
}

struct State<T> {
    queue: VecDeque<T>,
    /// Mirror of `queue` for O(1) dedup
    queued: HashSet<T>,
    processing: HashSet<T>,
    /// Retries that came due while the item was still processing
    retry_on_done: HashSet<T>,
    shutting_down: bool,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> WorkQueue<T>
where
    T: Clone + Eq + Hash + Send + 'static,
{
    pub fn new(backoff: ExponentialBackoff<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    queue: VecDeque::new(),
                    queued: HashSet::new(),
                    processing: HashSet::new(),
                    retry_on_done: HashSet::new(),
                    shutting_down: false,
                }),
                notify: Notify::new(),
                backoff,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State<T>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue `item` unless it is already queued or being processed. Never blocks.
    pub fn add(&self, item: T) {
        let mut state = self.state();
        if state.shutting_down
            || state.queued.contains(&item)
            || state.processing.contains(&item)
        {
            return;
        }

        state.push(item);
        drop(state);
        self.shared.notify.notify_one();
    }

    /// Queue `item` once `delay` has elapsed. If the item is still being
    /// processed at that point it is queued when `done` is called.
    pub fn add_after(&self, item: T, delay: Duration) {
        if delay.is_zero() {
            self.retry(item);
            return;
        }
        if self.is_shutting_down() {
            return;
        }

        let queue = self.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            queue.retry(item);
        });
    }

    fn retry(&self, item: T) {
        let mut state = self.state();
        if state.shutting_down || state.queued.contains(&item) {
            return;
        }
        if state.processing.contains(&item) {
            state.retry_on_done.insert(item);
            return;
        }

        state.push(item);
        drop(state);
        self.shared.notify.notify_one();
    }

    /// Queue `item` again after its per-item backoff delay
    pub fn add_rate_limited(&self, item: T) {
        let delay = self.shared.backoff.when(&item);
        debug!(delay_ms = delay.as_millis() as u64, "Requeueing with backoff");
        self.add_after(item, delay);
    }

    /// Reset the backoff of `item` after it was processed successfully
    pub fn forget(&self, item: &T) {
        self.shared.backoff.forget(item);
    }

    /// How many times `item` has been requeued with backoff since it was last forgotten
    pub fn num_requeues(&self, item: &T) -> u32 {
        self.shared.backoff.num_requeues(item)
    }

    /// Wait for the next item. Returns `None` once the queue is shut down.
    pub async fn get(&self) -> Option<T> {
        loop {
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state();
                if state.shutting_down {
                    return None;
                }
                if let Some(item) = state.queue.pop_front() {
                    state.queued.remove(&item);
                    state.processing.insert(item.clone());
                    return Some(item);
                }
            }

            notified.await;
        }
    }

    /// Mark `item` as no longer being processed
    pub fn done(&self, item: &T) {
        let mut state = self.state();
        state.processing.remove(item);

        if state.retry_on_done.remove(item)
            && !state.shutting_down
            && !state.queued.contains(item)
        {
            state.push(item.clone());
            drop(state);
            self.shared.notify.notify_one();
        }
    }

    /// Stop accepting items and wake every waiting `get`
    pub fn shut_down(&self) {
        self.state().shutting_down = true;
        self.shared.notify.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.state().shutting_down
    }

    /// Number of items waiting to be handed out
    pub fn len(&self) -> usize {
        self.state().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Eq + Hash> State<T> {
    fn push(&mut self, item: T) {
        self.queued.insert(item.clone());
        self.queue.push_back(item);
    }
}
