//! Subscriber types for the store.
//!
//! A subscriber is a listener that runs after every successful dispatch
//! with the snapshot that was just published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::graph::Snapshot;

/// Unique identifier for a subscription.
///
/// Returned by [`Store::subscribe`](super::Store::subscribe) and used to
/// unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback invoked with each newly published snapshot.
pub type Listener<V> = Arc<dyn Fn(&Arc<Snapshot<V>>) + Send + Sync>;

/// A registered listener.
pub(crate) struct Subscriber<V> {
    id: SubscriberId,
    listener: Listener<V>,
}

impl<V> Subscriber<V> {
    pub(crate) fn new<F>(listener: F) -> Self
    where
        F: Fn(&Arc<Snapshot<V>>) + Send + Sync + 'static,
    {
        Self {
            id: SubscriberId::new(),
            listener: Arc::new(listener),
        }
    }

    pub(crate) fn id(&self) -> SubscriberId {
        self.id
    }

    /// A handle to the callback that can outlive the subscriber list lock.
    pub(crate) fn listener(&self) -> Listener<V> {
        Arc::clone(&self.listener)
    }
}
