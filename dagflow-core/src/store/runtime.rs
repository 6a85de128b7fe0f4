//! Store Runtime
//!
//! The store owns the "current" snapshot for an application and is the one
//! place where writes are serialized.
//!
//! # How It Works
//!
//! 1. Readers call [`Store::snapshot`] and get an `Arc` to the current
//!    snapshot. They can keep it as long as they like; later dispatches
//!    never change it.
//!
//! 2. A dispatch takes the writer lock, so only one thread at a time
//!    computes the next snapshot while readers carry on.
//!
//! 3. On success the writer swaps in the new snapshot under a short write
//!    lock and queues it for notification. On failure nothing is published
//!    and no listener runs.
//!
//! 4. The outermost dispatch drains the queue, running listeners in
//!    subscription order for each published snapshot in turn.
//!
//! # Listeners
//!
//! Listeners run with the snapshot lock released and may read the store or
//! dispatch to it. The writer lock is reentrant, so a dispatch from inside
//! a listener publishes immediately and returns; its own notification is
//! queued behind the one in progress. Every listener therefore sees
//! snapshots in publication order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use super::action::Action;
use super::subscriber::{Listener, Subscriber, SubscriberId};
use crate::graph::{GraphResult, Snapshot};

/// Owner of the current snapshot.
pub struct Store<V> {
    /// The most recently published snapshot.
    current: RwLock<Arc<Snapshot<V>>>,

    /// Registered listeners, in subscription order.
    subscribers: Mutex<Vec<Subscriber<V>>>,

    /// Serializes writers; reentrant so listeners can dispatch.
    writer: ReentrantMutex<RefCell<Publications<V>>>,
}

/// Published snapshots whose listeners have not run yet.
struct Publications<V> {
    pending: VecDeque<Arc<Snapshot<V>>>,
    draining: bool,
}

/// Clears the draining flag even if a listener panics.
struct Draining<'a, V> {
    publications: &'a RefCell<Publications<V>>,
}

impl<V> Drop for Draining<'_, V> {
    fn drop(&mut self) {
        let mut publications = self.publications.borrow_mut();
        publications.draining = false;
        publications.pending.clear();
    }
}

impl<V> Store<V> {
    /// Create a store whose current snapshot is `snapshot`.
    pub fn new(snapshot: Snapshot<V>) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            subscribers: Mutex::new(Vec::new()),
            writer: ReentrantMutex::new(RefCell::new(Publications {
                pending: VecDeque::new(),
                draining: false,
            })),
        }
    }

    /// A handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot<V>> {
        Arc::clone(&self.current.read())
    }

    /// Register a listener to run after every successful dispatch.
    pub fn subscribe<F>(&self, listener: F) -> SubscriberId
    where
        F: Fn(&Arc<Snapshot<V>>) + Send + Sync + 'static,
    {
        let subscriber = Subscriber::new(listener);
        let id = subscriber.id();
        self.subscribers.lock().push(subscriber);
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|s| s.id() != id);
        subscribers.len() != before
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn notify(&self, snapshot: &Arc<Snapshot<V>>) {
        // Copy the callbacks out so a listener can (un)subscribe.
        let listeners: Vec<Listener<V>> = self
            .subscribers
            .lock()
            .iter()
            .map(Subscriber::listener)
            .collect();

        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl<V: Clone> Store<V> {
    /// Apply an action to the current snapshot and publish the result.
    ///
    /// Returns the newly published snapshot. On error the current snapshot
    /// is left as it was. When called from a listener, the returned
    /// snapshot's listeners run after the current round of notification.
    pub fn dispatch(&self, action: Action<V>) -> GraphResult<Arc<Snapshot<V>>> {
        let _span =
            tracing::debug_span!("dispatch", action = action.name(), node = %action.id())
                .entered();

        let writer = self.writer.lock();
        let next = Arc::new(self.snapshot().apply(action)?);
        *self.current.write() = Arc::clone(&next);
        tracing::debug!(nodes = next.len(), "snapshot published");

        {
            let mut publications = writer.borrow_mut();
            publications.pending.push_back(Arc::clone(&next));
            if publications.draining {
                return Ok(next);
            }
            publications.draining = true;
        }

        let _draining = Draining {
            publications: &writer,
        };
        loop {
            let pending = writer.borrow_mut().pending.pop_front();
            let Some(snapshot) = pending else {
                break;
            };
            self.notify(&snapshot);
        }
        Ok(next)
    }
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self::new(Snapshot::new())
    }
}

impl<V> fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("nodes", &self.current.read().len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
