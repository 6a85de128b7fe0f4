//! Snapshot Store
//!
//! The graph itself is a plain value: every transition returns a new
//! [`Snapshot`](crate::graph::Snapshot). Applications that want a single
//! "current" graph shared between threads can put it in a [`Store`].
//!
//! # Concepts
//!
//! ## Actions
//!
//! An [`Action`] is one of the three graph intents (add, delete, recompute)
//! as a value. `Snapshot::apply` turns an action into the next snapshot.
//!
//! ## Store
//!
//! A [`Store`] holds the current snapshot, applies dispatched actions one
//! at a time, and publishes each result atomically. Readers get an `Arc`
//! to whatever was current when they asked.
//!
//! ## Subscribers
//!
//! Listeners registered with [`Store::subscribe`] run after every
//! successful dispatch with the snapshot that was just published.

mod action;
mod runtime;
mod subscriber;

pub use action::Action;
pub use runtime::Store;
pub use subscriber::{Listener, SubscriberId};
