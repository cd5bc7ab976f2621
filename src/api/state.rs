//! Application state for the shipping engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, RwLock};

use crate::config::ShippingSnapshot;

/// Shared application state.
///
/// Holds the current configuration snapshot. Handlers take a cheap `Arc`
/// clone of the snapshot and evaluate against it lock-free; the
/// configuration collaborator swaps in a fresh snapshot on refresh, marking
/// the previous one stale so in-flight consumers holding it fail closed.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<RwLock<Arc<ShippingSnapshot>>>,
}

impl AppState {
    /// Creates a new application state with the given snapshot.
    pub fn new(snapshot: ShippingSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Returns the current configuration snapshot.
    pub fn snapshot(&self) -> Arc<ShippingSnapshot> {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .clone()
    }

    /// Replaces the current snapshot with a fresh one.
    ///
    /// The outgoing snapshot is invalidated first, so any computation that
    /// started against it fails with a stale-snapshot error instead of
    /// pricing from superseded configuration.
    pub fn replace_snapshot(&self, next: ShippingSnapshot) {
        let mut guard = self.snapshot.write().expect("snapshot lock poisoned");
        guard.invalidate();
        *guard = Arc::new(next);
    }
}
