//! Overrun/underrun notifications.
//!
//! Observers are reference-counted closures. Two registrations are the same
//! observer only if they share the same allocation, so cloning an `Arc` and
//! registering it twice is a no-op while two identical closures are distinct.

use std::sync::Arc;

/// Raised when a read asks for more samples than are queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderrunEvent {
    pub channel: usize,
    /// Samples the reader asked for
    pub requested: usize,
    /// Samples that were actually queued when the read started
    pub latency_samples: usize,
}

/// Raised when a write is rejected because it would overwrite unread data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrunEvent {
    pub channel: usize,
    /// Length of the dropped block
    pub excess_samples: usize,
}

pub type UnderrunObserver = Arc<dyn Fn(&UnderrunEvent) + Send + Sync>;
pub type OverrunObserver = Arc<dyn Fn(&OverrunEvent) + Send + Sync>;

/// Identity-keyed set of observers for one event type
pub struct ObserverSet<E> {
    observers: Vec<Arc<dyn Fn(&E) + Send + Sync>>,
}

impl<E> ObserverSet<E> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register an observer. Returns false if it was already registered.
    pub fn insert(&mut self, observer: &Arc<dyn Fn(&E) + Send + Sync>) -> bool {
        if self.contains(observer) {
            return false;
        }
        self.observers.push(Arc::clone(observer));
        true
    }

    /// Unregister an observer. Returns false if it was not registered.
    pub fn remove(&mut self, observer: &Arc<dyn Fn(&E) + Send + Sync>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !Arc::ptr_eq(o, observer));
        self.observers.len() != before
    }

    pub fn contains(&self, observer: &Arc<dyn Fn(&E) + Send + Sync>) -> bool {
        self.observers.iter().any(|o| Arc::ptr_eq(o, observer))
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Call every observer once, in registration order
    pub fn notify(&self, event: &E) {
        for observer in &self.observers {
            observer(event);
        }
    }
}

impl<E> Default for ObserverSet<E> {
    fn default() -> Self {
        Self::new()
    }
}
