//! Decoupled event bus between background work and the UI loop.
//!
//! The spawned rewrite task emits via [`EventBus::emit`]; the UI loop
//! drains its subscription between frames. Built on
//! [`tokio::sync::broadcast`] so extra listeners can observe independently.

use tokio::sync::broadcast;

use crate::engine::RewriteError;

/// Events that flow through the system.
#[derive(Debug, Clone)]
pub enum Event {
    /// A dispatched rewrite resolved.
    RewriteFinished {
        outcome: Result<String, RewriteError>,
    },
}

/// A broadcast channel that any component can emit to or subscribe from.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    /// Returns the number of receivers that will see it.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events. Returns a receiver that yields all
    /// future events (does not replay past ones).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}
