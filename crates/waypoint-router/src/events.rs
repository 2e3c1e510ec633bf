//! Per-route event channel.
//!
//! Every resolution through the router creates one [`EventEmitter`] and
//! stores it in the route's configuration. Clones of that route share the
//! emitter, so a screen and its navigation chrome can signal each other
//! (focus, blur, custom events) without going through navigation state.
//! A fresh resolution of the same route name gets a new emitter.

use std::sync::Arc;

use tokio::sync::broadcast;

/// Default buffer size of a route's event channel.
///
/// A subscriber that falls behind by more than this many events receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest event.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Event name emitted when a route becomes the active route.
pub const FOCUS_EVENT: &str = "focus";

/// Event name emitted when a route stops being the active route.
pub const BLUR_EVENT: &str = "blur";

/// A single event delivered to a route's subscribers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteEvent {
    /// Event name, e.g. [`FOCUS_EVENT`].
    pub name: String,
    /// Arbitrary event payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RouteEvent {
    /// Create an event with a `null` payload.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: serde_json::Value::Null,
        }
    }

    /// Create an event carrying a payload.
    pub fn with_payload(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Shared handle to one route's event channel.
///
/// Cloning the handle shares the channel; use [`same_channel`] to check
/// whether two handles belong to the same resolved route.
///
/// [`same_channel`]: EventEmitter::same_channel
#[derive(Clone)]
pub struct EventEmitter {
    tx: Arc<broadcast::Sender<RouteEvent>>,
}

impl EventEmitter {
    /// Create an emitter with [`DEFAULT_EVENT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create an emitter with a custom channel capacity (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received it; 0 when nobody
    /// is listening, which is not an error.
    pub fn emit(&self, event: RouteEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Whether both handles refer to the same channel.
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tx, &other.tx)
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers_is_not_an_error() {
        let emitter = EventEmitter::new();
        assert_eq!(emitter.emit(RouteEvent::named(FOCUS_EVENT)), 0);
    }

    #[test]
    fn clones_share_the_channel() {
        let emitter = EventEmitter::new();
        let shared = emitter.clone();
        let mut rx = emitter.subscribe();

        assert!(emitter.same_channel(&shared));
        assert_eq!(shared.emit(RouteEvent::named(BLUR_EVENT)), 1);
        assert_eq!(rx.try_recv().unwrap(), RouteEvent::named(BLUR_EVENT));
    }

    #[test]
    fn separate_emitters_are_isolated() {
        let a = EventEmitter::new();
        let b = EventEmitter::new();
        let mut rx = a.subscribe();

        assert!(!a.same_channel(&b));
        b.emit(RouteEvent::with_payload("refresh", serde_json::json!({"force": true})));
        assert!(rx.try_recv().is_err());
        assert_eq!(a.subscriber_count(), 1);
    }
}
