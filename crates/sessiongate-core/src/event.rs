// ABOUTME: Session event records and the event pool that stores and broadcasts them.
// ABOUTME: The pool is its own lock domain, independent of the session state lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};

/// A timestamped record of something that happened in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tag: String,
    pub time: DateTime<Utc>,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(tag: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            tag: tag.into(),
            time: Utc::now(),
            data,
        }
    }
}

/// Append-only event history plus a broadcast channel for live subscribers.
pub struct EventPool {
    events: RwLock<Vec<Event>>,
    tx: broadcast::Sender<Event>,
}

impl EventPool {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            events: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Record a new event and publish it to subscribers.
    pub async fn add(&self, tag: impl Into<String>, data: serde_json::Value) {
        self.push(Event::new(tag, data)).await;
    }

    /// Record an already-built event and publish it to subscribers.
    pub async fn push(&self, event: Event) {
        self.events.write().await.push(event.clone());
        // No active subscribers is fine
        let _ = self.tx.send(event);
    }

    /// A copy of the history, ordered by occurrence. Events sharing a
    /// timestamp keep their insertion order.
    pub async fn sorted(&self) -> Vec<Event> {
        let mut events = self.events.read().await.clone();
        events.sort_by_key(|e| e.time);
        events
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Subscribe to events added from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventPool {
    fn default() -> Self {
        Self::new()
    }
}
