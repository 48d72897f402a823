//! Injected keyboard event source.
//!
//! Consumers subscribe once, drain their queue whenever they want to observe
//! input, and unsubscribe on teardown. After unsubscribing, events pushed to
//! the source are no longer queued for that consumer.

use std::collections::{BTreeMap, VecDeque};

/// A keyboard event carrying the host's key identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Anything that can deliver keyboard events to subscribers.
pub trait InputSource {
    fn subscribe(&mut self) -> SubscriptionId;

    /// Returns `false` if the id was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Take every event queued for `id` since the last drain, oldest first.
    fn drain(&mut self, id: SubscriptionId) -> Vec<InputEvent>;
}

/// Broadcast queue: every pushed event is copied to each live subscriber.
#[derive(Debug, Default)]
pub struct InputQueue {
    queues: BTreeMap<SubscriptionId, VecDeque<InputEvent>>,
    next_id: u64,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        if self.queues.is_empty() {
            tracing::trace!(?event, "input event dropped, no subscribers");
            return;
        }
        for queue in self.queues.values_mut() {
            queue.push_back(event.clone());
        }
    }

    pub fn key_down(&mut self, key: impl Into<String>) {
        self.push(InputEvent::KeyDown(key.into()));
    }

    pub fn key_up(&mut self, key: impl Into<String>) {
        self.push(InputEvent::KeyUp(key.into()));
    }

    pub fn subscriber_count(&self) -> usize {
        self.queues.len()
    }

    pub fn pending(&self, id: SubscriptionId) -> usize {
        self.queues.get(&id).map_or(0, VecDeque::len)
    }
}

impl InputSource for InputQueue {
    fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.queues.insert(id, VecDeque::new());
        tracing::debug!(?id, "input subscriber attached");
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.queues.remove(&id).is_some();
        if removed {
            tracing::debug!(?id, "input subscriber detached");
        }
        removed
    }

    fn drain(&mut self, id: SubscriptionId) -> Vec<InputEvent> {
        self.queues
            .get_mut(&id)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_broadcast_to_every_subscriber() {
        let mut q = InputQueue::new();
        let a = q.subscribe();
        let b = q.subscribe();
        q.key_down("w");
        q.key_up("w");

        let expected = vec![
            InputEvent::KeyDown("w".into()),
            InputEvent::KeyUp("w".into()),
        ];
        assert_eq!(q.drain(a), expected);
        assert_eq!(q.drain(b), expected);
        assert!(q.drain(a).is_empty());
    }

    #[test]
    fn events_before_subscribe_are_not_seen() {
        let mut q = InputQueue::new();
        q.key_down("w");
        let a = q.subscribe();
        assert!(q.drain(a).is_empty());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut q = InputQueue::new();
        let a = q.subscribe();
        assert!(q.unsubscribe(a));
        assert!(!q.unsubscribe(a));
        q.key_down("a");
        assert!(q.drain(a).is_empty());
        assert_eq!(q.subscriber_count(), 0);
    }

    #[test]
    fn subscription_ids_are_not_reused() {
        let mut q = InputQueue::new();
        let a = q.subscribe();
        q.unsubscribe(a);
        let b = q.subscribe();
        assert_ne!(a, b);
        q.key_down("d");
        assert_eq!(q.pending(b), 1);
        assert_eq!(q.pending(a), 0);
    }
}
