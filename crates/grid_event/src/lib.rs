//! # grid_event - Observer Event System
//!
//! Event delivery for inventory engines and their observers:
//! - Synchronous dispatch (an event is delivered before `emit` returns)
//! - Priority-based handler ordering
//! - Drainable channels for observers that poll instead of registering callbacks

use crossbeam_channel::{Receiver, Sender};

/// Handler priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

/// Trait for events
pub trait Event: 'static {}

// Blanket implementation
impl<T: 'static> Event for T {}

/// Event handler function type
pub type EventHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Event bus dispatching one event type to its subscribers.
///
/// Handlers run in priority order (higher first); handlers of equal priority
/// run in subscription order.
pub struct EventBus<E: Event> {
    /// Registered handlers, kept sorted by priority
    handlers: Vec<(SubscriberId, Priority, EventHandler<E>)>,
    /// Next subscriber ID
    next_subscriber_id: u64,
    /// Number of events emitted so far
    emitted: u64,
}

impl<E: Event> EventBus<E> {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_subscriber_id: 1,
            emitted: 0,
        }
    }

    /// Subscribe a handler
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority(handler, Priority::Normal)
    }

    /// Subscribe with priority
    pub fn subscribe_with_priority<F>(&mut self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        self.handlers.push((id, priority, Box::new(handler)));

        // Stable sort keeps subscription order within a priority
        self.handlers.sort_by(|a, b| b.1.cmp(&a.1));

        id
    }

    /// Unsubscribe. Returns false if the ID was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub_id, _, _)| *sub_id != id);
        self.handlers.len() != before
    }

    /// Deliver an event to every subscriber
    pub fn emit(&mut self, event: &E) {
        log::trace!(
            "dispatching event #{} to {} subscriber(s)",
            self.emitted,
            self.handlers.len()
        );

        for (_, _, handler) in &self.handlers {
            handler(event);
        }

        self.emitted += 1;
    }

    /// Get subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Get the number of events emitted so far
    pub fn emitted_count(&self) -> u64 {
        self.emitted
    }
}

impl<E: Event + Clone + Send> EventBus<E> {
    /// Subscribe a channel that receives a copy of every event.
    ///
    /// The returned channel can be drained at the observer's own pace.
    pub fn subscribe_channel(&mut self, priority: Priority) -> (SubscriberId, EventChannel<E>) {
        let channel = EventChannel::new();
        let sender = channel.sender();

        let id = self.subscribe_with_priority(
            move |event: &E| {
                // Receiver dropped means nobody is listening anymore
                let _ = sender.send(event.clone());
            },
            priority,
        );

        (id, channel)
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

/// Channel for single-type events
pub struct EventChannel<E> {
    sender: Sender<E>,
    receiver: Receiver<E>,
}

impl<E> EventChannel<E> {
    /// Create a new channel
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Get a sending half for this channel
    pub fn sender(&self) -> Sender<E> {
        self.sender.clone()
    }

    /// Send an event
    pub fn send(&self, event: E) {
        // Cannot fail: the channel owns its own receiver
        let _ = self.sender.send(event);
    }

    /// Receive an event
    pub fn receive(&self) -> Option<E> {
        self.receiver.try_recv().ok()
    }

    /// Drain all events
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get pending count
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventBus, EventChannel, EventHandler, Priority, SubscriberId};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct TestEvent(i32);

    #[test]
    fn test_event_bus() {
        let mut bus = EventBus::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        bus.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&TestEvent(42));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.emitted_count(), 1);
    }

    #[test]
    fn test_event_channel() {
        let channel: EventChannel<TestEvent> = EventChannel::new();

        channel.send(TestEvent(1));
        channel.send(TestEvent(2));
        channel.send(TestEvent(3));

        assert_eq!(channel.len(), 3);

        let events = channel.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].0, 1);
        assert_eq!(events[1].0, 2);
        assert_eq!(events[2].0, 3);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_priority() {
        let mut bus = EventBus::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let order1 = order.clone();
        let order2 = order.clone();
        let order3 = order.clone();

        bus.subscribe_with_priority(
            move |e: &TestEvent| {
                order1.lock().push(("low", e.0));
            },
            Priority::Low,
        );

        bus.subscribe_with_priority(
            move |e: &TestEvent| {
                order2.lock().push(("high", e.0));
            },
            Priority::High,
        );

        bus.subscribe(move |e: &TestEvent| {
            order3.lock().push(("normal", e.0));
        });

        bus.emit(&TestEvent(42));

        let received = order.lock();
        assert_eq!(received[0].0, "high");
        assert_eq!(received[1].0, "normal");
        assert_eq!(received[2].0, "low");
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = bus.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));

        bus.emit(&TestEvent(1));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_channel_subscriber() {
        let mut bus = EventBus::new();
        let (_, channel) = bus.subscribe_channel(Priority::Normal);

        bus.emit(&TestEvent(7));
        bus.emit(&TestEvent(8));

        assert_eq!(channel.receive(), Some(TestEvent(7)));
        assert_eq!(channel.drain(), vec![TestEvent(8)]);
        assert_eq!(channel.receive(), None);
    }
}
