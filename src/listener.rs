//! Listener registry for decoded notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::protocol::Message;

/// Something a listener is told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A decoded notification. Delivered once per incoming frame.
    Message(Message),
    /// The transport reported that the train disconnected.
    Disconnected,
}

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Ordered set of callbacks.
///
/// Callbacks run synchronously on the notification path, so they must not
/// block. They may subscribe or unsubscribe from inside a callback; the
/// change takes effect from the next event.
#[derive(Default)]
pub struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Callback)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Callbacks are invoked in registration order.
    pub fn subscribe(&self, f: impl Fn(&Event) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, Arc::new(f)));
        id
    }

    /// Remove a callback. Returns false if `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Deliver `event` to every registered callback.
    pub fn emit(&self, event: &Event) {
        // Snapshot so callbacks can touch the registry without deadlocking.
        let snapshot: Vec<Callback> = self.entries.lock().iter().map(|(_, f)| f.clone()).collect();
        for f in snapshot {
            f(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order() {
        let listeners = Listeners::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let seen = seen.clone();
            listeners.subscribe(move |_| seen.lock().push(n));
        }
        listeners.emit(&Event::Disconnected);
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let listeners = Listeners::new();
        let count = Arc::new(AtomicU64::new(0));
        let c = count.clone();
        let id = listeners.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        listeners.emit(&Event::Disconnected);
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&Event::Disconnected);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let listeners = Arc::new(Listeners::new());
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));
        let (l, s) = (listeners.clone(), slot.clone());
        let id = listeners.subscribe(move |_| {
            if let Some(id) = *s.lock() {
                l.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);
        listeners.emit(&Event::Disconnected);
        assert_eq!(listeners.len(), 0);
    }
}
