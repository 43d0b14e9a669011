//! In-memory notification bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use crate::bus::{BusError, Listener, NotificationBus, Subscription, SubscriptionHandle};

struct Subscribers<M> {
    listeners: Vec<(u64, Listener<M>)>,
    channels: Vec<mpsc::Sender<M>>,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Listeners run synchronously on the publishing thread, in subscription order
/// - Channel subscribers whose receiver was dropped are pruned on publish
pub struct InMemoryNotificationBus<M> {
    subscribers: Arc<Mutex<Subscribers<M>>>,
    next_id: AtomicU64,
}

impl<M> InMemoryNotificationBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered callback listeners.
    pub fn listener_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|subs| subs.listeners.len())
            .unwrap_or(0)
    }
}

impl<M> Default for InMemoryNotificationBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Subscribers {
                listeners: Vec::new(),
                channels: Vec::new(),
            })),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<M> core::fmt::Debug for InMemoryNotificationBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryNotificationBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<M> NotificationBus<M> for InMemoryNotificationBus<M>
where
    M: Clone + Send + 'static,
{
    fn publish(&self, message: M) -> Result<(), BusError> {
        // Snapshot listeners so a listener may (un)subscribe without deadlocking.
        let listeners: Vec<Listener<M>> = {
            let mut subs = self.subscribers.lock().map_err(|_| BusError::Poisoned)?;
            subs.channels.retain(|tx| tx.send(message.clone()).is_ok());
            subs.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        for listener in listeners {
            listener(&message);
        }

        tracing::trace!("notification published");
        Ok(())
    }

    fn subscribe(&self, listener: Listener<M>) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // If the lock is poisoned, we still return a handle;
        // the listener just won't receive messages.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.listeners.push((id, listener));
        }

        let weak = Arc::downgrade(&self.subscribers);
        SubscriptionHandle::new(id, move || {
            if let Some(subscribers) = weak.upgrade() {
                if let Ok(mut subs) = subscribers.lock() {
                    subs.listeners.retain(|(lid, _)| *lid != id);
                }
            }
        })
    }

    fn subscribe_channel(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.channels.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn listeners_receive_published_messages_in_order() {
        let bus = InMemoryNotificationBus::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _handle = bus.subscribe(Arc::new(move |m: &u32| sink.lock().unwrap().push(*m)));

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = InMemoryNotificationBus::<&'static str>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handle = bus.subscribe(Arc::new(move |_: &&str| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        bus.publish("hello").unwrap();
        handle.unsubscribe();
        bus.publish("again").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_only_removes_its_own_listener() {
        let bus = InMemoryNotificationBus::<u8>::new();
        let first = bus.subscribe(Arc::new(|_: &u8| {}));
        let second = bus.subscribe(Arc::new(|_: &u8| {}));
        assert_ne!(first.id(), second.id());

        first.unsubscribe();
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn channel_subscribers_get_a_copy_and_dead_ones_are_pruned() {
        let bus = InMemoryNotificationBus::<u8>::new();
        let live = bus.subscribe_channel();
        let dead = bus.subscribe_channel();
        drop(dead);

        bus.publish(7).unwrap();
        bus.publish(8).unwrap();

        assert_eq!(live.drain(), vec![7, 8]);
        assert!(live.try_recv().is_err());
    }

    #[test]
    fn unsubscribe_after_bus_dropped_is_harmless() {
        let bus = InMemoryNotificationBus::<u8>::new();
        let handle = bus.subscribe(Arc::new(|_: &u8| {}));
        drop(bus);
        handle.unsubscribe();
    }
}
