//! Notification publishing/subscription abstraction (mechanics only).
//!
//! The bus distributes facts ("command applied", "command reverted") to
//! external listeners. It is consumed by processors, never owned by them:
//! several processors may share one bus.
//!
//! - **Best-effort fan-out**: a failing publish never undoes the operation
//!   that produced the notification.
//! - **Ordered per publisher**: listeners see notifications in publish order.
//! - **No persistence**: the bus is for distribution only.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

/// Callback invoked for every published message.
pub type Listener<M> = Arc<dyn Fn(&M) + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Publish failed due to internal lock poisoning.
    #[error("notification bus lock poisoned")]
    Poisoned,
}

/// A channel subscription to a bus.
///
/// Each subscription gets a copy of every message published after it was
/// created. Designed for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently queued without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Handle returned by [`NotificationBus::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`SubscriptionHandle::unsubscribe`] to remove it.
pub struct SubscriptionHandle {
    id: u64,
    detach: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl SubscriptionHandle {
    pub fn new(id: u64, detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            detach: Mutex::new(Some(Box::new(detach))),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener from the bus. Later publishes no longer reach it.
    pub fn unsubscribe(self) {
        let detach = self
            .detach
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(detach) = detach {
            detach();
        }
    }
}

impl core::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubscriptionHandle").field("id", &self.id).finish()
    }
}

/// Pub/sub abstraction for command notifications.
///
/// The trait is object safe so processors can hold an
/// `Arc<dyn NotificationBus<Notification>>`.
pub trait NotificationBus<M>: Send + Sync {
    fn publish(&self, message: M) -> Result<(), BusError>;

    /// Register a callback listener.
    fn subscribe(&self, listener: Listener<M>) -> SubscriptionHandle;

    /// Register a channel-backed subscriber.
    fn subscribe_channel(&self) -> Subscription<M>;
}

impl<M, B> NotificationBus<M> for Arc<B>
where
    B: NotificationBus<M> + ?Sized,
{
    fn publish(&self, message: M) -> Result<(), BusError> {
        (**self).publish(message)
    }

    fn subscribe(&self, listener: Listener<M>) -> SubscriptionHandle {
        (**self).subscribe(listener)
    }

    fn subscribe_channel(&self) -> Subscription<M> {
        (**self).subscribe_channel()
    }
}
