//! Command lifecycle notifications and their fan-out bus.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{BusError, Listener, NotificationBus, Subscription, SubscriptionHandle};
pub use event::Event;
pub use in_memory_bus::InMemoryNotificationBus;
pub use notification::{Notification, NotificationKind};
