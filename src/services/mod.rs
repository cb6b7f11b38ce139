// Services module - store logic and notification plumbing

pub mod cart_store;
pub mod event_bus;
pub mod notifier;

pub use cart_store::{AddOutcome, CartStore, DEFAULT_CART_KEY, DEFAULT_FAVORITES_KEY};
pub use event_bus::{EventBus, Listener, SubscriptionId};
pub use notifier::{Notifier, TracingNotifier};
