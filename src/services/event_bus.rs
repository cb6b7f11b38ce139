use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, instrument};

use crate::models::{StoreEvent, StoreEventKind};

/// Callback invoked for every delivered event
pub type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Subscription {
    id: SubscriptionId,
    kind: Option<StoreEventKind>,
    listener: Listener,
}

/// In-process publish/subscribe channel for store notifications.
///
/// Delivery is synchronous and in subscription order. Listeners run after
/// the registry lock is released, so a listener may subscribe, unsubscribe
/// or call back into the store. A panicking listener is logged and skipped;
/// the remaining listeners still receive the event.
pub struct EventBus {
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Receive every event
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener))
    }

    /// Receive only events of one kind
    pub fn subscribe_to<F>(&self, kind: StoreEventKind, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(listener))
    }

    /// Returns false when the id was not (or no longer) registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() != before;
        debug!(subscription = %id, removed, "Unsubscribe");
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver an event to every matching listener, returning how many ran to completion
    #[instrument(skip(self, event), fields(event_type = %event.kind()))]
    pub fn publish(&self, event: &StoreEvent) -> usize {
        let kind = event.kind();
        let listeners: Vec<(SubscriptionId, Listener)> = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.kind.map_or(true, |k| k == kind))
            .map(|s| (s.id, Arc::clone(&s.listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in listeners {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => delivered += 1,
                Err(_) => error!(subscription = %id, "Event listener panicked"),
            }
        }

        debug!(delivered, "Event published");
        delivered
    }

    fn register(&self, kind: Option<StoreEventKind>, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription { id, kind, listener });
        debug!(subscription = %id, kind = ?kind, "Subscribe");
        id
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
