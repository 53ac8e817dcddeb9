// ── Change subscriptions ──
//
// Callback registry notified after each committed refresh cycle. Handles
// are RAII: dropping a `Subscription` unregisters its callback.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::error;

use crate::state::CoordinatorState;

type Listener = Arc<dyn Fn(&CoordinatorState) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    listeners: DashMap<u64, Listener>,
}

impl Subscribers {
    pub(crate) fn insert(self: &Arc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, listener);
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Invoke every listener with `state`.
    ///
    /// Listeners are collected first so no map shard is locked while a
    /// callback runs; a callback may therefore drop its own subscription.
    /// A panicking listener is logged and skipped.
    pub(crate) fn notify(&self, state: &CoordinatorState) {
        let listeners: Vec<(u64, Listener)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        for (id, listener) in listeners {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(state))) {
                error!(
                    subscription = id,
                    panic = panic_message(payload.as_ref()),
                    "subscriber panicked"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Handle returned by [`Coordinator::subscribe`](crate::Coordinator::subscribe).
#[must_use = "dropping a Subscription unregisters its callback"]
pub struct Subscription {
    id: u64,
    registry: Weak<Subscribers>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Unregister the callback now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.listeners.remove(&self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn dropped_subscription_stops_notifications() {
        let registry = Arc::new(Subscribers::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let subscription = registry.insert(Arc::new(move |_: &CoordinatorState| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        registry.notify(&CoordinatorState::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        subscription.unsubscribe();
        assert_eq!(registry.len(), 0);

        registry.notify(&CoordinatorState::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_listener_does_not_stop_the_others() {
        let registry = Arc::new(Subscribers::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let _broken = registry.insert(Arc::new(|_: &CoordinatorState| {
            panic!("listener failed");
        }));
        let counter = Arc::clone(&calls);
        let _counting = registry.insert(Arc::new(move |_: &CoordinatorState| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        registry.notify(&CoordinatorState::default());
        registry.notify(&CoordinatorState::default());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn handle_outliving_registry_is_harmless() {
        let registry = Arc::new(Subscribers::default());
        let subscription = registry.insert(Arc::new(|_: &CoordinatorState| {}));
        drop(registry);
        drop(subscription);
    }
}
