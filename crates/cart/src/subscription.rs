//! Observer list for cart snapshots.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::snapshot::CartSnapshot;

/// Callback invoked with every newly published snapshot.
pub type SubscriberFn = dyn Fn(&CartSnapshot) + Send + Sync;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered subscribers, notified in registration order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Arc<SubscriberFn>)>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self, callback: Arc<SubscriberFn>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Call every subscriber with `snapshot`.
    ///
    /// The list is copied first so callbacks may subscribe or unsubscribe.
    pub(crate) fn notify(&self, snapshot: &CartSnapshot) {
        let callbacks: Vec<Arc<SubscriberFn>> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(snapshot);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_notify_in_registration_order() {
        let subscribers = Subscribers::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = Arc::clone(&order);
            subscribers.subscribe(Arc::new(move |_: &CartSnapshot| {
                order.lock().unwrap_or_else(PoisonError::into_inner).push(n);
            }));
        }

        subscribers.notify(&CartSnapshot::default());
        let seen = order.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let subscribers = Subscribers::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = subscribers.subscribe(Arc::new(move |_: &CartSnapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        subscribers.notify(&CartSnapshot::default());
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.notify(&CartSnapshot::default());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(subscribers.len(), 0);
    }
}
