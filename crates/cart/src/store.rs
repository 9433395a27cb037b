//! The cart store.
//!
//! # Lifecycle
//!
//! A store starts empty and `Uninitialized`. [`CartStore::hydrate`] reads
//! the persisted cart once and moves it to `Ready`; that transition never
//! reverses. Mutations are rejected until then.
//!
//! # Mutations
//!
//! Each mutation swaps in a new snapshot and notifies subscribers
//! synchronously, then writes the full cart to storage. The write happens
//! after the critical section, so readers see the change before it is
//! durable. Concurrent writes race and the last one to finish wins; each
//! write is a full overwrite, so storage always holds some complete
//! snapshot.
//!
//! Subscriber callbacks run while the mutation lock is held. They may read
//! the store but must not mutate it.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CartStore::new(MemoryStorage::new(), StorageKey::default());
//! store.hydrate().await?;
//!
//! store.add_to_cart(NewCartItem::new("p1", "Widget", "u", Decimal::from(10))).await?;
//! store.increment(&ProductId::new("p1")).await?;
//! assert_eq!(store.snapshot().item_count(), 2);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gomarketplace_core::{CartItem, NewCartItem, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{CartError, Result};
use crate::snapshot::CartSnapshot;
use crate::storage::{KeyValueStore, StorageKey};
use crate::subscription::{SubscriberFn, Subscribers, SubscriptionId};

/// Whether the one-time startup read has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    Uninitialized,
    Ready,
}

/// Shared handle to a cart.
///
/// Cheaply cloneable via `Arc`; every clone sees the same cart. Construct one
/// per cart and hand clones to the views that need it.
pub struct CartStore<S> {
    inner: Arc<CartStoreInner<S>>,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CartStoreInner<S> {
    storage: S,
    key: StorageKey,
    // Held for each in-memory transition, never across an await.
    write_lock: Mutex<()>,
    hydrated: AtomicBool,
    subscribers: Subscribers,
    snapshot_tx: watch::Sender<CartSnapshot>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty, unhydrated store persisting under `key`.
    pub fn new(storage: S, key: StorageKey) -> Self {
        let (snapshot_tx, _) = watch::channel(CartSnapshot::default());

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                key,
                write_lock: Mutex::new(()),
                hydrated: AtomicBool::new(false),
                subscribers: Subscribers::default(),
                snapshot_tx,
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Current hydration state.
    #[must_use]
    pub fn hydration_state(&self) -> HydrationState {
        if self.inner.hydrated.load(Ordering::Acquire) {
            HydrationState::Ready
        } else {
            HydrationState::Uninitialized
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.hydration_state() == HydrationState::Ready
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &StorageKey {
        &self.inner.key
    }

    /// Register a callback for every newly published snapshot.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        let callback: Arc<SubscriberFn> = Arc::new(callback);
        self.inner.subscribers.subscribe(callback)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.unsubscribe(id)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Receiver that always holds the latest snapshot, for async consumers.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Load the persisted cart and mark the store ready.
    ///
    /// An absent value leaves the cart empty. A value that does not decode
    /// also leaves the cart empty and marks the store ready, but returns
    /// [`CartError::Corrupted`] so the host can report the lost data.
    ///
    /// # Errors
    ///
    /// - [`CartError::Storage`] if the read fails; the store stays
    ///   uninitialized and hydration may be retried.
    /// - [`CartError::Corrupted`] if the stored cart is malformed.
    /// - [`CartError::AlreadyHydrated`] if the store is already ready.
    #[instrument(skip(self), fields(key = %self.inner.key))]
    pub async fn hydrate(&self) -> Result<CartSnapshot> {
        if self.is_ready() {
            return Err(CartError::AlreadyHydrated);
        }

        let stored = self
            .inner
            .storage
            .get(self.inner.key.as_str())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to read persisted cart");
                CartError::from(e)
            })?;

        let (items, outcome) = match stored {
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => (items, Ok(())),
                Err(e) => {
                    error!(error = %e, "Persisted cart is corrupted, starting empty");
                    (Vec::new(), Err(CartError::Corrupted(e)))
                }
            },
            None => {
                debug!("No persisted cart found");
                (Vec::new(), Ok(()))
            }
        };

        let snapshot = {
            let _guard = self.lock_writes();
            if self.is_ready() {
                return Err(CartError::AlreadyHydrated);
            }
            self.inner.hydrated.store(true, Ordering::Release);
            self.publish(CartSnapshot::from(items))
        };

        info!(
            lines = snapshot.len(),
            item_count = snapshot.item_count(),
            "Cart hydrated"
        );
        outcome.map(|()| snapshot)
    }

    /// Append a line for `item` with a quantity of one.
    ///
    /// An existing line with the same ID is left alone; the cart then holds
    /// two lines for that product.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotHydrated`] before hydration; nothing changes.
    /// - [`CartError::Storage`] or [`CartError::Serialize`] if the write
    ///   fails; the in-memory cart keeps the new line.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub async fn add_to_cart(&self, item: NewCartItem) -> Result<CartSnapshot> {
        let line = item.into_cart_item();
        let snapshot = self.transition(|current| current.push(line))?;
        debug!(lines = snapshot.len(), "Added line to cart");
        self.persist(&snapshot).await?;
        Ok(snapshot)
    }

    /// Add one unit to every line matching `id`.
    ///
    /// An unknown ID leaves the contents unchanged but still publishes and
    /// persists a new snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::add_to_cart`].
    #[instrument(skip(self))]
    pub async fn increment(&self, id: &ProductId) -> Result<CartSnapshot> {
        let snapshot = self.transition(|current| {
            current.map_matching(id, |line| line.with_quantity(line.quantity.saturating_add(1)))
        })?;
        debug!(quantity = ?snapshot.get(id).map(|l| l.quantity), "Incremented line");
        self.persist(&snapshot).await?;
        Ok(snapshot)
    }

    /// Remove one unit from every line matching `id`, never going below zero.
    ///
    /// Lines that reach zero stay in the cart.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::add_to_cart`].
    #[instrument(skip(self))]
    pub async fn decrement(&self, id: &ProductId) -> Result<CartSnapshot> {
        let snapshot = self.transition(|current| {
            current.map_matching(id, |line| line.with_quantity(line.quantity.saturating_sub(1)))
        })?;
        debug!(quantity = ?snapshot.get(id).map(|l| l.quantity), "Decremented line");
        self.persist(&snapshot).await?;
        Ok(snapshot)
    }

    /// Run `hydrate` on a Tokio task so the caller is not blocked.
    ///
    /// Outcomes are logged by `hydrate`; the handle yields the same result.
    pub fn spawn_hydration(&self) -> JoinHandle<Result<CartSnapshot>>
    where
        S: 'static,
    {
        let store = self.clone();
        tokio::spawn(async move { store.hydrate().await })
    }

    /// Apply `next` to the current snapshot and publish the result.
    fn transition<F>(&self, next: F) -> Result<CartSnapshot>
    where
        F: FnOnce(&CartSnapshot) -> CartSnapshot,
    {
        let guard = self.lock_writes();
        if !self.is_ready() {
            warn!("Cart mutation attempted before hydration");
            return Err(CartError::NotHydrated);
        }

        let current = self.snapshot();
        let snapshot = self.publish(next(&current));
        drop(guard);
        Ok(snapshot)
    }

    /// Replace the current snapshot and notify. Caller holds the write lock.
    fn publish(&self, snapshot: CartSnapshot) -> CartSnapshot {
        self.inner.snapshot_tx.send_replace(snapshot.clone());
        self.inner.subscribers.notify(&snapshot);
        snapshot
    }

    /// Write the full cart under the storage key.
    async fn persist(&self, snapshot: &CartSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot.items()).map_err(|e| {
            error!(error = %e, "Failed to serialize cart");
            CartError::Serialize(e)
        })?;

        self.inner
            .storage
            .set(self.inner.key.as_str(), json)
            .await
            .map_err(|e| {
                error!(
                    key = %self.inner.key,
                    error = %e,
                    "Failed to persist cart, in-memory cart kept"
                );
                CartError::from(e)
            })
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("lines", &self.inner.snapshot_tx.borrow().len())
            .field("subscribers", &self.inner.subscribers)
            .finish_non_exhaustive()
    }
}
