use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::hash_map::{Entry, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{IdGenerationError, StoreError};
use crate::id::{IdGenerator, RandomIdGenerator};
use crate::item::Item;

/// Number of candidate identifiers tried before a store gives up
pub const MAX_ID_ATTEMPTS: usize = 10;

type ItemMap = HashMap<String, Item>;

/// Internal shared state for the store
struct StoreInner {
    /// Every operation, including the sweep, holds this lock for its whole duration
    items: Mutex<ItemMap>,
    /// Sender to signal shutdown to the sweep task
    shutdown_tx: watch::Sender<bool>,
    id_generator: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl StoreInner {
    fn lock_items(&self) -> MutexGuard<'_, ItemMap> {
        // No operation panics halfway through a mutation, so a poisoned map is still whole
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ephemeral store for serialized payloads under random identifiers
///
/// Every item carries an absolute expiration time in epoch seconds. Expired
/// items are hidden from reads immediately and physically reclaimed by a
/// background sweep that runs on [`StoreConfig::sweep_interval`].
///
/// A single mutex guards the whole map, so `store`, `fetch`, `remove` and the
/// sweep are strictly serialized with one another.
///
/// Cloning a `Store` is cheap and every clone shares the same items. The sweep
/// task stops on [`Store::shutdown`] or once the last clone is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use pastebox_core::Store;
/// use serde_json::json;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), pastebox_core::StoreError> {
///     let store = Store::new();
///
///     let id = store.store_for(&json!({"text": "hi"}), Duration::from_secs(60))?;
///     let paste: serde_json::Value = store.fetch(&id)?;
///     assert_eq!(paste["text"], "hi");
///
///     store.remove(&id);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates a new store with default configuration
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context. The store requires
    /// a runtime to spawn its background sweep task.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new store with random identifiers and the system clock
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn with_config(config: StoreConfig) -> Self {
        let id_generator = RandomIdGenerator::new(config.id_length);
        Self::with_parts(config, id_generator, SystemClock)
    }

    /// Creates a new store with an injected identifier generator and clock
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn with_parts(
        config: StoreConfig,
        id_generator: impl IdGenerator + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "pastebox_core::Store requires a Tokio runtime. \
                 Create the store from within a #[tokio::main] or #[tokio::test] \
                 context, or from code running on a Tokio runtime."
            );
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let inner = Arc::new(StoreInner {
            items: Mutex::new(HashMap::new()),
            shutdown_tx,
            id_generator: Box::new(id_generator),
            clock: Box::new(clock),
        });

        // The task only holds a weak handle so dropping the last Store ends it
        tokio::spawn(Self::sweep_task(
            Arc::downgrade(&inner),
            config.sweep_interval,
            shutdown_rx,
        ));
        tracing::debug!("store created, sweeping every {:?}", config.sweep_interval);

        Self { inner }
    }

    /// Background task that periodically reclaims expired items
    async fn sweep_task(
        inner: Weak<StoreInner>,
        interval: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the first sweep waits a full interval
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(inner) = inner.upgrade() else {
                        break;
                    };
                    Self::sweep_internal(&inner);
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("sweep task stopped");
    }

    /// Replaces the map with one holding only the items still live at sweep start
    fn sweep_internal(inner: &StoreInner) -> usize {
        let now = inner.clock.now();
        let mut items = inner.lock_items();
        let before = items.len();

        let live: ItemMap = items
            .drain()
            .filter(|(_, item)| !item.is_expired_at(now))
            .collect();
        *items = live;

        let removed = before - items.len();
        let remaining = items.len();
        drop(items);

        tracing::debug!("sweep reclaimed {} expired items, {} remain", removed, remaining);
        removed
    }

    /// Serializes `payload` and stores it until `expires_at` (epoch seconds).
    ///
    /// Returns the freshly assigned identifier. Candidates that are already in
    /// use, live or not yet swept, are skipped; after [`MAX_ID_ATTEMPTS`]
    /// collisions the call fails.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Serialization`] if the payload cannot be serialized.
    ///   The store is left untouched.
    /// - [`StoreError::IdGeneration`] if the generator fails or every candidate
    ///   collides.
    pub fn store<T>(&self, payload: &T, expires_at: i64) -> Result<String, StoreError>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(payload).map_err(StoreError::Serialization)?;

        let mut items = self.inner.lock_items();
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self
                .inner
                .id_generator
                .generate_id()
                .map_err(IdGenerationError::Generator)?;

            if let Entry::Vacant(slot) = items.entry(candidate) {
                let id = slot.key().clone();
                slot.insert(Item::new(payload, expires_at));
                return Ok(id);
            }
        }

        Err(IdGenerationError::Exhausted {
            attempts: MAX_ID_ATTEMPTS,
        }
        .into())
    }

    /// Stores `payload` until `ttl` from now, truncated to whole seconds.
    ///
    /// See [`Store::store`] for the error cases.
    pub fn store_for<T>(&self, payload: &T, ttl: Duration) -> Result<String, StoreError>
    where
        T: Serialize + ?Sized,
    {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = self.inner.clock.now().saturating_add(ttl);
        self.store(payload, expires_at)
    }

    /// Retrieves and deserializes the payload stored under `id`.
    ///
    /// Expired items are reported as missing even if the sweep has not yet
    /// reclaimed them. Fetching never modifies the store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if `id` is unknown or expired.
    /// - [`StoreError::Deserialization`] if the stored payload does not decode
    ///   into `T`.
    pub fn fetch<T>(&self, id: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let now = self.inner.clock.now();
        let items = self.inner.lock_items();

        match items.get(id) {
            Some(item) if !item.is_expired_at(now) => {
                serde_json::from_slice(item.payload()).map_err(StoreError::Deserialization)
            }
            _ => Err(StoreError::not_found(id)),
        }
    }

    /// Removes the item stored under `id`.
    ///
    /// Removing an unknown identifier is a no-op. Returns `true` if an item,
    /// live or expired, was physically removed.
    pub fn remove(&self, id: &str) -> bool {
        self.inner.lock_items().remove(id).is_some()
    }

    /// Reclaims every expired item now instead of waiting for the next tick.
    ///
    /// Returns the number of items removed.
    pub fn sweep(&self) -> usize {
        Self::sweep_internal(&self.inner)
    }

    /// Checks if `id` refers to a live item
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.expires_at(id).is_some()
    }

    /// Returns the expiration time of a live item
    pub fn expires_at(&self, id: &str) -> Option<i64> {
        let now = self.inner.clock.now();
        self.inner
            .lock_items()
            .get(id)
            .filter(|item| !item.is_expired_at(now))
            .map(Item::expires_at)
    }

    /// Returns the number of items held in memory, including expired ones not yet swept
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock_items().len()
    }

    /// Returns `true` if the store holds no items at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock_items().is_empty()
    }

    /// Stops the background sweep task
    ///
    /// Dropping the last handle to the store has the same effect. Items stay
    /// readable after shutdown; expired ones are only reclaimed by
    /// [`Store::sweep`] or [`Store::remove`] from then on.
    pub fn shutdown(&self) {
        let _ = self.inner.shutdown_tx.send(true);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
