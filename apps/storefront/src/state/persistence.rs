//! # Local Persistence
//!
//! Reads and writes [`PersistedState`] through the local store, one JSON
//! value per [`StoreKey`].
//!
//! ## Failure Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Healthy ──── store read/write fails ────► Degraded                     │
//! │     │              warn!                       │                        │
//! │     │                                          │                        │
//! │  load/save hit the store              load → defaults                   │
//! │                                       save → skipped                    │
//! │                                                                         │
//! │  A value that no longer decodes is dropped with a warning; the store   │
//! │  itself is still healthy, so this does not degrade.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here returns an error: the shop keeps working in memory.
//!
//! Writes are serialized by an async lock held from snapshot to commit, so
//! the last write always carries the newest state.

use kaza_core::shop::PersistedState;
use kaza_db::{DbError, LocalStoreRepository, StoreKey};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LocalPersistence {
    store: LocalStoreRepository,
    degraded: Arc<AtomicBool>,
    write_lock: Arc<Mutex<()>>,
}

impl LocalPersistence {
    pub fn new(store: LocalStoreRepository) -> Self {
        LocalPersistence {
            store,
            degraded: Arc::new(AtomicBool::new(false)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// True once a store operation has failed.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Reads every key. Missing or unreadable values fall back to defaults.
    pub async fn load(&self) -> PersistedState {
        if self.is_degraded() {
            return PersistedState::default();
        }

        let favorites = self.read(StoreKey::Favorites).await;
        let viewed = self.read(StoreKey::Viewed).await;
        let points = self.read(StoreKey::Points).await;
        let notifications = self.read(StoreKey::Notifications).await;
        let session = self.read(StoreKey::Auth).await;
        let reseller = self.read(StoreKey::Reseller).await;

        // A failure part-way through leaves a mix of stored and default
        // values; start clean instead.
        if self.is_degraded() {
            return PersistedState::default();
        }

        PersistedState {
            favorites: favorites.unwrap_or_default(),
            viewed: viewed.unwrap_or_default(),
            points: points.unwrap_or_default(),
            notifications,
            session,
            reseller: reseller.unwrap_or(false),
        }
    }

    /// Writes every key. The auth and reseller keys are removed rather than
    /// stored empty.
    pub async fn save(&self, state: &PersistedState) {
        let _guard = self.write_lock.lock().await;
        self.write(state).await;
    }

    /// Takes the snapshot only once the write lock is held. Concurrent
    /// callers therefore commit in snapshot order.
    pub async fn save_latest<F>(&self, snapshot: F)
    where
        F: FnOnce() -> PersistedState,
    {
        let _guard = self.write_lock.lock().await;
        let state = snapshot();
        self.write(&state).await;
    }

    async fn write(&self, state: &PersistedState) {
        if self.is_degraded() {
            debug!("Persistence degraded, keeping state in memory only");
            return;
        }

        if let Err(e) = self.write_all(state).await {
            self.degrade(&e);
        }
    }

    async fn write_all(&self, state: &PersistedState) -> Result<(), DbError> {
        self.store.set_json(StoreKey::Favorites, &state.favorites).await?;
        self.store.set_json(StoreKey::Viewed, &state.viewed).await?;
        self.store.set_json(StoreKey::Points, &state.points).await?;

        if let Some(feed) = &state.notifications {
            self.store.set_json(StoreKey::Notifications, feed).await?;
        }

        match &state.session {
            Some(session) => self.store.set_json(StoreKey::Auth, session).await?,
            None => {
                self.store.remove(StoreKey::Auth).await?;
            }
        }

        if state.reseller {
            self.store.set_json(StoreKey::Reseller, &true).await?;
        } else {
            self.store.remove(StoreKey::Reseller).await?;
        }

        debug!("Persisted shop state");
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        if self.is_degraded() {
            return None;
        }

        match self.store.get_json(key).await {
            Ok(value) => value,
            Err(DbError::Serialization(e)) => {
                warn!(key = %key, error = %e, "Dropping unreadable stored value");
                None
            }
            Err(e) => {
                self.degrade(&e);
                None
            }
        }
    }

    fn degrade(&self, err: &DbError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            warn!(error = %err, "Local store unavailable, continuing in memory only");
        }
    }
}
