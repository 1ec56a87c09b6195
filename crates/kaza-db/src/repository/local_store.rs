//! # Local Store Repository
//!
//! A string-keyed JSON store for the storefront's per-user state.
//!
//! ## Keys
//! ```text
//! ┌────────────────────┬──────────────────────────────────────────────────┐
//! │ Key                │ Value                                            │
//! ├────────────────────┼──────────────────────────────────────────────────┤
//! │ kaza-favorites     │ ["1","7"]                                        │
//! │ kaza-viewed        │ ["7","1"]           most recent first            │
//! │ kaza-points        │ 120                                              │
//! │ kaza-notifications │ [{ id, title, message, type, read, created_at }] │
//! │ kaza-auth          │ { user_id, email, full_name }                    │
//! │ kaza-reseller      │ true                                             │
//! └────────────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! Values carry no schema version; a value that no longer decodes is
//! reported as a `Serialization` error and the caller decides what to do.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt;
use tracing::debug;

use crate::error::DbResult;

/// A slot of persisted storefront state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Favorites,
    Viewed,
    Points,
    Notifications,
    Auth,
    Reseller,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::Favorites,
        StoreKey::Viewed,
        StoreKey::Points,
        StoreKey::Notifications,
        StoreKey::Auth,
        StoreKey::Reseller,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Favorites => "kaza-favorites",
            StoreKey::Viewed => "kaza-viewed",
            StoreKey::Points => "kaza-points",
            StoreKey::Notifications => "kaza-notifications",
            StoreKey::Auth => "kaza-auth",
            StoreKey::Reseller => "kaza-reseller",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LocalStoreRepository {
    pool: SqlitePool,
}

impl LocalStoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LocalStoreRepository { pool }
    }

    /// Raw stored text for a key.
    pub async fn get_raw(&self, key: StoreKey) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM local_store WHERE key = ?1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Writes raw text, replacing any previous value.
    pub async fn set_raw(&self, key: StoreKey, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO local_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Local store write");
        Ok(())
    }

    /// Decodes the JSON stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(None)` - nothing stored
    /// * `Err(Serialization)` - stored text is not a valid `T`
    pub async fn get_json<T: DeserializeOwned>(&self, key: StoreKey) -> DbResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `key`.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw).await
    }

    /// Deletes a key. Returns whether anything was stored.
    pub async fn remove(&self, key: StoreKey) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM local_store WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Keys currently holding a value.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM local_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_json_round_trip_and_overwrite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.local_store();

        assert!(store
            .get_json::<Vec<String>>(StoreKey::Favorites)
            .await
            .unwrap()
            .is_none());

        store
            .set_json(StoreKey::Favorites, &vec!["1", "7"])
            .await
            .unwrap();
        store.set_json(StoreKey::Favorites, &vec!["7"]).await.unwrap();

        let favorites: Vec<String> = store.get_json(StoreKey::Favorites).await.unwrap().unwrap();
        assert_eq!(favorites, vec!["7"]);
        assert_eq!(
            store.get_raw(StoreKey::Favorites).await.unwrap().as_deref(),
            Some(r#"["7"]"#)
        );
    }

    #[tokio::test]
    async fn test_corrupt_value_is_serialization_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.local_store();
        store.set_raw(StoreKey::Points, "not a number").await.unwrap();

        let err = store.get_json::<u64>(StoreKey::Points).await.unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_remove_and_keys() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.local_store();
        store.set_json(StoreKey::Reseller, &true).await.unwrap();
        store.set_json(StoreKey::Points, &10u64).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["kaza-points", "kaza-reseller"]);
        assert!(store.remove(StoreKey::Reseller).await.unwrap());
        assert!(!store.remove(StoreKey::Reseller).await.unwrap());
        assert_eq!(store.keys().await.unwrap(), vec!["kaza-points"]);
    }

    #[test]
    fn test_key_names() {
        let names: Vec<&str> = StoreKey::ALL.iter().map(StoreKey::as_str).collect();
        assert_eq!(
            names,
            vec![
                "kaza-favorites",
                "kaza-viewed",
                "kaza-points",
                "kaza-notifications",
                "kaza-auth",
                "kaza-reseller"
            ]
        );
    }
}
