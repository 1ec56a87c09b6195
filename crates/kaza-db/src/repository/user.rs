//! # User Repository
//!
//! Customer profiles. The storefront creates a profile the first time an
//! email signs in and keeps the reseller flag in sync with the subscription.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::duplicate_on_conflict;
use crate::error::{DbError, DbResult};
use kaza_core::UserProfile;

const SELECT_USER: &str = r#"
    SELECT id, email, full_name, phone, city, is_reseller, created_at, updated_at
    FROM users
"#;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// All profiles, oldest first.
    pub async fn list(&self) -> DbResult<Vec<UserProfile>> {
        let sql = format!("{SELECT_USER} ORDER BY created_at, rowid");
        let users = sqlx::query_as::<_, UserProfile>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserProfile>> {
        let sql = format!("{SELECT_USER} WHERE id = ?1");
        let user = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Lookup by email, case-insensitive.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<UserProfile>> {
        let sql = format!("{SELECT_USER} WHERE lower(email) = lower(?1)");
        let user = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Inserts a profile.
    ///
    /// ## Errors
    /// `UniqueViolation` if the email is already registered.
    pub async fn insert(&self, user: &UserProfile) -> DbResult<()> {
        debug!(id = %user.id, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, phone, city, is_reseller, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.city)
        .bind(user.is_reseller)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_on_conflict(e, "users.email", &user.email))?;

        Ok(())
    }

    /// Overwrites name, contact fields and reseller flag.
    pub async fn update(&self, user: &UserProfile) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = ?2,
                full_name = ?3,
                phone = ?4,
                city = ?5,
                is_reseller = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.city)
        .bind(user.is_reseller)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_on_conflict(e, "users.email", &user.email))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id));
        }

        Ok(())
    }

    /// Sets the reseller flag after a confirmed upgrade.
    pub async fn set_reseller(
        &self,
        id: &str,
        is_reseller: bool,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET is_reseller = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(is_reseller)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(user_id = %id, is_reseller, "Reseller flag updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn profile(id: &str, email: &str) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: id.to_string(),
            email: email.to_string(),
            full_name: "Ana Souza".to_string(),
            phone: None,
            city: Some("Recife".to_string()),
            is_reseller: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        repo.insert(&profile("u1", "ana@kaza.com.br")).await.unwrap();

        let by_id = repo.get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(by_id.city.as_deref(), Some("Recife"));

        let by_email = repo.get_by_email("ANA@kaza.com.br ").await.unwrap().unwrap();
        assert_eq!(by_email.id, "u1");

        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        repo.insert(&profile("u1", "ana@kaza.com.br")).await.unwrap();

        let err = repo
            .insert(&profile("u2", "ana@kaza.com.br"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_reseller_flag() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        let mut user = profile("u1", "ana@kaza.com.br");
        repo.insert(&user).await.unwrap();

        user.phone = Some("+55 81 99999-0000".to_string());
        repo.update(&user).await.unwrap();
        repo.set_reseller("u1", true, Utc::now()).await.unwrap();

        let stored = repo.get_by_id("u1").await.unwrap().unwrap();
        assert!(stored.is_reseller);
        assert!(stored.phone.is_some());

        assert!(matches!(
            repo.set_reseller("ghost", true, Utc::now()).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
