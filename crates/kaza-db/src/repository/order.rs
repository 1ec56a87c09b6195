//! # Order Repository
//!
//! One row per purchased line. A checkout writes all of its rows in a single
//! transaction so a failed write never leaves half an order behind.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use kaza_core::{Order, OrderStatus};

const SELECT_ORDER: &str = r#"
    SELECT id, user_id, product_id, quantity, total_amount_cents, status, created_at, updated_at
    FROM orders
"#;

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// All orders, newest first.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let sql = format!("{SELECT_ORDER} ORDER BY created_at DESC, rowid DESC");
        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC");
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id = %user_id, count = orders.len(), "Listed orders");
        Ok(orders)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE id = ?1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_in(&mut tx, order).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Inserts every line of a checkout atomically.
    pub async fn insert_many(&self, orders: &[Order]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        for order in orders {
            insert_in(&mut tx, order).await?;
        }
        tx.commit().await?;

        info!(lines = orders.len(), "Order lines stored");
        Ok(())
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Sum of a user's non-cancelled order amounts, in centavos.
    pub async fn total_spent(&self, user_id: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount_cents), 0) FROM orders WHERE user_id = ?1 AND status != 'cancelled'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}

async fn insert_in(tx: &mut Transaction<'_, Sqlite>, order: &Order) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (id, user_id, product_id, quantity, total_amount_cents, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&order.id)
    .bind(&order.user_id)
    .bind(&order.product_id)
    .bind(order.quantity)
    .bind(order.total_amount_cents)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kaza_core::{Catalog, UserProfile};

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert_many(Catalog::sample().items())
            .await
            .unwrap();
        let now = Utc::now();
        db.users()
            .insert(&UserProfile {
                id: "u1".to_string(),
                email: "ana@kaza.com.br".to_string(),
                full_name: "Ana".to_string(),
                phone: None,
                city: None,
                is_reseller: false,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db
    }

    fn order(id: &str, product_id: &str, quantity: u32, cents: i64) -> Order {
        let now = Utc::now();
        Order {
            id: id.to_string(),
            user_id: "u1".to_string(),
            product_id: product_id.to_string(),
            quantity,
            total_amount_cents: cents,
            status: OrderStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_many_and_list() {
        let db = setup().await;
        let repo = db.orders();
        repo.insert_many(&[order("o1", "1", 1, 29900), order("o2", "8", 2, 17800)])
            .await
            .unwrap();

        let orders = repo.list_for_user("u1").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.status == OrderStatus::Confirmed));
        assert_eq!(repo.total_spent("u1").await.unwrap(), 47700);
        assert!(repo.list_for_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back() {
        let db = setup().await;
        let repo = db.orders();

        let err = repo
            .insert_many(&[order("o1", "1", 1, 29900), order("o2", "404", 1, 100)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = setup().await;
        let repo = db.orders();
        repo.insert(&order("o1", "2", 1, 18900)).await.unwrap();

        repo.update_status("o1", OrderStatus::Cancelled, Utc::now())
            .await
            .unwrap();
        let stored = repo.get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);
        assert_eq!(repo.total_spent("u1").await.unwrap(), 0);

        assert!(matches!(
            repo.update_status("o9", OrderStatus::Shipped, Utc::now()).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
