//! # Product Repository
//!
//! Catalog items. `list` returns them in catalog (insertion) order, which is
//! the "relevance" order of the storefront.

use sqlx::SqlitePool;
use tracing::debug;

use super::duplicate_on_conflict;
use crate::error::{DbError, DbResult};
use kaza_core::Item;

const SELECT_ITEM: &str = r#"
    SELECT
        id,
        name,
        description,
        price_cents,
        original_price_cents,
        image_url,
        category,
        discount_percentage,
        rating,
        reviews_count,
        created_at,
        updated_at
    FROM products
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// All products in catalog order.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let sql = format!("{SELECT_ITEM} ORDER BY rowid");
        let items = sqlx::query_as::<_, Item>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed products");
        Ok(items)
    }

    /// Products of one category, in catalog order.
    pub async fn list_by_category(&self, category: &str) -> DbResult<Vec<Item>> {
        let sql = format!("{SELECT_ITEM} WHERE category = ?1 ORDER BY rowid");
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let sql = format!("{SELECT_ITEM} WHERE id = ?1");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the id already exists
    /// - `ConstraintViolation` for a non-positive price or bad rating
    pub async fn insert(&self, item: &Item) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, original_price_cents,
                image_url, category, discount_percentage, rating, reviews_count,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(item.original_price_cents)
        .bind(&item.image_url)
        .bind(&item.category)
        .bind(item.discount_percentage)
        .bind(item.rating)
        .bind(item.reviews_count)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_on_conflict(e, "products.id", &item.id))?;

        Ok(())
    }

    /// Inserts many products in one transaction. All or nothing.
    pub async fn insert_many(&self, items: &[Item]) -> DbResult<usize> {
        let mut tx = self.pool.begin().await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO products (
                    id, name, description, price_cents, original_price_cents,
                    image_url, category, discount_percentage, rating, reviews_count,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )
            .bind(&item.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price_cents)
            .bind(item.original_price_cents)
            .bind(&item.image_url)
            .bind(&item.category)
            .bind(item.discount_percentage)
            .bind(item.rating)
            .bind(item.reviews_count)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| duplicate_on_conflict(e, "products.id", &item.id))?;
        }

        tx.commit().await?;

        debug!(count = items.len(), "Inserted products");
        Ok(items.len())
    }

    /// Overwrites every column of an existing product.
    pub async fn update(&self, item: &Item) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                original_price_cents = ?5,
                image_url = ?6,
                category = ?7,
                discount_percentage = ?8,
                rating = ?9,
                reviews_count = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(item.original_price_cents)
        .bind(&item.image_url)
        .bind(&item.category)
        .bind(item.discount_percentage)
        .bind(item.rating)
        .bind(item.reviews_count)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &item.id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
