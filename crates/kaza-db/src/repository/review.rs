//! # Review Repository
//!
//! Product reviews. Inserting a review also refreshes the product's average
//! rating and review count in the same transaction.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kaza_core::Review;

const SELECT_REVIEW: &str = r#"
    SELECT id, product_id, user_id, rating, comment, has_photo, created_at
    FROM reviews
"#;

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Reviews of one product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Review>> {
        let sql = format!("{SELECT_REVIEW} WHERE product_id = ?1 ORDER BY created_at DESC, rowid DESC");
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(reviews)
    }

    /// Stores a review and recomputes the product's rating and count.
    pub async fn insert(&self, review: &Review) -> DbResult<()> {
        debug!(product_id = %review.product_id, rating = review.rating, "Inserting review");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO reviews (id, product_id, user_id, rating, comment, has_photo, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&review.id)
        .bind(&review.product_id)
        .bind(&review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.has_photo)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE products SET
                rating = (SELECT ROUND(AVG(rating), 1) FROM reviews WHERE product_id = ?1),
                reviews_count = (SELECT COUNT(*) FROM reviews WHERE product_id = ?1),
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(&review.product_id)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Edits the rating, comment and photo flag of a review.
    pub async fn update(&self, review: &Review) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE reviews SET rating = ?2, comment = ?3, has_photo = ?4 WHERE id = ?1",
        )
        .bind(&review.id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.has_photo)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", &review.id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Utc;
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

    fn review(id: &str, rating: u8) -> Review {
        Review {
            id: id.to_string(),
            product_id: "7".to_string(),
            user_id: "u1".to_string(),
            rating,
            comment: "Muito macio".to_string(),
            has_photo: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_refreshes_product_rating() {
        let db = setup().await;
        let repo = db.reviews();
        repo.insert(&review("r1", 5)).await.unwrap();
        repo.insert(&review("r2", 4)).await.unwrap();

        assert_eq!(repo.list_for_product("7").await.unwrap().len(), 2);

        let product = db.products().get_by_id("7").await.unwrap().unwrap();
        assert_eq!(product.reviews_count, 2);
        assert_eq!(product.rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_rating_out_of_range_rejected() {
        let db = setup().await;
        let err = db.reviews().insert(&review("r1", 6)).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_update() {
        let db = setup().await;
        let repo = db.reviews();
        let mut r = review("r1", 3);
        repo.insert(&r).await.unwrap();

        r.comment = "Mudei de ideia".to_string();
        r.has_photo = true;
        repo.update(&r).await.unwrap();

        let stored = &repo.list_for_product("7").await.unwrap()[0];
        assert_eq!(stored.comment, "Mudei de ideia");
        assert!(stored.has_photo);

        r.id = "r9".to_string();
        assert!(repo.update(&r).await.is_err());
    }
}
