//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                                                               │
//! │       │  db.orders().insert_many(&orders)                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── list_for_user(&self, user_id)                                     │
//! │  ├── insert(&self, order)                                              │
//! │  └── update_status(&self, id, status)                                  │
//! │       │  SQL                                                           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One canonical table per entity, each with `list / insert / update`.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog items
//! - [`user::UserRepository`] - Customer profiles
//! - [`order::OrderRepository`] - Purchased lines
//! - [`review::ReviewRepository`] - Product reviews
//! - [`local_store::LocalStoreRepository`] - Persisted storefront state

pub mod local_store;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

/// Maps a UNIQUE violation on insert to a duplicate error naming the value.
pub(crate) fn duplicate_on_conflict(
    err: sqlx::Error,
    field: &str,
    value: &str,
) -> crate::error::DbError {
    match crate::error::DbError::from(err) {
        crate::error::DbError::UniqueViolation { .. } => {
            crate::error::DbError::duplicate(field, value)
        }
        other => other,
    }
}
