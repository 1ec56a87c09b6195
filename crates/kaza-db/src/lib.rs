//! # kaza-db: Database Layer for the Kaza Storefront
//!
//! SQLite storage for the backing data (products, users, orders, reviews) and
//! for the per-user local key-value store the storefront persists its state
//! into.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kaza Storefront Data Flow                        │
//! │                                                                         │
//! │  Command (checkout, toggle_favorite, ...)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kaza-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────────┐  ┌──────────────┐ │   │
//! │  │   │   Database    │    │   Repositories    │  │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                   │  │  (embedded)  │ │   │
//! │  │   │               │    │ ProductRepository │  │              │ │   │
//! │  │   │ SqlitePool    │◄───│ UserRepository    │  │ 001_initial  │ │   │
//! │  │   │               │    │ OrderRepository   │  │   _schema    │ │   │
//! │  │   │               │    │ ReviewRepository  │  │              │ │   │
//! │  │   │               │    │ LocalStoreRepo    │  │              │ │   │
//! │  │   └───────────────┘    └───────────────────┘  └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/com.kaza.storefront/kaza.db                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kaza_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kaza.db")).await?;
//! let items = db.products().list().await?;
//! let favorites: Option<Vec<String>> = db.local_store().get_json(StoreKey::Favorites).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::local_store::{LocalStoreRepository, StoreKey};
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::review::ReviewRepository;
pub use repository::user::UserRepository;
