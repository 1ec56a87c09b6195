//! # Kaza Storefront
//!
//! Application shell for the Kaza storefront: configuration, logging, the
//! explicit [`AppState`] and the commands the SPA invokes.
//!
//! ## Module Organization
//! ```text
//! kaza_storefront/
//! ├── lib.rs            ◄─── You are here (startup)
//! ├── config.rs         ◄─── storefront.toml + KAZA_* overrides
//! ├── error.rs          ◄─── ApiError returned by commands
//! ├── state/
//! │   ├── mod.rs        ◄─── AppState
//! │   ├── shop.rs       ◄─── Arc<Mutex<Shop>>
//! │   └── persistence.rs◄─── Local store with degraded mode
//! └── commands/
//!     ├── catalog.rs    ◄─── Browse, item detail, reviews
//!     ├── cart.rs       ◄─── Cart manipulation
//!     ├── coupon.rs     ◄─── Apply / clear coupons
//!     ├── lists.rs      ◄─── Favorites, compare, recently viewed
//!     ├── checkout.rs   ◄─── Order rows + loyalty bonus
//!     ├── subscription.rs◄── Cancellable reseller upgrade
//!     ├── session.rs    ◄─── Sign in / out, account summary
//!     └── notifications.rs◄─ Feed and read flags
//! ```
//!
//! ## Startup
//! ```rust,no_run
//! use kaza_storefront::{bootstrap, commands, init_tracing, StorefrontConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! init_tracing();
//! let state = bootstrap(StorefrontConfig::load(None)?).await?;
//! let cart = commands::cart::add_to_cart(&state, "7").await?;
//! println!("{}", cart.cart.totals.total);
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

pub use config::{ConfigError, StorefrontConfig};
pub use error::{ApiError, ApiResult, ErrorCode, StartupError};
pub use state::AppState;

use kaza_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Opens the configured database and restores the storefront state.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Resolve database path                                               │
/// │     • [database].path or KAZA_DB_PATH                                   │
/// │     • otherwise the platform data dir (…/storefront/kaza.db)            │
/// │                                                                         │
/// │  2. Connect to Database                                                 │
/// │     • SQLite with WAL mode, migrations applied                          │
/// │                                                                         │
/// │  3. AppState::open                                                      │
/// │     • catalog, coupon book, persisted state, pricing policy             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn bootstrap(config: StorefrontConfig) -> Result<AppState, StartupError> {
    info!(store = %config.store.name, "Starting Kaza storefront");

    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let db_config = DbConfig::new(db_path).max_connections(config.database.max_connections);
    let db = Database::new(db_config).await?;
    info!("Database connected and migrations applied");

    AppState::open(config, db).await
}

/// Installs the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kaza=trace` - Show trace for kaza crates only
/// - Default: `info,kaza=debug,sqlx=warn`
///
/// Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kaza=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
