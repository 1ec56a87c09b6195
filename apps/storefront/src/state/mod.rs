//! # State Module
//!
//! The explicit application state every command receives.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  bootstrap(config) ──► AppState (cheap to clone)                        │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┬─────────────────┐     │
//! │          ▼                  ▼                  ▼                 ▼      │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐  ┌────────┐ │
//! │  │  ShopState   │  │   Database   │  │ LocalPersistence │  │ Config │ │
//! │  │  Arc<Mutex<  │  │  (SQLite     │  │  degraded flag   │  │  Arc   │ │
//! │  │    Shop>>    │  │   pool)      │  │                  │  │        │ │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘  └────────┘ │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ShopState: exclusive access through the Mutex, never across .await  │
//! │  • Database: internal connection pool                                  │
//! │  • Config: read-only after startup                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod persistence;
mod shop;

pub use persistence::LocalPersistence;
pub use shop::ShopState;

use chrono::Utc;
use kaza_core::coupon::CouponBook;
use kaza_core::{Catalog, Shop};
use kaza_db::Database;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::StorefrontConfig;
use crate::error::StartupError;

#[derive(Debug, Clone)]
pub struct AppState {
    shop: ShopState,
    db: Database,
    persistence: LocalPersistence,
    config: Arc<StorefrontConfig>,
}

impl AppState {
    /// Builds the state over an open database.
    ///
    /// ## Steps
    /// 1. Load the catalog; an empty products table is seeded with the
    ///    sample catalog so order rows can reference it
    /// 2. Build the coupon book from config, or the built-in one
    /// 3. Restore favorites, viewed, points, notifications, session and
    ///    reseller status from the local store
    /// 4. Write the restored state back (stores the welcome feed on first run)
    pub async fn open(config: StorefrontConfig, db: Database) -> Result<Self, StartupError> {
        let catalog = load_catalog(&db).await?;

        let coupons = if config.coupons.is_empty() {
            CouponBook::default_coupons()
        } else {
            CouponBook::new(config.coupons.clone())?
        };

        let persistence = LocalPersistence::new(db.local_store());
        let persisted = persistence.load().await;

        let shop = Shop::restore(catalog, coupons, persisted, Utc::now())
            .with_policy(config.pricing.policy());

        info!(
            items = shop.catalog().len(),
            coupons = shop.coupons().all().len(),
            authenticated = shop.is_authenticated(),
            reseller = shop.status().is_reseller(),
            points = shop.points().value(),
            "Storefront state restored"
        );

        let state = AppState {
            shop: ShopState::new(shop),
            db,
            persistence,
            config: Arc::new(config),
        };
        state.persist().await;

        Ok(state)
    }

    pub fn shop(&self) -> &ShopState {
        &self.shop
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn persistence(&self) -> &LocalPersistence {
        &self.persistence
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Writes the persistable part of the shop to the local store.
    /// Never fails; see [`LocalPersistence`].
    pub async fn persist(&self) {
        self.persistence
            .save_latest(|| self.shop.with_shop(|shop| shop.persisted()))
            .await;
    }
}

async fn load_catalog(db: &Database) -> Result<Catalog, StartupError> {
    let items = db.products().list().await?;
    if !items.is_empty() {
        return Ok(Catalog::new(items)?);
    }

    warn!("Products table is empty, seeding the sample catalog");
    let catalog = Catalog::sample();
    db.products().insert_many(catalog.items()).await?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaza_core::{Coupon, DiscountKind};
    use kaza_db::{DbConfig, StoreKey};

    #[tokio::test]
    async fn test_open_seeds_catalog_and_welcome_feed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::open(StorefrontConfig::default(), db.clone())
            .await
            .unwrap();

        assert_eq!(db.products().count().await.unwrap(), 12);
        assert_eq!(state.shop().with_shop(|s| s.notifications().len()), 2);
        assert!(db
            .local_store()
            .get_raw(StoreKey::Notifications)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_open_uses_configured_coupons_and_pricing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut config = StorefrontConfig::default();
        config.pricing.shipping_fee_cents = 990;
        config.coupons = vec![Coupon {
            id: "1".to_string(),
            code: "NATAL10".to_string(),
            kind: DiscountKind::Percentage,
            magnitude: 10,
            min_subtotal_cents: 0,
            expires_on: chrono::NaiveDate::from_ymd_opt(2030, 12, 25).unwrap(),
            description: "10% no Natal".to_string(),
        }];

        let state = AppState::open(config, db).await.unwrap();
        state.shop().with_shop(|shop| {
            assert!(shop.coupons().get("NATAL10").is_some());
            assert!(shop.coupons().get("FRETE50").is_none());
            assert_eq!(shop.totals().shipping.cents(), 990);
        });
    }

    #[tokio::test]
    async fn test_duplicate_configured_coupons_fail_startup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let coupon = Coupon {
            id: "1".to_string(),
            code: "DUP".to_string(),
            kind: DiscountKind::Fixed,
            magnitude: 500,
            min_subtotal_cents: 0,
            expires_on: chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            description: String::new(),
        };
        let mut config = StorefrontConfig::default();
        config.coupons = vec![coupon.clone(), coupon];

        assert!(matches!(
            AppState::open(config, db).await,
            Err(StartupError::Core(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commands_store_latest_points() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::open(StorefrontConfig::default(), db.clone())
            .await
            .unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    crate::commands::cart::add_to_cart(&state, "1").await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // 16 × ⌊299,00 / 10⌋
        let expected = state.shop().with_shop(|shop| shop.points());
        assert_eq!(expected.value(), 16 * 29);

        let stored: kaza_core::loyalty::LoyaltyPoints = db
            .local_store()
            .get_json(StoreKey::Points)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, expected);
    }
}
