//! # Commands Module
//!
//! Every operation the SPA can invoke.
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPA                                                                    │
//! │  const cart = await invoke('add_to_cart', { itemId: '7' });             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn add_to_cart(state: &AppState, item_id: &str)                  │
//! │      -> ApiResult<AddToCartResponse>                                    │
//! │         │                                                               │
//! │         ├── state.shop().with_shop_mut(|shop| ...)   (sync, locked)     │
//! │         ├── state.db() ...                           (async, unlocked)  │
//! │         └── state.persist().await                    (never fails)      │
//! │         │                                                               │
//! │         ▼  (JSON, camelCase)                                            │
//! │  SPA receives: AddToCartResponse                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that change favorites, viewed, points, notifications, session or
//! subscription status persist before returning.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod coupon;
pub mod lists;
pub mod notifications;
pub mod session;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_support {
    use kaza_db::{Database, DbConfig};

    use crate::config::StorefrontConfig;
    use crate::state::AppState;

    pub async fn app() -> AppState {
        app_with(StorefrontConfig::default()).await
    }

    pub async fn app_with(config: StorefrontConfig) -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::open(config, db).await.unwrap()
    }

    pub async fn signed_in_app() -> AppState {
        let state = app().await;
        super::session::sign_in(&state, "ana@kaza.com.br", Some("Ana Souza"))
            .await
            .unwrap();
        state
    }
}
