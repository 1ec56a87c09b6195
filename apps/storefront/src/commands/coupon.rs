//! # Coupon Commands
//!
//! ## User Workflow
//! ```text
//! Cart subtotal R$ 200,00
//!      │
//!      ▼
//! invoke('apply_coupon', { code: 'FRETE50' })
//!      │
//!      ├── unknown code          → NOT_FOUND
//!      ├── expired / below min   → INVALID_COUPON
//!      └── ok: replaces any active coupon, posts an offer notification
//!      │
//!      ▼
//! Cart totals: discount R$ 50,00, shipping R$ 15,00, total R$ 165,00
//! ```
//!
//! Codes match exactly, so `frete50` is not `FRETE50`.

use chrono::{NaiveDate, Utc};
use kaza_core::{Coupon, CoreError};
use tracing::{debug, info};

use super::cart::CartResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Applies a coupon to the cart as of today.
pub async fn apply_coupon(state: &AppState, code: &str) -> ApiResult<CartResponse> {
    apply_coupon_on(state, code, Utc::now().date_naive()).await
}

/// [`apply_coupon`] with an explicit calendar day.
pub async fn apply_coupon_on(
    state: &AppState,
    code: &str,
    today: NaiveDate,
) -> ApiResult<CartResponse> {
    debug!(code = %code, %today, "apply_coupon command");

    let response = state.shop().with_shop_mut(|shop| {
        shop.apply_coupon(code, today, Utc::now())?;
        Ok::<_, CoreError>(CartResponse::from(&*shop))
    })?;

    info!(
        code = %code,
        discount = %response.totals.discount,
        "Coupon applied"
    );

    state.persist().await;
    Ok(response)
}

/// Removes the active coupon, if any.
pub fn clear_coupon(state: &AppState) -> CartResponse {
    debug!("clear_coupon command");
    state.shop().with_shop_mut(|shop| {
        shop.clear_coupon();
        CartResponse::from(&*shop)
    })
}

/// Coupons that have not expired, for the promotions banner.
pub fn list_coupons(state: &AppState) -> Vec<Coupon> {
    let today = Utc::now().date_naive();
    state.shop().with_shop(|shop| {
        shop.coupons()
            .available_on(today)
            .into_iter()
            .cloned()
            .collect()
    })
}
