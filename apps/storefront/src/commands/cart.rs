//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │          │     │ placed   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_cart                      cart cleared         │
//! │                   set_cart_quantity                                     │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart itself is not persisted. Adding an item also records the view
//! and awards loyalty points, both of which are.

use kaza_core::pricing::PricedLine;
use kaza_core::{CartTotals, Coupon, Shop};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// Cart response including priced lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<PricedLine>,
    pub totals: CartTotals,
    pub active_coupon: Option<Coupon>,
}

impl From<&Shop> for CartResponse {
    fn from(shop: &Shop) -> Self {
        CartResponse {
            lines: shop.priced_lines(),
            totals: shop.totals(),
            active_coupon: shop.active_coupon().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    pub cart: CartResponse,
    pub points_awarded: u64,
    /// Balance after the award.
    pub points: u64,
}

/// Gets the current cart contents.
pub fn get_cart(state: &AppState) -> CartResponse {
    debug!("get_cart command");
    state.shop().with_shop(|shop| CartResponse::from(shop))
}

/// Adds one unit of an item.
///
/// ## Behavior
/// - Already in cart: quantity + 1
/// - Not in cart: new line with quantity 1, price frozen at this moment
/// - Awards ⌊price / R$ 10⌋ points on the catalog price
/// - Moves the item to the front of the recently viewed list
pub async fn add_to_cart(state: &AppState, item_id: &str) -> ApiResult<AddToCartResponse> {
    debug!(item_id = %item_id, "add_to_cart command");

    let response = state.shop().with_shop_mut(|shop| {
        let outcome = shop.add_item(item_id)?;
        Ok::<_, kaza_core::CoreError>(AddToCartResponse {
            cart: CartResponse::from(&*shop),
            points_awarded: outcome.points_awarded,
            points: shop.points().value(),
        })
    })?;

    state.persist().await;
    Ok(response)
}

/// Sets a line's quantity. 0 removes the line.
pub fn set_cart_quantity(state: &AppState, item_id: &str, quantity: u32) -> ApiResult<CartResponse> {
    debug!(item_id = %item_id, quantity, "set_cart_quantity command");

    let response = state.shop().with_shop_mut(|shop| {
        shop.set_quantity(item_id, quantity)?;
        Ok::<_, kaza_core::CoreError>(CartResponse::from(&*shop))
    })?;

    Ok(response)
}

pub fn remove_from_cart(state: &AppState, item_id: &str) -> ApiResult<CartResponse> {
    debug!(item_id = %item_id, "remove_from_cart command");

    let response = state.shop().with_shop_mut(|shop| {
        shop.remove_item(item_id)?;
        Ok::<_, kaza_core::CoreError>(CartResponse::from(&*shop))
    })?;

    Ok(response)
}

pub fn clear_cart(state: &AppState) -> CartResponse {
    debug!("clear_cart command");
    state.shop().with_shop_mut(|shop| {
        shop.clear_cart();
        CartResponse::from(&*shop)
    })
}
