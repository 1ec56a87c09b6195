//! # Checkout Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(state)                                                        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  1. shop.begin_checkout()       session? cart not empty? price lines   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  2. orders().insert_many(rows)  one `confirmed` row per line, one tx   │
//! │     │   (failure: cart untouched, error returned)                       │
//! │     ▼                                                                   │
//! │  3. shop.complete_purchase()    clear cart, ⌊total / R$ 5⌋ bonus,       │
//! │     │                           order notification                      │
//! │     ▼                                                                   │
//! │  4. persist                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use kaza_core::shop::{CheckoutReceipt, CheckoutSummary};
use kaza_core::{Order, OrderStatus};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::AppState;

/// Places the order for the signed-in user.
pub async fn checkout(state: &AppState) -> ApiResult<CheckoutReceipt> {
    let summary = state.shop().with_shop(|shop| shop.begin_checkout())?;
    debug!(
        order_id = %summary.order_id,
        lines = summary.lines.len(),
        total = %summary.totals.total,
        "checkout command"
    );

    let now = Utc::now();
    state.db().orders().insert_many(&order_rows(&summary, now)).await?;

    let bonus_points = state
        .shop()
        .with_shop_mut(|shop| shop.complete_purchase(summary.totals.total, now));

    info!(
        order_id = %summary.order_id,
        user_id = %summary.user_id,
        total = %summary.totals.total,
        bonus_points,
        "Order placed"
    );

    state.persist().await;

    Ok(CheckoutReceipt {
        summary,
        bonus_points,
    })
}

/// The signed-in user's order rows, newest first. Empty when signed out.
pub async fn list_orders(state: &AppState) -> ApiResult<Vec<Order>> {
    let user_id = state
        .shop()
        .with_shop(|shop| shop.session().map(|s| s.user_id.clone()));

    match user_id {
        Some(id) => Ok(state.db().orders().list_for_user(&id).await?),
        None => Ok(Vec::new()),
    }
}

/// One row per priced line; row ids are `<order id>-<line number>`.
fn order_rows(summary: &CheckoutSummary, now: DateTime<Utc>) -> Vec<Order> {
    summary
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| Order {
            id: format!("{}-{}", summary.order_id, i + 1),
            user_id: summary.user_id.clone(),
            product_id: line.item_id.clone(),
            quantity: line.quantity,
            total_amount_cents: line.line_total.cents(),
            status: OrderStatus::Confirmed,
            created_at: now,
            updated_at: now,
        })
        .collect()
}
