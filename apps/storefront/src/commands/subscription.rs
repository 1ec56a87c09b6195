//! # Subscription Commands
//!
//! The reseller upgrade goes through a simulated payment confirmation.
//!
//! ## Upgrade Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start_upgrade(state)                                                   │
//! │     │  free? (reseller → INVALID transition, nothing spawned)           │
//! │     ▼                                                                   │
//! │  tokio::spawn ───────────────────────────────────────────┐              │
//! │     │                                                    │              │
//! │     ▼                                                    ▼              │
//! │  UpgradeHandle ── cancel() / drop ──► cancel_rx     sleep(delay)        │
//! │                                          │               │              │
//! │                                          ▼               ▼              │
//! │                                     Cancelled       confirm_upgrade     │
//! │                                     (no change)     users.set_reseller  │
//! │                                                     persist             │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                                      Confirmed          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping the handle counts as navigating away and cancels the flow.

use chrono::Utc;
use kaza_core::subscription::{self, SubscriptionPlan};
use kaza_core::SubscriptionStatus;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// How an upgrade flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeOutcome {
    /// Payment confirmed; the user is now a reseller.
    Confirmed,
    /// Cancelled before confirmation; nothing changed.
    Cancelled,
}

/// Control over a pending upgrade.
#[derive(Debug)]
pub struct UpgradeHandle {
    cancel_tx: mpsc::Sender<()>,
    task: JoinHandle<ApiResult<UpgradeOutcome>>,
}

impl UpgradeHandle {
    /// Cancels the flow unless it already confirmed, and reports how it
    /// ended.
    pub async fn cancel(self) -> ApiResult<UpgradeOutcome> {
        // Fails only when the task already finished.
        let _ = self.cancel_tx.send(()).await;
        join(self.task).await
    }

    /// Waits for the confirmation.
    pub async fn wait(self) -> ApiResult<UpgradeOutcome> {
        let UpgradeHandle { cancel_tx, task } = self;
        let outcome = join(task).await;
        drop(cancel_tx);
        outcome
    }
}

async fn join(task: JoinHandle<ApiResult<UpgradeOutcome>>) -> ApiResult<UpgradeOutcome> {
    task.await
        .map_err(|e| ApiError::internal(format!("Upgrade task failed: {}", e)))?
}

/// The plans shown on the subscription page.
pub fn list_plans() -> Vec<SubscriptionPlan> {
    subscription::plans()
}

pub fn subscription_status(state: &AppState) -> SubscriptionStatus {
    state.shop().with_shop(|shop| shop.status())
}

/// Starts the reseller upgrade.
///
/// Fails immediately if the user is already a reseller. Otherwise the
/// confirmation arrives after `[subscription].confirmation_delay_ms` unless
/// the returned handle is cancelled or dropped first.
pub fn start_upgrade(state: &AppState) -> ApiResult<UpgradeHandle> {
    state.shop().with_shop(|shop| shop.start_upgrade())?;

    let delay = state.config().confirmation_delay();
    let (cancel_tx, mut cancel_rx) = mpsc::channel::<()>(1);
    let state = state.clone();

    info!(delay_ms = delay.as_millis() as u64, "Reseller upgrade started");

    let task = tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel_rx.recv() => {
                info!("Reseller upgrade cancelled");
                return Ok(UpgradeOutcome::Cancelled);
            }
        }

        confirm(&state).await
    });

    Ok(UpgradeHandle { cancel_tx, task })
}

async fn confirm(state: &AppState) -> ApiResult<UpgradeOutcome> {
    let now = Utc::now();
    let user_id = state.shop().with_shop_mut(|shop| {
        shop.confirm_upgrade(now)
            .map(|()| shop.session().map(|s| s.user_id.clone()))
    })?;

    if let Some(user_id) = &user_id {
        // The local reseller flag is authoritative; the profile copy can lag.
        if let Err(e) = state.db().users().set_reseller(user_id, true, now).await {
            warn!(user_id = %user_id, error = %e, "Failed to mark profile as reseller");
        }
    }

    state.persist().await;
    info!(user_id = ?user_id, "Reseller upgrade confirmed");

    Ok(UpgradeOutcome::Confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::add_to_cart;
    use crate::commands::test_support::app_with;
    use crate::config::StorefrontConfig;
    use crate::error::ErrorCode;
    use kaza_core::{Money, NotificationKind};
    use std::time::Duration;

    fn fast() -> StorefrontConfig {
        let mut config = StorefrontConfig::default();
        config.subscription.confirmation_delay_ms = 20;
        config
    }

    fn slow() -> StorefrontConfig {
        let mut config = StorefrontConfig::default();
        config.subscription.confirmation_delay_ms = 60_000;
        config
    }

    #[tokio::test]
    async fn test_upgrade_confirms_after_delay() {
        let state = app_with(fast()).await;
        add_to_cart(&state, "1").await.unwrap();

        let handle = start_upgrade(&state).unwrap();
        assert_eq!(subscription_status(&state), SubscriptionStatus::Free);

        assert_eq!(handle.wait().await.unwrap(), UpgradeOutcome::Confirmed);
        assert_eq!(subscription_status(&state), SubscriptionStatus::Reseller);

        state.shop().with_shop(|shop| {
            assert_eq!(shop.notifications().items()[0].kind, NotificationKind::System);
            // 299,00 × 0,8
            assert_eq!(shop.totals().subtotal, Money::from_cents(23920));
        });
    }

    #[tokio::test]
    async fn test_cancel_leaves_status_unchanged() {
        let state = app_with(slow()).await;
        let before = state.shop().with_shop(|shop| shop.notifications().len());

        let handle = start_upgrade(&state).unwrap();
        assert_eq!(handle.cancel().await.unwrap(), UpgradeOutcome::Cancelled);

        assert_eq!(subscription_status(&state), SubscriptionStatus::Free);
        assert_eq!(
            state.shop().with_shop(|shop| shop.notifications().len()),
            before
        );
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels() {
        let state = app_with(fast()).await;
        drop(start_upgrade(&state).unwrap());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(subscription_status(&state), SubscriptionStatus::Free);
    }

    #[tokio::test]
    async fn test_reseller_cannot_upgrade_again() {
        let state = app_with(fast()).await;
        start_upgrade(&state).unwrap().wait().await.unwrap();

        let err = start_upgrade(&state).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_plans() {
        let plans = list_plans();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].monthly_price, Money::from_cents(990));
        assert!(plans[1].is_popular);
    }
}
