//! # Notification Commands

use kaza_core::Notification;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// The feed, newest first.
pub fn list_notifications(state: &AppState) -> Vec<Notification> {
    state
        .shop()
        .with_shop(|shop| shop.notifications().items().to_vec())
}

pub fn unread_count(state: &AppState) -> usize {
    state.shop().with_shop(|shop| shop.unread_count())
}

pub async fn mark_notification_read(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "mark_notification_read command");
    state
        .shop()
        .with_shop_mut(|shop| shop.mark_notification_read(id))?;
    state.persist().await;
    Ok(())
}

/// Returns how many were unread.
pub async fn mark_all_notifications_read(state: &AppState) -> usize {
    let changed = state
        .shop()
        .with_shop_mut(|shop| shop.mark_all_notifications_read());
    debug!(changed, "mark_all_notifications_read command");
    state.persist().await;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_welcome_feed_and_read_flags() {
        let state = app().await;
        let feed = list_notifications(&state);
        assert_eq!(feed.len(), 2);
        assert!(feed[0].message.contains("BEMVINDO15"));
        assert_eq!(unread_count(&state), 2);

        mark_notification_read(&state, "1").await.unwrap();
        assert_eq!(unread_count(&state), 1);

        assert_eq!(mark_all_notifications_read(&state).await, 1);
        assert_eq!(unread_count(&state), 0);

        let err = mark_notification_read(&state, "nope").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
