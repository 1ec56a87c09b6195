//! # List Commands
//!
//! Favorites and recently viewed survive restarts; the compare list lives
//! only as long as the session.

use kaza_core::CoreError;
use tracing::debug;

use super::catalog::ItemView;
use crate::error::ApiResult;
use crate::state::AppState;

/// Toggles an item in the favorites. Returns whether it is now a favorite.
pub async fn toggle_favorite(state: &AppState, item_id: &str) -> ApiResult<bool> {
    let is_favorite = state
        .shop()
        .with_shop_mut(|shop| shop.toggle_favorite(item_id))?;
    debug!(item_id = %item_id, is_favorite, "toggle_favorite command");

    state.persist().await;
    Ok(is_favorite)
}

/// Toggles an item in the compare list (at most 3, oldest evicted).
/// Returns whether it is now being compared.
pub fn toggle_compare(state: &AppState, item_id: &str) -> ApiResult<bool> {
    let in_compare = state
        .shop()
        .with_shop_mut(|shop| shop.toggle_compare(item_id))?;
    debug!(item_id = %item_id, in_compare, "toggle_compare command");
    Ok(in_compare)
}

pub fn list_favorites(state: &AppState) -> Vec<ItemView> {
    state
        .shop()
        .with_shop(|shop| ItemView::for_ids(shop, shop.favorites().ids()))
}

/// Most recent first.
pub fn list_viewed(state: &AppState) -> Vec<ItemView> {
    state
        .shop()
        .with_shop(|shop| ItemView::for_ids(shop, shop.viewed().ids()))
}

/// Newest first.
pub fn list_compare(state: &AppState) -> Vec<ItemView> {
    state
        .shop()
        .with_shop(|shop| ItemView::for_ids(shop, shop.compare().ids()))
}

pub async fn clear_viewed(state: &AppState) {
    state.shop().with_shop_mut(|shop| shop.clear_viewed());
    state.persist().await;
}

/// Records several views at once, e.g. when the grid reports impressions.
pub async fn record_viewed(state: &AppState, item_ids: &[String]) -> ApiResult<()> {
    state.shop().with_shop_mut(|shop| {
        // Check first so an unknown id leaves the list untouched.
        for id in item_ids {
            shop.catalog().require(id)?;
        }
        for id in item_ids {
            shop.record_viewed(id)?;
        }
        Ok::<_, CoreError>(())
    })?;

    state.persist().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app;
    use crate::error::ErrorCode;

    fn ids(views: &[ItemView]) -> Vec<&str> {
        views.iter().map(|v| v.item.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_favorites_toggle_and_persist() {
        let state = app().await;
        assert!(toggle_favorite(&state, "3").await.unwrap());
        assert!(toggle_favorite(&state, "5").await.unwrap());
        assert!(!toggle_favorite(&state, "3").await.unwrap());

        let favorites = list_favorites(&state);
        assert_eq!(ids(&favorites), vec!["5"]);
        assert!(favorites[0].is_favorite);

        let stored: Vec<String> = state
            .db()
            .local_store()
            .get_json(kaza_db::StoreKey::Favorites)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, vec!["5"]);
    }

    #[tokio::test]
    async fn test_compare_evicts_oldest() {
        let state = app().await;
        for id in ["1", "2", "3", "4"] {
            assert!(toggle_compare(&state, id).unwrap());
        }
        assert_eq!(ids(&list_compare(&state)), vec!["4", "3", "2"]);

        assert!(!toggle_compare(&state, "3").unwrap());
        assert_eq!(ids(&list_compare(&state)), vec!["4", "2"]);

        assert_eq!(
            toggle_compare(&state, "404").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_viewed_cap_and_clear() {
        let state = app().await;
        let all: Vec<String> = (1..=11).map(|i| i.to_string()).collect();
        record_viewed(&state, &all).await.unwrap();

        let viewed = list_viewed(&state);
        assert_eq!(
            ids(&viewed),
            vec!["11", "10", "9", "8", "7", "6", "5", "4", "3", "2"]
        );

        let err = record_viewed(&state, &["12".to_string(), "99".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(list_viewed(&state)[0].item.id, "11");

        clear_viewed(&state).await;
        assert!(list_viewed(&state).is_empty());
    }
}
