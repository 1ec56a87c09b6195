//! # Catalog Commands
//!
//! Browsing, the item detail page and product reviews.
//!
//! Prices in [`ItemView`] already reflect reseller pricing; the stored
//! catalog prices never change.

use chrono::Utc;
use kaza_core::validation::{validate_rating, validate_search_term};
use kaza_core::{CatalogQuery, CoreError, Item, Money, Review, Shop};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const MAX_REVIEW_COMMENT: usize = 1000;

/// An item as the product grid shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub item: Item,
    /// Unit price under the current subscription status.
    pub display_price: Money,
    pub is_favorite: bool,
    pub in_compare: bool,
}

impl ItemView {
    pub(crate) fn build(shop: &Shop, item: &Item) -> Self {
        ItemView {
            item: item.clone(),
            display_price: shop.price_for(item),
            is_favorite: shop.favorites().contains(&item.id),
            in_compare: shop.compare().contains(&item.id),
        }
    }

    /// Views for a list of ids, skipping ids no longer in the catalog.
    pub(crate) fn for_ids(shop: &Shop, ids: &[String]) -> Vec<Self> {
        ids.iter()
            .filter_map(|id| shop.catalog().get(id))
            .map(|item| ItemView::build(shop, item))
            .collect()
    }
}

/// Filters and sorts the catalog.
///
/// ## Arguments
/// * `query` - category, free-text search, price range and sort order
pub fn list_items(state: &AppState, query: &CatalogQuery) -> ApiResult<Vec<ItemView>> {
    let mut query = query.clone();
    query.search = validate_search_term(&query.search).map_err(CoreError::from)?;
    debug!(?query, "list_items command");

    Ok(state.shop().with_shop(|shop| {
        shop.catalog()
            .query(&query)
            .into_iter()
            .map(|item| ItemView::build(shop, item))
            .collect()
    }))
}

/// Distinct categories in catalog order.
pub fn list_categories(state: &AppState) -> Vec<String> {
    state.shop().with_shop(|shop| shop.catalog().categories())
}

/// Opens the item detail page and records the view.
pub async fn get_item(state: &AppState, item_id: &str) -> ApiResult<ItemView> {
    debug!(item_id = %item_id, "get_item command");

    let view = state.shop().with_shop_mut(|shop| {
        shop.record_viewed(item_id)?;
        let item = shop.catalog().require(item_id)?;
        Ok::<_, CoreError>(ItemView::build(shop, item))
    })?;

    state.persist().await;
    Ok(view)
}

/// Reviews of an item, newest first.
pub async fn list_reviews(state: &AppState, item_id: &str) -> ApiResult<Vec<Review>> {
    ensure_item(state, item_id)?;
    Ok(state.db().reviews().list_for_product(item_id).await?)
}

/// Stores a review from the signed-in user.
///
/// The stored product rating and review count are refreshed; the catalog in
/// memory keeps the figures it was loaded with until the next start.
pub async fn submit_review(
    state: &AppState,
    item_id: &str,
    rating: u8,
    comment: &str,
    has_photo: bool,
) -> ApiResult<Review> {
    ensure_item(state, item_id)?;
    validate_rating(rating).map_err(CoreError::from)?;

    let comment = comment.trim();
    if comment.chars().count() > MAX_REVIEW_COMMENT {
        return Err(ApiError::validation(format!(
            "comment must be at most {} characters",
            MAX_REVIEW_COMMENT
        )));
    }

    let user_id = state
        .shop()
        .with_shop(|shop| shop.session().map(|s| s.user_id.clone()))
        .ok_or(CoreError::NotAuthenticated)?;

    let review = Review {
        id: Uuid::new_v4().to_string(),
        product_id: item_id.to_string(),
        user_id,
        rating,
        comment: comment.to_string(),
        has_photo,
        created_at: Utc::now(),
    };

    state.db().reviews().insert(&review).await?;
    info!(item_id = %item_id, rating, "Review submitted");

    Ok(review)
}

fn ensure_item(state: &AppState, item_id: &str) -> ApiResult<()> {
    state
        .shop()
        .with_shop(|shop| shop.catalog().require(item_id).map(|_| ()))
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{app, signed_in_app};
    use crate::error::ErrorCode;
    use kaza_core::SortOrder;

    #[tokio::test]
    async fn test_list_items_filters_and_sorts() {
        let state = app().await;
        let query = CatalogQuery {
            category: Some("Banho".to_string()),
            sort: SortOrder::PriceLow,
            ..Default::default()
        };

        let items = list_items(&state, &query).unwrap();
        let ids: Vec<&str> = items.iter().map(|v| v.item.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "3"]);
        assert_eq!(items[0].display_price, Money::from_cents(7900));
    }

    #[tokio::test]
    async fn test_overlong_search_rejected() {
        let state = app().await;
        let query = CatalogQuery {
            search: "x".repeat(101),
            ..Default::default()
        };
        let err = list_items(&state, &query).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_get_item_records_view() {
        let state = app().await;
        get_item(&state, "4").await.unwrap();
        get_item(&state, "7").await.unwrap();

        let viewed = state.shop().with_shop(|s| s.viewed().ids().to_vec());
        assert_eq!(viewed, vec!["7", "4"]);

        let err = get_item(&state, "404").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_categories() {
        let state = app().await;
        assert_eq!(
            list_categories(&state),
            vec!["Cama", "Mesa", "Banho", "Decoração", "Enxoval"]
        );
    }

    #[tokio::test]
    async fn test_submit_review_requires_sign_in() {
        let state = app().await;
        let err = submit_review(&state, "7", 5, "Ótimo", false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn test_submit_and_list_reviews() {
        let state = signed_in_app().await;
        submit_review(&state, "7", 4, "  Macio  ", true).await.unwrap();

        let reviews = list_reviews(&state, "7").await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].comment, "Macio");

        let err = submit_review(&state, "7", 0, "", false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
