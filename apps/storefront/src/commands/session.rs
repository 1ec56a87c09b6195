//! # Session Commands
//!
//! There is no password check here: the identity provider is outside the
//! storefront. Signing in creates the user profile on first use so order and
//! review rows have a user to reference.

use chrono::Utc;
use kaza_core::validation::validate_email;
use kaza_core::{CoreError, SubscriptionStatus, UserProfile, UserSession};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header badge data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub session: Option<UserSession>,
    pub status: SubscriptionStatus,
    pub points: u64,
    pub unread_notifications: usize,
    pub favorites: usize,
    pub cart_quantity: u32,
}

/// Signs in by email, creating the profile on first use. A profile marked
/// as reseller restores the reseller status.
///
/// ## Arguments
/// * `email` - matched case-insensitively against existing profiles
/// * `full_name` - used only when creating the profile; defaults to the
///   part of the email before `@`
pub async fn sign_in(
    state: &AppState,
    email: &str,
    full_name: Option<&str>,
) -> ApiResult<UserSession> {
    let email = email.trim();
    validate_email(email).map_err(CoreError::from)?;

    let users = state.db().users();
    let profile = match users.get_by_email(email).await? {
        Some(profile) => profile,
        None => {
            let now = Utc::now();
            let name = full_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .or_else(|| email.split('@').next())
                .unwrap_or(email);

            let profile = UserProfile {
                id: Uuid::new_v4().to_string(),
                email: email.to_string(),
                full_name: name.to_string(),
                phone: None,
                city: None,
                is_reseller: false,
                created_at: now,
                updated_at: now,
            };
            users.insert(&profile).await?;
            info!(user_id = %profile.id, "Created user profile");
            profile
        }
    };

    let session = profile.session();
    let reseller = state.shop().with_shop_mut(|shop| {
        shop.sign_in(session.clone(), profile.is_reseller);
        shop.status().is_reseller()
    });
    info!(user_id = %session.user_id, reseller, "Signed in");

    // Upgrade paid before signing in: attach it to the profile.
    if reseller && !profile.is_reseller {
        if let Err(e) = users.set_reseller(&profile.id, true, Utc::now()).await {
            warn!(user_id = %profile.id, error = %e, "Failed to mark profile as reseller");
        }
    }

    state.persist().await;
    Ok(session)
}

/// Signs out: clears the cart, the active coupon, the session and the
/// reseller status. Favorites, viewed items, points and notifications stay.
pub async fn sign_out(state: &AppState) -> Option<UserSession> {
    let previous = state.shop().with_shop_mut(|shop| shop.sign_out());
    if let Some(session) = &previous {
        info!(user_id = %session.user_id, "Signed out");
    }

    state.persist().await;
    previous
}

pub fn current_session(state: &AppState) -> Option<UserSession> {
    state.shop().with_shop(|shop| shop.session().cloned())
}

pub fn account_summary(state: &AppState) -> AccountSummary {
    state.shop().with_shop(|shop| AccountSummary {
        session: shop.session().cloned(),
        status: shop.status(),
        points: shop.points().value(),
        unread_notifications: shop.unread_count(),
        favorites: shop.favorites().len(),
        cart_quantity: shop.cart().total_quantity(),
    })
}
