//! # Shop
//!
//! The aggregate storefront state: catalog, cart, coupon, lists, points,
//! notifications, subscription and session. Every user action is one method
//! call here; the application shell only adds locking, persistence and the
//! payment delay.
//!
//! ## State Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shop                                                                   │
//! │  ├── catalog, coupons, policy     fixed at construction                 │
//! │  ├── cart, active_coupon          in memory only                        │
//! │  ├── compare                      in memory only                        │
//! │  └── PersistedState               restored at start, saved after change │
//! │      ├── favorites                                                      │
//! │      ├── viewed                                                         │
//! │      ├── points                                                         │
//! │      ├── notifications                                                  │
//! │      ├── session                                                        │
//! │      └── reseller                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method either succeeds completely or returns an error with the state
//! unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::coupon::CouponBook;
use crate::error::{CoreError, CoreResult};
use crate::lists::{CompareList, Favorites, RecentlyViewed};
use crate::loyalty::{bonus_for_order, points_for_item, LoyaltyPoints};
use crate::money::Money;
use crate::notification::{self, NotificationFeed};
use crate::pricing::{CartTotals, PricedLine, PricingPolicy};
use crate::subscription;
use crate::types::{CartLine, Coupon, Item, SubscriptionStatus, UserSession};

// =============================================================================
// Persisted State
// =============================================================================

/// Everything that survives a restart.
///
/// `notifications` is `None` when nothing was ever stored, which triggers the
/// welcome feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub favorites: Favorites,
    pub viewed: RecentlyViewed,
    pub points: LoyaltyPoints,
    pub notifications: Option<NotificationFeed>,
    pub session: Option<UserSession>,
    pub reseller: bool,
}

// =============================================================================
// Results
// =============================================================================

/// Result of [`Shop::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOutcome {
    /// The line's quantity after the add.
    pub quantity: u32,
    pub points_awarded: u64,
}

/// A validated cart ready to be charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub order_id: String,
    pub user_id: String,
    pub lines: Vec<PricedLine>,
    pub totals: CartTotals,
}

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub summary: CheckoutSummary,
    pub bonus_points: u64,
}

// =============================================================================
// Shop
// =============================================================================

#[derive(Debug, Clone)]
pub struct Shop {
    catalog: Catalog,
    coupons: CouponBook,
    policy: PricingPolicy,

    cart: Cart,
    active_coupon: Option<Coupon>,
    compare: CompareList,

    favorites: Favorites,
    viewed: RecentlyViewed,
    points: LoyaltyPoints,
    notifications: NotificationFeed,
    session: Option<UserSession>,
    status: SubscriptionStatus,
}

impl Shop {
    /// A fresh shop with nothing persisted and an empty feed.
    pub fn new(catalog: Catalog, coupons: CouponBook) -> Self {
        Shop {
            catalog,
            coupons,
            policy: PricingPolicy::default(),
            cart: Cart::new(),
            active_coupon: None,
            compare: CompareList::default(),
            favorites: Favorites::default(),
            viewed: RecentlyViewed::default(),
            points: LoyaltyPoints::default(),
            notifications: NotificationFeed::default(),
            session: None,
            status: SubscriptionStatus::Free,
        }
    }

    /// Rebuilds a shop from stored state.
    ///
    /// Ids that are no longer in the catalog are dropped from the lists. When
    /// no notifications were stored the welcome feed is seeded.
    pub fn restore(
        catalog: Catalog,
        coupons: CouponBook,
        persisted: PersistedState,
        now: DateTime<Utc>,
    ) -> Self {
        let mut shop = Shop::new(catalog, coupons);

        for id in persisted.favorites.ids() {
            if shop.catalog.contains(id) && !shop.favorites.contains(id) {
                shop.favorites.toggle(id);
            }
        }

        let mut viewed = persisted.viewed;
        viewed.normalize();
        for id in viewed.ids().iter().rev() {
            if shop.catalog.contains(id) {
                shop.viewed.record(id);
            }
        }

        shop.points = persisted.points;
        shop.notifications = persisted
            .notifications
            .unwrap_or_else(|| NotificationFeed::welcome(now));
        shop.session = persisted.session;
        shop.status = if persisted.reseller {
            SubscriptionStatus::Reseller
        } else {
            SubscriptionStatus::Free
        };

        shop
    }

    /// Replaces the pricing policy.
    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The state to write back to the local store.
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            favorites: self.favorites.clone(),
            viewed: self.viewed.clone(),
            points: self.points,
            notifications: Some(self.notifications.clone()),
            session: self.session.clone(),
            reseller: self.status.is_reseller(),
        }
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Adds one unit, records the view and awards points on the base price.
    pub fn add_item(&mut self, item_id: &str) -> CoreResult<AddOutcome> {
        let item = self.catalog.require(item_id)?;
        let points_awarded = points_for_item(item.price());
        let quantity = self.cart.add(item)?;

        self.viewed.record(item_id);
        self.points.award(points_awarded);

        Ok(AddOutcome {
            quantity,
            points_awarded,
        })
    }

    /// Sets a line's quantity; 0 removes it.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> CoreResult<()> {
        self.cart.set_quantity(item_id, quantity)
    }

    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<CartLine> {
        self.cart.remove(item_id)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    // -------------------------------------------------------------------------
    // Coupons & totals
    // -------------------------------------------------------------------------

    /// Applies a coupon against the current subtotal, replacing any active
    /// one, and posts an offer notification.
    pub fn apply_coupon(
        &mut self,
        code: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> CoreResult<&Coupon> {
        let subtotal = self.policy.subtotal(&self.cart, self.status);
        let coupon = self.coupons.resolve(code, subtotal, today)?.clone();

        self.notifications
            .push(notification::coupon_applied(&coupon.code, now));
        Ok(self.active_coupon.insert(coupon))
    }

    /// Drops the active coupon, returning it.
    pub fn clear_coupon(&mut self) -> Option<Coupon> {
        self.active_coupon.take()
    }

    pub fn totals(&self) -> CartTotals {
        self.policy
            .compute_totals(&self.cart, self.active_coupon.as_ref(), self.status)
    }

    pub fn priced_lines(&self) -> Vec<PricedLine> {
        self.policy.price_lines(&self.cart, self.status)
    }

    /// Unit price of a catalog item as this customer sees it.
    pub fn price_for(&self, item: &Item) -> Money {
        self.policy.unit_price(item.price(), self.status)
    }

    // -------------------------------------------------------------------------
    // Lists
    // -------------------------------------------------------------------------

    pub fn toggle_favorite(&mut self, item_id: &str) -> CoreResult<bool> {
        self.catalog.require(item_id)?;
        Ok(self.favorites.toggle(item_id))
    }

    pub fn toggle_compare(&mut self, item_id: &str) -> CoreResult<bool> {
        self.catalog.require(item_id)?;
        Ok(self.compare.toggle(item_id))
    }

    pub fn record_viewed(&mut self, item_id: &str) -> CoreResult<()> {
        self.catalog.require(item_id)?;
        self.viewed.record(item_id);
        Ok(())
    }

    pub fn clear_viewed(&mut self) {
        self.viewed.clear();
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    pub fn mark_notification_read(&mut self, id: &str) -> CoreResult<()> {
        self.notifications.mark_read(id)
    }

    pub fn mark_all_notifications_read(&mut self) -> usize {
        self.notifications.mark_all_read()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Records the signed-in user. A profile already marked as reseller
    /// restores that status; otherwise the current status is kept, so an
    /// upgrade paid before signing in is not lost.
    pub fn sign_in(&mut self, session: UserSession, profile_is_reseller: bool) {
        self.session = Some(session);
        if profile_is_reseller {
            self.status = SubscriptionStatus::Reseller;
        }
    }

    /// Clears cart, coupon, session and reseller status. Favorites, viewed,
    /// points and notifications stay.
    pub fn sign_out(&mut self) -> Option<UserSession> {
        self.cart.clear();
        self.active_coupon = None;
        self.status = SubscriptionStatus::Free;
        self.session.take()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    // -------------------------------------------------------------------------
    // Subscription
    // -------------------------------------------------------------------------

    /// Checks an upgrade may start. Does not change state.
    pub fn start_upgrade(&self) -> CoreResult<SubscriptionStatus> {
        subscription::upgrade(self.status)
    }

    /// Payment confirmed: become a reseller and post the welcome notice.
    pub fn confirm_upgrade(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        self.status = subscription::upgrade(self.status)?;
        self.notifications.push(notification::premium_welcome(now));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Validates session and cart and prices the order. Does not change state.
    pub fn begin_checkout(&self) -> CoreResult<CheckoutSummary> {
        let session = self.session.as_ref().ok_or(CoreError::NotAuthenticated)?;
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(CheckoutSummary {
            order_id: Uuid::new_v4().to_string(),
            user_id: session.user_id.clone(),
            lines: self.priced_lines(),
            totals: self.totals(),
        })
    }

    /// Purchase confirmation: clears the cart, awards ⌊total / 5⌋ bonus
    /// points and posts the order notification.
    ///
    /// ## Returns
    /// The bonus awarded.
    pub fn complete_purchase(&mut self, order_total: Money, now: DateTime<Utc>) -> u64 {
        let bonus = bonus_for_order(order_total);

        self.cart.clear();
        self.points.award(bonus);
        self.notifications
            .push(notification::order_confirmed(bonus, now));

        bonus
    }

    /// [`begin_checkout`](Self::begin_checkout) followed by
    /// [`complete_purchase`](Self::complete_purchase).
    pub fn checkout(&mut self, now: DateTime<Utc>) -> CoreResult<CheckoutReceipt> {
        let summary = self.begin_checkout()?;
        let bonus_points = self.complete_purchase(summary.totals.total, now);
        Ok(CheckoutReceipt {
            summary,
            bonus_points,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn coupons(&self) -> &CouponBook {
        &self.coupons
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn active_coupon(&self) -> Option<&Coupon> {
        self.active_coupon.as_ref()
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn viewed(&self) -> &RecentlyViewed {
        &self.viewed
    }

    pub fn compare(&self) -> &CompareList {
        &self.compare
    }

    pub fn points(&self) -> LoyaltyPoints {
        self.points
    }

    pub fn notifications(&self) -> &NotificationFeed {
        &self.notifications
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn shop() -> Shop {
        Shop::restore(
            Catalog::sample(),
            CouponBook::default_coupons(),
            PersistedState::default(),
            Utc::now(),
        )
    }

    fn session() -> UserSession {
        UserSession {
            user_id: "u1".to_string(),
            email: "ana@kaza.com.br".to_string(),
            full_name: "Ana".to_string(),
        }
    }

    fn hundred_real_catalog() -> Catalog {
        let mut item = Catalog::sample().items()[0].clone();
        item.id = "A".to_string();
        item.price_cents = 10000;
        Catalog::new(vec![item]).unwrap()
    }

    #[test]
    fn test_add_item_awards_points_and_records_view() {
        let mut shop = shop();
        let outcome = shop.add_item("1").unwrap();
        assert_eq!(outcome.quantity, 1);
        assert_eq!(outcome.points_awarded, 29);
        assert_eq!(shop.points().value(), 29);
        assert_eq!(shop.viewed().ids(), &["1"]);
    }

    #[test]
    fn test_add_unknown_item() {
        let mut shop = shop();
        assert!(matches!(
            shop.add_item("404"),
            Err(CoreError::ItemNotFound(_))
        ));
        assert_eq!(shop.points().value(), 0);
        assert!(shop.viewed().is_empty());
    }

    #[test]
    fn test_frete50_example() {
        let mut shop = Shop::new(hundred_real_catalog(), CouponBook::default_coupons());
        shop.add_item("A").unwrap();
        shop.add_item("A").unwrap();

        shop.apply_coupon("FRETE50", today(), Utc::now()).unwrap();
        let totals = shop.totals();

        assert_eq!(totals.subtotal.cents(), 20000);
        assert_eq!(totals.discount.cents(), 5000);
        assert_eq!(totals.shipping.cents(), 1500);
        assert_eq!(totals.total.cents(), 16500);
    }

    #[test]
    fn test_apply_coupon_replaces_and_notifies() {
        let mut shop = shop();
        shop.add_item("4").unwrap(); // R$ 449,00
        let before = shop.notifications().len();

        shop.apply_coupon("BEMVINDO15", today(), Utc::now()).unwrap();
        shop.apply_coupon("PREMIUM20", today(), Utc::now()).unwrap();

        assert_eq!(shop.active_coupon().unwrap().code, "PREMIUM20");
        assert_eq!(shop.notifications().len(), before + 2);
        assert_eq!(shop.notifications().items()[0].kind, NotificationKind::Offer);
        assert_eq!(shop.totals().discount.cents(), 8980);
    }

    #[test]
    fn test_rejected_coupon_leaves_state() {
        let mut shop = shop();
        shop.add_item("10").unwrap(); // R$ 69,00
        let before = shop.notifications().len();

        assert!(matches!(
            shop.apply_coupon("BEMVINDO15", today(), Utc::now()),
            Err(CoreError::InvalidCoupon { .. })
        ));
        assert!(matches!(
            shop.apply_coupon("bemvindo15", today(), Utc::now()),
            Err(CoreError::CouponNotFound(_))
        ));
        assert!(shop.active_coupon().is_none());
        assert_eq!(shop.notifications().len(), before);
    }

    #[test]
    fn test_reseller_subtotal_decides_coupon_minimum() {
        let mut shop = shop();
        shop.add_item("6").unwrap(); // R$ 219,00, reseller 175,20
        shop.confirm_upgrade(Utc::now()).unwrap();

        assert!(matches!(
            shop.apply_coupon("FRETE50", today(), Utc::now()),
            Err(CoreError::InvalidCoupon { .. })
        ));
    }

    #[test]
    fn test_welcome_feed_seeded_only_when_absent() {
        let shop = shop();
        assert_eq!(shop.unread_count(), 2);

        let persisted = PersistedState {
            notifications: Some(NotificationFeed::default()),
            ..Default::default()
        };
        let shop = Shop::restore(
            Catalog::sample(),
            CouponBook::default_coupons(),
            persisted,
            Utc::now(),
        );
        assert!(shop.notifications().is_empty());
    }

    #[test]
    fn test_restore_drops_unknown_ids() {
        let mut persisted = PersistedState::default();
        persisted.favorites.toggle("1");
        persisted.favorites.toggle("gone");
        persisted.viewed.record("gone");
        persisted.viewed.record("2");
        persisted.viewed.record("3");
        persisted.points = LoyaltyPoints::new(50);
        persisted.reseller = true;

        let shop = Shop::restore(
            Catalog::sample(),
            CouponBook::default_coupons(),
            persisted,
            Utc::now(),
        );
        assert_eq!(shop.favorites().ids(), &["1"]);
        assert_eq!(shop.viewed().ids(), &["3", "2"]);
        assert_eq!(shop.points().value(), 50);
        assert_eq!(shop.status(), SubscriptionStatus::Reseller);
    }

    #[test]
    fn test_persisted_round_trip() {
        let mut shop = shop();
        shop.sign_in(session(), false);
        shop.toggle_favorite("7").unwrap();
        shop.add_item("8").unwrap();

        let restored = Shop::restore(
            Catalog::sample(),
            CouponBook::default_coupons(),
            shop.persisted(),
            Utc::now(),
        );
        assert_eq!(restored.favorites(), shop.favorites());
        assert_eq!(restored.viewed(), shop.viewed());
        assert_eq!(restored.points(), shop.points());
        assert_eq!(restored.notifications(), shop.notifications());
        assert_eq!(restored.session(), shop.session());
        // cart is not persisted
        assert!(restored.cart().is_empty());
    }

    #[test]
    fn test_lists_require_known_items() {
        let mut shop = shop();
        assert!(shop.toggle_favorite("99").is_err());
        assert!(shop.toggle_compare("99").is_err());
        assert!(shop.record_viewed("99").is_err());

        assert!(shop.toggle_compare("1").unwrap());
        shop.record_viewed("2").unwrap();
        shop.clear_viewed();
        assert!(shop.viewed().is_empty());
    }

    #[test]
    fn test_checkout_requires_session_and_items() {
        let mut shop = shop();
        shop.add_item("1").unwrap();
        assert!(matches!(
            shop.checkout(Utc::now()),
            Err(CoreError::NotAuthenticated)
        ));

        shop.clear_cart();
        shop.sign_in(session(), false);
        assert!(matches!(shop.checkout(Utc::now()), Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_checkout_awards_bonus_and_clears_cart() {
        let mut shop = Shop::new(hundred_real_catalog(), CouponBook::default_coupons());
        shop.sign_in(session(), false);
        shop.add_item("A").unwrap();
        shop.add_item("A").unwrap();
        shop.apply_coupon("FRETE50", today(), Utc::now()).unwrap();
        let points_before = shop.points().value();

        let receipt = shop.checkout(Utc::now()).unwrap();

        assert_eq!(receipt.summary.totals.total.cents(), 16500);
        assert_eq!(receipt.summary.user_id, "u1");
        assert_eq!(receipt.summary.lines.len(), 1);
        assert_eq!(receipt.bonus_points, 33);
        assert_eq!(shop.points().value(), points_before + 33);
        assert!(shop.cart().is_empty());

        let latest = &shop.notifications().items()[0];
        assert_eq!(latest.kind, NotificationKind::Order);
        assert!(latest.message.contains("33"));
    }

    #[test]
    fn test_upgrade_flow() {
        let mut shop = shop();
        assert!(shop.start_upgrade().is_ok());

        shop.confirm_upgrade(Utc::now()).unwrap();
        assert_eq!(shop.status(), SubscriptionStatus::Reseller);
        assert_eq!(shop.notifications().items()[0].kind, NotificationKind::System);

        assert!(matches!(
            shop.start_upgrade(),
            Err(CoreError::InvalidSubscriptionTransition { .. })
        ));
        let len = shop.notifications().len();
        assert!(shop.confirm_upgrade(Utc::now()).is_err());
        assert_eq!(shop.notifications().len(), len);
    }

    #[test]
    fn test_reseller_price_for() {
        let mut shop = shop();
        let item = shop.catalog().get("1").unwrap().clone();
        assert_eq!(shop.price_for(&item).cents(), 29900);
        shop.confirm_upgrade(Utc::now()).unwrap();
        assert_eq!(shop.price_for(&item).cents(), 23920);
        // stored price untouched
        assert_eq!(shop.catalog().get("1").unwrap().price_cents, 29900);
    }

    #[test]
    fn test_sign_out_keeps_favorites() {
        let mut shop = shop();
        shop.sign_in(session(), false);
        shop.toggle_favorite("3").unwrap();
        shop.add_item("3").unwrap();
        shop.confirm_upgrade(Utc::now()).unwrap();
        let points = shop.points();

        let signed_out = shop.sign_out();

        assert_eq!(signed_out.unwrap().user_id, "u1");
        assert!(!shop.is_authenticated());
        assert!(shop.cart().is_empty());
        assert_eq!(shop.status(), SubscriptionStatus::Free);
        assert!(shop.favorites().contains("3"));
        assert_eq!(shop.points(), points);
        assert_eq!(shop.viewed().ids(), &["3"]);
    }

    #[test]
    fn test_set_quantity_and_remove_through_shop() {
        let mut shop = shop();
        shop.add_item("2").unwrap();
        shop.set_quantity("2", 3).unwrap();
        assert_eq!(shop.totals().total_quantity, 3);

        assert!(matches!(
            shop.remove_item("5"),
            Err(CoreError::LineNotFound(_))
        ));
        shop.remove_item("2").unwrap();
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_mark_notifications() {
        let mut shop = shop();
        shop.mark_notification_read("1").unwrap();
        assert_eq!(shop.unread_count(), 1);
        assert_eq!(shop.mark_all_notifications_read(), 1);
        assert!(shop.mark_notification_read("nope").is_err());
    }

    #[test]
    fn test_sign_in_restores_reseller_from_profile() {
        let mut shop = shop();
        shop.sign_in(session(), false);
        shop.confirm_upgrade(Utc::now()).unwrap();
        shop.sign_out();
        assert_eq!(shop.status(), SubscriptionStatus::Free);

        shop.sign_in(session(), true);
        assert_eq!(shop.status(), SubscriptionStatus::Reseller);
        assert!(matches!(
            shop.start_upgrade(),
            Err(CoreError::InvalidSubscriptionTransition { .. })
        ));
    }

    #[test]
    fn test_sign_in_keeps_local_upgrade() {
        let mut shop = shop();
        shop.confirm_upgrade(Utc::now()).unwrap();

        shop.sign_in(session(), false);
        assert_eq!(shop.status(), SubscriptionStatus::Reseller);
    }
}
