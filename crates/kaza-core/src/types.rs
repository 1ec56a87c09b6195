//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    CartLine     │   │     Coupon      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  item_id (FK)   │   │  code (unique)  │       │
//! │  │  name           │   │  name snapshot  │   │  kind           │       │
//! │  │  price_cents    │   │  unit_price     │   │  magnitude      │       │
//! │  │  category       │   │  quantity ≥ 1   │   │  min_subtotal   │       │
//! │  └─────────────────┘   └─────────────────┘   │  expires_on     │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Notification   │   │  UserProfile    │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  kind           │   │  email          │   │  user_id        │       │
//! │  │  read           │   │  is_reseller    │   │  product_id     │       │
//! │  │  created_at     │   └─────────────────┘   │  status         │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog, user, order and review types double as database rows when the
//! `sqlx` feature is on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A catalog product available for purchase. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    pub description: String,

    /// Unit price in centavos.
    pub price_cents: i64,

    /// Price before markdown, shown struck through.
    pub original_price_cents: Option<i64>,

    pub image_url: String,

    /// Catalog category ("Cama", "Mesa", "Banho", ...).
    pub category: String,

    /// Advertised markdown percentage (0-100).
    pub discount_percentage: u32,

    /// Average rating (0.0-5.0), absent for unrated items.
    pub rating: Option<f64>,

    pub reviews_count: u32,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the original (pre-markdown) price, if any.
    #[inline]
    pub fn original_price(&self) -> Option<Money> {
        self.original_price_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// Quantity of one item held for purchase.
///
/// Uses the snapshot pattern: name and unit price are frozen when the line is
/// created so the cart subtotal can be maintained incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Catalog id of the item.
    pub item_id: String,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Base unit price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Always ≥ 1. A line that would reach 0 is removed instead.
    pub quantity: u32,
}

impl CartLine {
    /// Creates a line with quantity 1 from a catalog item.
    pub fn from_item(item: &Item) -> Self {
        CartLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price_cents: item.price_cents,
            quantity: 1,
        }
    }

    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// How a coupon's magnitude is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `magnitude` is a percent of the subtotal (15 = 15%).
    Percentage,
    /// `magnitude` is an amount in centavos.
    Fixed,
}

/// A named discount rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coupon {
    pub id: String,

    /// Code typed or clicked by the customer. Matched exactly.
    pub code: String,

    pub kind: DiscountKind,

    /// Percent for `Percentage`, centavos for `Fixed`.
    pub magnitude: i64,

    /// Minimum qualifying subtotal in centavos.
    pub min_subtotal_cents: i64,

    /// Last day the coupon can be applied.
    #[ts(as = "String")]
    pub expires_on: NaiveDate,

    pub description: String,
}

// =============================================================================
// Notification
// =============================================================================

/// Category of a notification, drives the badge colour in the SPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Offer,
    Order,
    System,
}

/// An entry in the notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Subscription Status
// =============================================================================

/// Subscription tier of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Regular customer, catalog prices.
    #[default]
    Free,
    /// Premium reseller, 20% off every unit price.
    Reseller,
}

impl SubscriptionStatus {
    /// Returns true if reseller pricing applies.
    #[inline]
    pub fn is_reseller(&self) -> bool {
        matches!(self, SubscriptionStatus::Reseller)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Free => write!(f, "free"),
            SubscriptionStatus::Reseller => write!(f, "reseller"),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// The signed-in user, persisted under the auth key of the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserSession {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
}

// =============================================================================
// Backing Store Rows
// =============================================================================

/// A customer profile in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub is_reseller: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The session view of this profile.
    pub fn session(&self) -> UserSession {
        UserSession {
            user_id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Lifecycle of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// One purchased line in the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
    /// Amount charged for this line in centavos.
    pub total_amount_cents: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the line amount as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// A customer review in the `reviews` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    /// Stars, 1-5.
    pub rating: u8,
    pub comment: String,
    pub has_photo: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
