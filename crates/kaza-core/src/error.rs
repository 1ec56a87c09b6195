//! # Error Types
//!
//! Domain-specific error types for kaza-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kaza-core errors (this file)                                          │
//! │  ├── CoreError        - Storefront rule violations                      │
//! │  │   ├── *NotFound       (unknown item, cart line, coupon, notification)│
//! │  │   └── InvalidCoupon   (expired / below minimum subtotal)             │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  kaza-db errors (separate crate)                                       │
//! │  └── DbError          - Database / local store failures                 │
//! │                                                                         │
//! │  Storefront shell errors                                               │
//! │  └── ApiError         - What the SPA sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal: every error leaves the `Shop` unchanged.

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;
use crate::types::SubscriptionStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Storefront business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item id is not in the catalog.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Item is in the catalog but has no line in the cart.
    ///
    /// ## When This Occurs
    /// - `set_quantity` / `remove_item` for an item never added
    /// - A stale UI sending a second remove for the same line
    #[error("Item {0} is not in the cart")]
    LineNotFound(String),

    /// Coupon code is not in the coupon book (exact match).
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// Coupon exists but cannot be applied right now.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart subtotal: R$ 150,00
    ///      │
    ///      ▼
    /// apply_coupon("FRETE50")   (minimum R$ 200,00)
    ///      │
    ///      ▼
    /// InvalidCoupon { code: "FRETE50", reason: BelowMinimum { .. } }
    ///      │
    ///      ▼
    /// UI shows: "Cupom FRETE50 requires a subtotal of at least R$ 200,00"
    /// ```
    #[error("Coupon {code} cannot be applied: {reason}")]
    InvalidCoupon {
        code: String,
        reason: CouponRejection,
    },

    /// Notification id is not in the feed.
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// Checkout attempted with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Operation requires a signed-in user.
    #[error("Sign in required")]
    NotAuthenticated,

    /// Subscription state machine rejected the transition.
    #[error("Cannot change subscription from {from} to {to}")]
    InvalidSubscriptionTransition {
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    },

    /// Two catalog items share an id.
    #[error("Duplicate item id in catalog: {0}")]
    DuplicateItem(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Why a known coupon was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponRejection {
    /// `today` is after the coupon's last valid day.
    Expired { expires_on: NaiveDate },

    /// Cart subtotal is below the coupon's minimum.
    BelowMinimum { minimum: Money, subtotal: Money },
}

impl std::fmt::Display for CouponRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouponRejection::Expired { expires_on } => {
                write!(f, "expired on {}", expires_on)
            }
            CouponRejection::BelowMinimum { minimum, subtotal } => write!(
                f,
                "requires a subtotal of at least {} (current {})",
                minimum, subtotal
            ),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business rule runs, so they never leave partial state.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email or coupon code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
