//! # kaza-core: Pure Storefront Logic for Kaza Tem
//!
//! This crate holds every storefront rule as plain data and pure functions.
//! Nothing here touches a database, a file or a clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kaza Storefront Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (SPA)                               │   │
//! │  │    Catalog ──► Product ──► Cart ──► Checkout ──► Notifications  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ command surface                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  kaza-storefront (AppState)                     │   │
//! │  │    add_to_cart, apply_coupon, checkout, start_upgrade, etc.     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kaza-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │ catalog │ │  cart   │ │ pricing │ │ coupon  │ │  lists  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │   ┌─────────┐ ┌──────────────┐ ┌──────────────┐ ┌─────────┐    │   │
//! │  │   │ loyalty │ │ notification │ │ subscription │ │  shop   │    │   │
//! │  │   └─────────┘ └──────────────┘ └──────────────┘ └─────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kaza-db (Database Layer)                     │   │
//! │  │        products, users, orders, reviews, local key-value store  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, CartLine, Coupon, Notification, ...)
//! - [`money`] - Integer centavo arithmetic with BRL formatting
//! - [`catalog`] - Ordered, immutable item catalog with filtering
//! - [`cart`] - Cart lines with an incrementally maintained subtotal
//! - [`pricing`] - Reseller pricing, shipping and final totals
//! - [`coupon`] - Coupon eligibility and the coupon book
//! - [`lists`] - Favorites, recently viewed, compare
//! - [`loyalty`] - Point accrual
//! - [`notification`] - Newest-first notification feed
//! - [`subscription`] - Free / reseller state machine and plans
//! - [`shop`] - The aggregate state object the shell drives
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kaza_core::coupon::CouponBook;
//! use kaza_core::shop::Shop;
//! use kaza_core::{Catalog, Money};
//!
//! let catalog = Catalog::sample();
//! let mut shop = Shop::new(catalog, CouponBook::default_coupons());
//!
//! shop.add_item("1").unwrap(); // R$ 299,00
//! let totals = shop.totals();
//! assert_eq!(totals.subtotal, Money::from_cents(29900));
//! assert!(totals.shipping.is_zero()); // above R$ 200,00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod error;
pub mod lists;
pub mod loyalty;
pub mod money;
pub mod notification;
pub mod pricing;
pub mod shop;
pub mod subscription;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use catalog::{Catalog, CatalogQuery, SortOrder};
pub use error::{CoreError, CoreResult, CouponRejection, ValidationError};
pub use money::Money;
pub use pricing::{CartTotals, PricingPolicy};
pub use shop::Shop;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches fat-finger input (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Recently viewed list keeps this many ids.
pub const MAX_VIEWED: usize = 10;

/// Compare list holds at most this many ids.
pub const MAX_COMPARE: usize = 3;
