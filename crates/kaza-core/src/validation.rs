//! # Validation Module
//!
//! Input validation for values that arrive from the frontend or the seed data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (SPA)                                               │
//! │  └── Immediate feedback on empty fields                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command / Shop (Rust)                                        │
//! │  └── THIS MODULE: quantities, codes, emails, catalog items             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL, UNIQUE, CHECK constraints                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kaza_core::validation::{validate_coupon_code, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_coupon_code("BEMVINDO15").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::Item;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a coupon code as typed by the customer.
///
/// ## Rules
/// - Must not be empty
/// - At most 32 characters
/// - Letters and digits only
///
/// Case is NOT normalized: codes are matched exactly.
///
/// ## Example
/// ```rust
/// use kaza_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("FRETE50").is_ok());
/// assert!(validate_coupon_code("").is_err());
/// assert!(validate_coupon_code("FRETE 50").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 32,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only a structural check (one `@`, non-empty local part, dotted domain).
/// The auth provider owns real verification.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain.tld".to_string(),
        });
    }

    Ok(())
}

/// Validates a search term.
///
/// ## Returns
/// The trimmed term. Empty is allowed and means "no filter".
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(term.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - 0 is accepted (it means "remove the line")
/// - At most [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates a price in centavos. Free items are not sold.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a review star rating.
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a catalog item before it enters the catalog.
pub fn validate_item(item: &Item) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    validate_item_name(&item.name)?;
    validate_price_cents(item.price_cents)?;

    if item.discount_percentage > 100 {
        return Err(ValidationError::OutOfRange {
            field: "discount_percentage".to_string(),
            min: 0,
            max: 100,
        });
    }

    if let Some(rating) = item.rating {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ValidationError::OutOfRange {
                field: "rating".to_string(),
                min: 0,
                max: 5,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("PREMIUM20").is_ok());
        assert!(validate_coupon_code("bemvindo15").is_ok());
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("A-B").is_err());
        assert!(validate_coupon_code(&"A".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@kaza.com.br").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@kaza.com").is_err());
        assert!(validate_email("ana@kaza").is_err());
        assert!(validate_email("ana@@kaza.com").is_err());
    }

    #[test]
    fn test_validate_search_term_trims() {
        assert_eq!(validate_search_term("  toalha ").unwrap(), "toalha");
        assert!(validate_search_term(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_item() {
        let mut item = Item {
            id: "1".to_string(),
            name: "Toalha de Banho".to_string(),
            description: String::new(),
            price_cents: 8900,
            original_price_cents: None,
            image_url: String::new(),
            category: "Banho".to_string(),
            discount_percentage: 0,
            rating: Some(4.5),
            reviews_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(validate_item(&item).is_ok());

        item.price_cents = 0;
        assert!(validate_item(&item).is_err());

        item.price_cents = 8900;
        item.discount_percentage = 101;
        assert!(validate_item(&item).is_err());

        item.discount_percentage = 10;
        item.rating = Some(5.5);
        assert!(validate_item(&item).is_err());
    }
}
