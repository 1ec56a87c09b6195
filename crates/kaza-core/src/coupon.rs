//! # Coupons
//!
//! Coupon math and the book of codes the store accepts.
//!
//! ## Apply Flow
//! ```text
//! code ──► CouponBook::find ──► CouponNotFound
//!               │
//!               ▼
//!      check_eligibility(subtotal, today)
//!               │
//!      ┌────────┼──────────────┐
//!      ▼        ▼              ▼
//!   Expired  BelowMinimum     Ok ──► becomes the active coupon
//! ```
//!
//! Eligibility is checked when the coupon is applied. A coupon that is
//! already active keeps discounting if the cart later shrinks below the
//! minimum; the discount itself is always capped at the subtotal.

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult, CouponRejection, ValidationError};
use crate::money::Money;
use crate::types::{Coupon, DiscountKind};
use crate::validation::validate_coupon_code;

// =============================================================================
// Coupon Rules
// =============================================================================

impl Coupon {
    /// Minimum qualifying subtotal as Money.
    #[inline]
    pub fn min_subtotal(&self) -> Money {
        Money::from_cents(self.min_subtotal_cents)
    }

    /// Discount this coupon gives on `subtotal`.
    ///
    /// - Percentage: subtotal × magnitude / 100, rounded half-up
    /// - Fixed: magnitude, capped at the subtotal
    ///
    /// Never negative and never larger than the subtotal.
    pub fn discount_for(&self, subtotal: Money) -> Money {
        if !subtotal.is_positive() {
            return Money::zero();
        }

        let discount = match self.kind {
            DiscountKind::Percentage => {
                let percent = self.magnitude.clamp(0, 100) as u32;
                subtotal.percentage(percent)
            }
            DiscountKind::Fixed => Money::from_cents(self.magnitude).floor_zero(),
        };

        discount.min(subtotal)
    }

    /// Checks whether the coupon can be applied on `today` to `subtotal`.
    ///
    /// The expiry date itself is still valid.
    pub fn check_eligibility(
        &self,
        subtotal: Money,
        today: NaiveDate,
    ) -> Result<(), CouponRejection> {
        if today > self.expires_on {
            return Err(CouponRejection::Expired {
                expires_on: self.expires_on,
            });
        }

        if subtotal < self.min_subtotal() {
            return Err(CouponRejection::BelowMinimum {
                minimum: self.min_subtotal(),
                subtotal,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Coupon Book
// =============================================================================

/// The set of coupons the store accepts, keyed by exact code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    /// Builds a book, rejecting malformed or duplicate codes.
    pub fn new(coupons: Vec<Coupon>) -> CoreResult<Self> {
        for (i, coupon) in coupons.iter().enumerate() {
            validate_coupon_code(&coupon.code)?;
            if coupons[..i].iter().any(|c| c.code == coupon.code) {
                return Err(ValidationError::InvalidFormat {
                    field: "code".to_string(),
                    reason: format!("duplicate coupon code {}", coupon.code),
                }
                .into());
            }
        }
        Ok(CouponBook { coupons })
    }

    /// The launch coupons: BEMVINDO15, FRETE50 and PREMIUM20.
    pub fn default_coupons() -> Self {
        let expires_on = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap_or(NaiveDate::MAX);

        CouponBook {
            coupons: vec![
                Coupon {
                    id: "1".to_string(),
                    code: "BEMVINDO15".to_string(),
                    kind: DiscountKind::Percentage,
                    magnitude: 15,
                    min_subtotal_cents: 10000,
                    expires_on,
                    description: "15% OFF na primeira compra".to_string(),
                },
                Coupon {
                    id: "2".to_string(),
                    code: "FRETE50".to_string(),
                    kind: DiscountKind::Fixed,
                    magnitude: 5000,
                    min_subtotal_cents: 20000,
                    expires_on,
                    description: "R$ 50 OFF no frete".to_string(),
                },
                Coupon {
                    id: "3".to_string(),
                    code: "PREMIUM20".to_string(),
                    kind: DiscountKind::Percentage,
                    magnitude: 20,
                    min_subtotal_cents: 30000,
                    expires_on,
                    description: "20% OFF para revendedores".to_string(),
                },
            ],
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, code: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.code == code)
    }

    /// Lookup failing with `CouponNotFound`.
    pub fn find(&self, code: &str) -> CoreResult<&Coupon> {
        self.get(code)
            .ok_or_else(|| CoreError::CouponNotFound(code.to_string()))
    }

    /// Finds a coupon and checks it against the cart.
    pub fn resolve(&self, code: &str, subtotal: Money, today: NaiveDate) -> CoreResult<&Coupon> {
        let coupon = self.find(code)?;
        coupon
            .check_eligibility(subtotal, today)
            .map_err(|reason| CoreError::InvalidCoupon {
                code: code.to_string(),
                reason,
            })?;
        Ok(coupon)
    }

    /// Every coupon, in book order.
    pub fn all(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Coupons still valid on `today`, for the "available coupons" panel.
    pub fn available_on(&self, today: NaiveDate) -> Vec<&Coupon> {
        self.coupons
            .iter()
            .filter(|c| today <= c.expires_on)
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn test_percentage_discount() {
        let book = CouponBook::default_coupons();
        let coupon = book.get("BEMVINDO15").unwrap();
        assert_eq!(coupon.discount_for(Money::from_cents(10000)).cents(), 1500);
        // 15% of R$ 0,10 rounds half-up to 0,02
        assert_eq!(coupon.discount_for(Money::from_cents(10)).cents(), 2);
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let book = CouponBook::default_coupons();
        let coupon = book.get("FRETE50").unwrap();
        assert_eq!(coupon.discount_for(Money::from_cents(20000)).cents(), 5000);
        assert_eq!(coupon.discount_for(Money::from_cents(3000)).cents(), 3000);
        assert_eq!(coupon.discount_for(Money::zero()), Money::zero());
    }

    #[test]
    fn test_lookup_is_exact() {
        let book = CouponBook::default_coupons();
        assert!(book.get("FRETE50").is_some());
        assert!(book.get("frete50").is_none());
        assert!(matches!(
            book.find("NATAL10"),
            Err(CoreError::CouponNotFound(code)) if code == "NATAL10"
        ));
    }

    #[test]
    fn test_below_minimum_rejected() {
        let book = CouponBook::default_coupons();
        let err = book
            .resolve("FRETE50", Money::from_cents(19999), today())
            .unwrap_err();
        match err {
            CoreError::InvalidCoupon { code, reason } => {
                assert_eq!(code, "FRETE50");
                assert_eq!(
                    reason,
                    CouponRejection::BelowMinimum {
                        minimum: Money::from_cents(20000),
                        subtotal: Money::from_cents(19999),
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // the minimum itself qualifies
        assert!(book
            .resolve("FRETE50", Money::from_cents(20000), today())
            .is_ok());
    }

    #[test]
    fn test_expiry_boundary() {
        let book = CouponBook::default_coupons();
        let last_day = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
        let after = NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();

        assert!(book
            .resolve("BEMVINDO15", Money::from_cents(50000), last_day)
            .is_ok());
        assert!(matches!(
            book.resolve("BEMVINDO15", Money::from_cents(50000), after),
            Err(CoreError::InvalidCoupon {
                reason: CouponRejection::Expired { .. },
                ..
            })
        ));
        assert!(book.available_on(after).is_empty());
        assert_eq!(book.available_on(last_day).len(), 3);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let mut coupons = CouponBook::default_coupons().all().to_vec();
        coupons[1].code = "BEMVINDO15".to_string();
        assert!(matches!(
            CouponBook::new(coupons),
            Err(CoreError::Validation(_))
        ));
    }
}
