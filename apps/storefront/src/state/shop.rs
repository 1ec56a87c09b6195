//! # Shop State
//!
//! Shares the single [`Shop`] between commands and the subscription task.
//!
//! ## Thread Safety
//! The shop sits behind `Arc<Mutex<Shop>>`. Every closure passed to
//! [`ShopState::with_shop_mut`] is synchronous, so the lock is never held
//! across an `.await`.

use kaza_core::Shop;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct ShopState {
    shop: Arc<Mutex<Shop>>,
}

impl ShopState {
    pub fn new(shop: Shop) -> Self {
        ShopState {
            shop: Arc::new(Mutex::new(shop)),
        }
    }

    /// Executes a function with read access to the shop.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = shop_state.with_shop(|shop| shop.totals());
    /// ```
    pub fn with_shop<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Shop) -> R,
    {
        let shop = self.lock();
        f(&shop)
    }

    /// Executes a function with write access to the shop.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// shop_state.with_shop_mut(|shop| shop.add_item("7"))?;
    /// ```
    pub fn with_shop_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Shop) -> R,
    {
        let mut shop = self.lock();
        f(&mut shop)
    }

    // A panic inside a closure leaves the shop in a state every method
    // already accepts, so a poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, Shop> {
        self.shop.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaza_core::coupon::CouponBook;
    use kaza_core::Catalog;

    fn state() -> ShopState {
        ShopState::new(Shop::new(Catalog::sample(), CouponBook::default_coupons()))
    }

    #[test]
    fn test_mutations_are_shared_between_clones() {
        let a = state();
        let b = a.clone();

        a.with_shop_mut(|shop| shop.add_item("1")).unwrap();

        assert_eq!(b.with_shop(|shop| shop.cart().total_quantity()), 1);
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let shop = state();
        let clone = shop.clone();

        let result = std::thread::spawn(move || {
            clone.with_shop_mut(|_| panic!("boom"));
        })
        .join();
        assert!(result.is_err());

        assert!(shop.with_shop_mut(|s| s.add_item("2")).is_ok());
    }
}
