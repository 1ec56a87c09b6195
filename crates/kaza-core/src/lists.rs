//! # Item Lists
//!
//! Small ordered id lists kept alongside the cart.
//!
//! ```text
//! ┌──────────────────┬──────────┬──────────────────────────────────────────┐
//! │ List             │ Capacity │ Behaviour                                │
//! ├──────────────────┼──────────┼──────────────────────────────────────────┤
//! │ Favorites        │ none     │ toggle, appended in order added          │
//! │ RecentlyViewed   │ 10       │ move-to-front, oldest falls off the end  │
//! │ CompareList      │ 3        │ toggle, newest first, 4th evicts oldest  │
//! └──────────────────┴──────────┴──────────────────────────────────────────┘
//! ```
//!
//! All three serialize as a plain JSON array of ids.

use serde::{Deserialize, Serialize};

use crate::{MAX_COMPARE, MAX_VIEWED};

// =============================================================================
// Favorites
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    /// Adds the id if absent, removes it if present.
    ///
    /// ## Returns
    /// `true` if the id is a favorite after the call.
    pub fn toggle(&mut self, item_id: &str) -> bool {
        if let Some(position) = self.0.iter().position(|id| id == item_id) {
            self.0.remove(position);
            false
        } else {
            self.0.push(item_id.to_string());
            true
        }
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.0.iter().any(|id| id == item_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Recently Viewed
// =============================================================================

/// Most recently viewed first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentlyViewed(Vec<String>);

impl RecentlyViewed {
    /// Moves `item_id` to the front, dropping anything past [`MAX_VIEWED`].
    pub fn record(&mut self, item_id: &str) {
        self.0.retain(|id| id != item_id);
        self.0.insert(0, item_id.to_string());
        self.0.truncate(MAX_VIEWED);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reapplies the cap, for lists restored from storage.
    pub(crate) fn normalize(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.0.len());
        self.0.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
        self.0.truncate(MAX_VIEWED);
    }
}

// =============================================================================
// Compare
// =============================================================================

/// Side-by-side comparison, newest first, at most [`MAX_COMPARE`] ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompareList(Vec<String>);

impl CompareList {
    /// Removes a member, or prepends a new one evicting the oldest when full.
    ///
    /// ## Returns
    /// `true` if the id is being compared after the call.
    pub fn toggle(&mut self, item_id: &str) -> bool {
        if let Some(position) = self.0.iter().position(|id| id == item_id) {
            self.0.remove(position);
            return false;
        }

        self.0.insert(0, item_id.to_string());
        self.0.truncate(MAX_COMPARE);
        true
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.0.iter().any(|id| id == item_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
