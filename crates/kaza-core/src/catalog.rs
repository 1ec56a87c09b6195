//! # Catalog
//!
//! The ordered, immutable set of items the storefront sells.
//!
//! ## Query Pipeline
//! ```text
//! items (catalog order)
//!   │
//!   ├── category filter      None = all categories
//!   ├── search filter        case-insensitive, name / description / category
//!   ├── price range filter   inclusive on both ends
//!   │
//!   └── sort                 relevance (catalog order), price ↑, price ↓,
//!                            rating ↓, newest first
//! ```
//!
//! Sorting is stable, so ties keep catalog order.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Item;
use crate::validation::validate_item;

// =============================================================================
// Query
// =============================================================================

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
}

/// Filter and sort options for [`Catalog::query`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogQuery {
    /// Exact category name, `None` for all.
    pub category: Option<String>,
    /// Free-text search term. Empty matches everything.
    pub search: String,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    fn matches(&self, item: &Item, needle: &str) -> bool {
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }

        if !needle.is_empty() {
            let hit = item.name.to_lowercase().contains(needle)
                || item.description.to_lowercase().contains(needle)
                || item.category.to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }

        let price = item.price();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        true
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered item catalog with an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, preserving the given order.
    ///
    /// ## Errors
    /// - `DuplicateItem` if two items share an id
    /// - `Validation` if an item fails [`validate_item`]
    pub fn new(items: Vec<Item>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            validate_item(item)?;
            if index.insert(item.id.clone(), position).is_some() {
                return Err(CoreError::DuplicateItem(item.id.clone()));
            }
        }

        Ok(Catalog { items, index })
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    /// Looks up an item by id, failing with `ItemNotFound`.
    pub fn require(&self, id: &str) -> CoreResult<&Item> {
        self.get(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All items in catalog order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category) {
                seen.push(item.category.clone());
            }
        }
        seen
    }

    /// Filters and sorts the catalog.
    ///
    /// ## Example
    /// ```rust
    /// use kaza_core::{Catalog, CatalogQuery, SortOrder};
    ///
    /// let catalog = Catalog::sample();
    /// let query = CatalogQuery {
    ///     category: Some("Banho".to_string()),
    ///     sort: SortOrder::PriceLow,
    ///     ..Default::default()
    /// };
    /// let names: Vec<_> = catalog.query(&query).iter().map(|i| i.id.as_str()).collect();
    /// assert_eq!(names, vec!["9", "3"]);
    /// ```
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Item> {
        let needle = query.search.trim().to_lowercase();

        let mut results: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| query.matches(item, &needle))
            .collect();

        match query.sort {
            SortOrder::Relevance => {}
            SortOrder::PriceLow => results.sort_by_key(|item| item.price_cents),
            SortOrder::PriceHigh => {
                results.sort_by(|a, b| b.price_cents.cmp(&a.price_cents))
            }
            SortOrder::Rating => results.sort_by(|a, b| {
                let a = a.rating.unwrap_or(0.0);
                let b = b.rating.unwrap_or(0.0);
                b.partial_cmp(&a).unwrap_or(Ordering::Equal)
            }),
            SortOrder::Newest => results.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        results
    }

    /// The twelve-item launch catalog.
    ///
    /// Used by the `seed` binary and as the fallback when the backing store
    /// has no products. Items are dated one day apart so "newest" has a
    /// defined order (item 12 is newest).
    pub fn sample() -> Self {
        let items = sample_items();
        let index = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.id.clone(), position))
            .collect();
        Catalog { items, index }
    }
}

/// (id, name, description, price, original price, image, category, markdown %, rating, reviews)
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    i64,
    i64,
    &'static str,
    &'static str,
    u32,
    f64,
    u32,
);

const SAMPLE_ROWS: [SampleRow; 12] = [
    ("1", "Jogo de Cama Casal Premium", "Jogo de cama 100% algodão com 4 peças", 29900, 39900, "photo-1586023492125-27b2c045efd7", "Cama", 25, 4.8, 124),
    ("2", "Toalha de Mesa Bordada", "Toalha de mesa com bordado artesanal", 18900, 24900, "photo-1578662996442-48f60103fc96", "Mesa", 24, 4.6, 89),
    ("3", "Kit Toalhas de Banho Luxo", "Kit com 4 toalhas de banho premium", 15900, 19900, "photo-1584622650111-993a426fbf0a", "Banho", 20, 4.7, 156),
    ("4", "Edredom King Size Premium", "Edredom king size com enchimento de fibra", 44900, 59900, "photo-1555041469-a586c61ea9bc", "Cama", 25, 4.9, 203),
    ("5", "Conjunto de Pratos Porcelana", "Conjunto de pratos em porcelana fina", 32900, 42900, "photo-1578749556568-bc2c40e68b61", "Mesa", 23, 4.5, 78),
    ("6", "Cortina Blackout Elegante", "Cortina blackout com tecido premium", 21900, 28900, "photo-1586023492125-27b2c045efd7", "Decoração", 24, 4.4, 92),
    ("7", "Lençol Solteiro Percal 200 Fios", "Lençol de solteiro em percal 200 fios", 12900, 17900, "photo-1631049307264-da0ec9d70304", "Cama", 28, 4.6, 67),
    ("8", "Jogo Americano Rattan", "Conjunto de 6 jogos americanos em rattan", 8900, 11900, "photo-1556909114-f6e7ad7d3136", "Mesa", 25, 4.3, 45),
    ("9", "Tapete de Banheiro Antiderrapante", "Tapete de banheiro com base antiderrapante", 7900, 9900, "photo-1620626011761-996317b8d101", "Banho", 20, 4.4, 112),
    ("10", "Almofada Decorativa Veludo", "Almofada decorativa em veludo com enchimento", 6900, 8900, "photo-1586023492125-27b2c045efd7", "Decoração", 22, 4.5, 89),
    ("11", "Kit Enxoval Bebê Completo", "Kit enxoval completo para bebê com 15 peças", 39900, 54900, "photo-1515488042361-ee00e0ddd4e4", "Enxoval", 27, 4.9, 234),
    ("12", "Cobertor Casal Microfibra", "Cobertor casal em microfibra macia", 17900, 22900, "photo-1631049035182-249067d7618e", "Cama", 22, 4.7, 156),
];

/// 2024-01-01T00:00:00Z
const SAMPLE_EPOCH_SECS: i64 = 1_704_067_200;

fn sample_items() -> Vec<Item> {
    let base = DateTime::<Utc>::from_timestamp(SAMPLE_EPOCH_SECS, 0).unwrap_or_default();

    SAMPLE_ROWS
        .iter()
        .enumerate()
        .map(
            |(day, &(id, name, description, price, original, photo, category, pct, rating, reviews))| {
                let created_at = base + Duration::days(day as i64);
                Item {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    price_cents: price,
                    original_price_cents: Some(original),
                    image_url: format!(
                        "https://images.unsplash.com/{}?w=400&h=400&fit=crop",
                        photo
                    ),
                    category: category.to_string(),
                    discount_percentage: pct,
                    rating: Some(rating),
                    reviews_count: reviews,
                    created_at,
                    updated_at: created_at,
                }
            },
        )
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
