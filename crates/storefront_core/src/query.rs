//! Pure projections over a product list. Nothing here touches store state.

use std::{collections::HashSet, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use shared::{
    domain::{Product, ProductId},
    fallback::DEFAULT_CATEGORIES,
};

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// `"all"` followed by each category in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    if products.is_empty() {
        return DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    }

    let mut seen = HashSet::new();
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(products.iter().filter_map(|product| {
            seen.insert(product.category.as_str())
                .then(|| product.category.clone())
        }))
        .collect()
}

pub fn filter_by_category(products: &[Product], category: &str) -> Vec<Product> {
    if category == ALL_CATEGORIES {
        return products.to_vec();
    }
    let category = category.to_lowercase();
    products
        .iter()
        .filter(|product| product.category.to_lowercase() == category)
        .cloned()
        .collect()
}

/// Case-insensitive substring match over title and description. A blank term
/// matches everything.
pub fn search(products: &[Product], term: &str) -> Vec<Product> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|product| {
            product.title.to_lowercase().contains(&term)
                || product.description.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Stable: products with equal prices keep their relative order.
pub fn sort_by_price(products: &[Product], order: SortOrder) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match order {
        SortOrder::Ascending => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::Descending => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
    }
    sorted
}

pub fn product_by_id(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|product| product.id == id)
}

pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

/// `percent` is a percentage, so 20 means 20% off. `None` on overflow.
pub fn discounted_price(price: Decimal, percent: Decimal) -> Option<Decimal> {
    let discount = price
        .checked_mul(percent)?
        .checked_div(Decimal::ONE_HUNDRED)?;
    price.checked_sub(discount)
}

/// Category, search and sort applied in that order.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
}

impl CatalogQuery {
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut view = match &self.category {
            Some(category) => filter_by_category(products, category),
            None => products.to_vec(),
        };
        if let Some(term) = &self.search {
            view = search(&view, term);
        }
        if let Some(order) = self.sort {
            view = sort_by_price(&view, order);
        }
        view
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
