//! Catalog loader state: the product list plus the status of the last fetch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::{Product, ProductId};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Where the current product list came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogOrigin {
    Live { fetched_at: DateTime<Utc> },
    Fallback { reason: String },
    Manual,
}

/// What the loader does when the catalog source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Serve the bundled catalog and report success.
    #[default]
    UseBundled,
    /// Keep the current products and move to `Failed`.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Live { count: usize },
    Fallback { reason: String },
    Failed { error: String },
    /// Another fetch was already in flight; no request was made.
    AlreadyLoading,
}

/// Invariants: `Failed` implies `last_error` is set, `Loading` implies it is
/// not.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    status: CatalogStatus,
    last_error: Option<String>,
    origin: Option<CatalogOrigin>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Loading`. Returns false, leaving state untouched, when a fetch
    /// is already in flight.
    pub fn begin_fetch(&mut self) -> bool {
        if self.status == CatalogStatus::Loading {
            return false;
        }
        self.status = CatalogStatus::Loading;
        self.last_error = None;
        true
    }

    pub fn resolve(
        &mut self,
        result: Result<Vec<Product>, FetchError>,
        policy: FallbackPolicy,
        fallback: &[Product],
    ) -> FetchOutcome {
        let result = result.and_then(|products| {
            if products.is_empty() {
                Err(FetchError::Empty)
            } else {
                Ok(products)
            }
        });
        match result {
            Ok(products) => {
                let count = products.len();
                self.products = products;
                self.status = CatalogStatus::Succeeded;
                self.last_error = None;
                self.origin = Some(CatalogOrigin::Live {
                    fetched_at: Utc::now(),
                });
                FetchOutcome::Live { count }
            }
            Err(err) => match policy {
                FallbackPolicy::UseBundled => {
                    let reason = err.to_string();
                    self.products = fallback.to_vec();
                    self.status = CatalogStatus::Succeeded;
                    self.last_error = None;
                    self.origin = Some(CatalogOrigin::Fallback {
                        reason: reason.clone(),
                    });
                    FetchOutcome::Fallback { reason }
                }
                FallbackPolicy::Surface => {
                    let error = err.to_string();
                    self.status = CatalogStatus::Failed;
                    self.last_error = Some(error.clone());
                    FetchOutcome::Failed { error }
                }
            },
        }
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
        if self.status == CatalogStatus::Failed {
            self.status = CatalogStatus::Idle;
        }
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.origin = Some(CatalogOrigin::Manual);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn status(&self) -> CatalogStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == CatalogStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn origin(&self) -> Option<&CatalogOrigin> {
        self.origin.as_ref()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, Some(CatalogOrigin::Fallback { .. }))
    }

    pub fn count(&self) -> usize {
        self.products.len()
    }

    pub fn product_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
