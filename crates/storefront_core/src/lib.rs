use std::sync::Arc;

use rust_decimal::Decimal;
use shared::{
    domain::{Product, ProductId, ProductRef},
    fallback::fallback_products,
};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

pub mod cart;
pub mod catalog;
pub mod error;
pub mod query;
pub mod source;

pub use cart::{Cart, CartCommand, CartLine};
pub use catalog::{Catalog, CatalogOrigin, CatalogStatus, FallbackPolicy, FetchOutcome};
pub use error::FetchError;
pub use source::{CatalogSource, HttpCatalogSource, OfflineCatalogSource};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontEvent {
    CartUpdated {
        total_quantity: u64,
        total_amount: Decimal,
    },
    CatalogStatusChanged(CatalogStatus),
    CatalogFallbackUsed {
        reason: String,
    },
}

/// Owns one cart ledger and one catalog loader.
///
/// Each machine sits behind its own lock and serializes its own
/// transitions. Neither lock is held while the other is taken, and none is
/// held across the network call, so cart commands proceed while a fetch is
/// outstanding.
pub struct Storefront {
    source: Arc<dyn CatalogSource>,
    policy: FallbackPolicy,
    fallback: Vec<Product>,
    cart: RwLock<Cart>,
    catalog: RwLock<Catalog>,
    events: broadcast::Sender<StorefrontEvent>,
}

impl Storefront {
    pub fn new(source: Arc<dyn CatalogSource>) -> Arc<Self> {
        Self::new_with_policy(source, FallbackPolicy::default())
    }

    pub fn new_with_policy(source: Arc<dyn CatalogSource>, policy: FallbackPolicy) -> Arc<Self> {
        Self::new_with_fallback(source, policy, fallback_products())
    }

    pub fn new_with_fallback(
        source: Arc<dyn CatalogSource>,
        policy: FallbackPolicy,
        fallback: Vec<Product>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            source,
            policy,
            fallback,
            cart: RwLock::new(Cart::new()),
            catalog: RwLock::new(Catalog::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StorefrontEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StorefrontEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // -- cart ledger --------------------------------------------------------

    pub async fn dispatch(&self, command: CartCommand) -> bool {
        let (changed, total_quantity, total_amount) = {
            let mut cart = self.cart.write().await;
            let changed = cart.apply(command);
            (changed, cart.total_quantity(), cart.total_amount())
        };
        if changed {
            debug!(total_quantity, %total_amount, "cart updated");
            self.emit(StorefrontEvent::CartUpdated {
                total_quantity,
                total_amount,
            });
        }
        changed
    }

    pub async fn add_item(&self, product: ProductRef) -> bool {
        self.dispatch(CartCommand::Add(product)).await
    }

    pub async fn remove_item(&self, id: ProductId) -> bool {
        self.dispatch(CartCommand::Remove(id)).await
    }

    pub async fn increase_quantity(&self, id: ProductId) -> bool {
        self.dispatch(CartCommand::Increase(id)).await
    }

    pub async fn decrease_quantity(&self, id: ProductId) -> bool {
        self.dispatch(CartCommand::Decrease(id)).await
    }

    pub async fn clear_cart(&self) -> bool {
        self.dispatch(CartCommand::Clear).await
    }

    pub async fn cart_snapshot(&self) -> Cart {
        self.cart.read().await.clone()
    }

    pub async fn items(&self) -> Vec<CartLine> {
        self.cart.read().await.items().to_vec()
    }

    pub async fn total_quantity(&self) -> u64 {
        self.cart.read().await.total_quantity()
    }

    pub async fn total_amount(&self) -> Decimal {
        self.cart.read().await.total_amount()
    }

    pub async fn is_cart_empty(&self) -> bool {
        self.cart.read().await.is_empty()
    }

    pub async fn quantity_of(&self, id: ProductId) -> u32 {
        self.cart.read().await.quantity_of(id)
    }

    pub async fn cart_contains(&self, id: ProductId) -> bool {
        self.cart.read().await.contains(id)
    }

    // -- catalog loader -----------------------------------------------------

    /// Loads the catalog from the source.
    ///
    /// The request runs on its own task, so dropping the returned future does
    /// not strand the loader in `Loading`. A call made while another fetch is
    /// in flight returns `AlreadyLoading` without touching the source.
    pub async fn fetch_catalog(self: &Arc<Self>) -> FetchOutcome {
        if !self.catalog.write().await.begin_fetch() {
            debug!("catalog fetch already in flight");
            return FetchOutcome::AlreadyLoading;
        }
        self.emit(StorefrontEvent::CatalogStatusChanged(CatalogStatus::Loading));

        let store = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = store.source.fetch_products().await;
            store.settle_fetch(result).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                self.settle_fetch(Err(FetchError::Unavailable(join_err.to_string())))
                    .await
            }
        }
    }

    async fn settle_fetch(&self, result: Result<Vec<Product>, FetchError>) -> FetchOutcome {
        let (outcome, status) = {
            let mut catalog = self.catalog.write().await;
            let outcome = catalog.resolve(result, self.policy, &self.fallback);
            (outcome, catalog.status())
        };

        match &outcome {
            FetchOutcome::Live { count } => info!(count, "catalog loaded"),
            FetchOutcome::Fallback { reason } => {
                warn!(%reason, "catalog fetch failed, serving bundled catalog");
                self.emit(StorefrontEvent::CatalogFallbackUsed {
                    reason: reason.clone(),
                });
            }
            FetchOutcome::Failed { error } => warn!(%error, "catalog fetch failed"),
            FetchOutcome::AlreadyLoading => {}
        }
        self.emit(StorefrontEvent::CatalogStatusChanged(status));
        outcome
    }

    pub async fn clear_catalog_error(&self) {
        let status = {
            let mut catalog = self.catalog.write().await;
            catalog.clear_error();
            catalog.status()
        };
        self.emit(StorefrontEvent::CatalogStatusChanged(status));
    }

    pub async fn set_products(&self, products: Vec<Product>) {
        self.catalog.write().await.set_products(products);
    }

    pub async fn catalog_snapshot(&self) -> Catalog {
        self.catalog.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.catalog.read().await.products().to_vec()
    }

    pub async fn catalog_status(&self) -> CatalogStatus {
        self.catalog.read().await.status()
    }

    pub async fn is_loading(&self) -> bool {
        self.catalog.read().await.is_loading()
    }

    pub async fn catalog_error(&self) -> Option<String> {
        self.catalog.read().await.error().map(str::to_owned)
    }

    pub async fn catalog_origin(&self) -> Option<CatalogOrigin> {
        self.catalog.read().await.origin().cloned()
    }

    pub async fn product_count(&self) -> usize {
        self.catalog.read().await.count()
    }

    pub async fn product_by_id(&self, id: ProductId) -> Option<Product> {
        self.catalog.read().await.product_by_id(id).cloned()
    }

    /// Adds a catalog product to the cart by id. Returns false when the id is
    /// not in the catalog.
    pub async fn add_product(&self, id: ProductId) -> bool {
        let Some(product) = self.product_by_id(id).await else {
            return false;
        };
        self.add_item(product.to_ref()).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
