use crate::framework::{MutationExecutor, Notifier, QueryCache, Transport};
use crate::lifecycle::checkout::CheckoutOrchestrator;
use crate::lifecycle::config::{ConfigError, StorefrontConfig};
use crate::services::{CatalogService, OrderService};
use std::sync::Arc;
use tracing::info;

/// The explicit context object for the whole data layer.
///
/// `Storefront` is responsible for:
/// - **Construction**: one transport, one query cache, one notifier, built once at startup
/// - **Dependency Wiring**: every service shares the same cache and notifier
/// - **Teardown**: [`shutdown`](Storefront::shutdown) drops cached data and pending notices
///
/// # Example
///
/// ```ignore
/// let storefront = Storefront::new(&StorefrontConfig::load(None)?)?;
///
/// let tires = storefront.catalog.tires(ListParams::new().page(1)).await;
/// let checkout = storefront.checkout.checkout(cart).await?;
///
/// storefront.shutdown();
/// ```
pub struct Storefront {
    /// Tires, categories and tyre sizes
    pub catalog: CatalogService,

    /// Order and payment reads, admin order edits
    pub orders: OrderService,

    /// Purchase workflow
    pub checkout: CheckoutOrchestrator,

    cache: QueryCache,
    notifier: Notifier,
}

impl Storefront {
    /// Builds the HTTP transport from `config` and wires everything on top of it.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = config.api.build_transport()?;
        info!(base_url = %transport.base_url(), "HTTP transport ready");
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Wires the storefront on an arbitrary transport (a mock in tests).
    pub fn with_transport(transport: Arc<dyn Transport>, config: &StorefrontConfig) -> Self {
        let cache = QueryCache::new();
        let notifier = Notifier::new(config.notices.ttl());
        let mutations = MutationExecutor::new(cache.clone(), notifier.clone());

        let storefront = Self {
            catalog: CatalogService::new(Arc::clone(&transport), mutations.clone()),
            orders: OrderService::new(Arc::clone(&transport), mutations.clone()),
            checkout: CheckoutOrchestrator::new(transport, mutations),
            cache,
            notifier,
        };
        info!("Storefront initialized");
        storefront
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Drops all cached data and pending notices.
    ///
    /// Fetches still in flight finish in the background and are discarded.
    pub fn shutdown(self) {
        info!("Shutting down storefront...");
        self.cache.clear();
        self.notifier.clear();
        info!("Storefront shutdown complete.");
    }
}
