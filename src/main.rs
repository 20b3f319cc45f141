//! # Storefront Sync Demo
//!
//! Runs the data layer against a live API:
//! 1. Loads [`StorefrontConfig`] (optional TOML path as first argument, env overrides).
//! 2. Reads the first page of tires and the category list through the query cache.
//! 3. Checks out one unit of the first tire and re-reads the resulting order.

use std::path::PathBuf;
use storefront_sync::framework::ListParams;
use storefront_sync::lifecycle::{setup_tracing, CheckoutError, Storefront, StorefrontConfig};
use storefront_sync::model::{OrderCreate, OrderItem, ShippingInfo};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = StorefrontConfig::load(config_path.as_deref()).map_err(|e| e.to_string())?;
    info!(base_url = %config.api.base_url, "Starting storefront demo");

    let storefront = Storefront::new(&config).map_err(|e| e.to_string())?;

    let tires = storefront
        .catalog
        .tires(ListParams::new().page(1).limit(10))
        .instrument(tracing::info_span!("catalog"))
        .await;
    let categories = storefront.catalog.categories(ListParams::new()).await;

    if let Some(err) = &tires.error {
        error!(error = %err, cause = %err.cause, "Catalog unavailable");
        storefront.shutdown();
        return Err(err.to_string());
    }
    let tires = tires.data.unwrap_or_default();
    info!(
        tires = tires.len(),
        categories = categories.data.map(|c| c.len()).unwrap_or(0),
        "Catalog loaded"
    );

    let Some(tire) = tires.first() else {
        warn!("No tires listed, skipping checkout");
        storefront.shutdown();
        return Ok(());
    };

    let cart = OrderCreate::new(vec![OrderItem::new(
        tire.id.as_str(),
        tire.name.clone(),
        1,
        tire.price,
    )])
    .with_shipping(ShippingInfo {
        full_name: "Demo Customer".into(),
        email: "demo@example.com".into(),
        ..Default::default()
    });

    let result = storefront
        .checkout
        .checkout(cart)
        .instrument(tracing::info_span!("checkout"))
        .await;

    match result {
        Ok(done) => {
            info!(order_id = %done.order.id, secret_len = done.payment.client_secret.len(), "Checkout opened");
            let order = storefront.checkout.refresh_order(&done.order.id).await;
            info!(status = ?order.data.map(|o| o.status), "Order status after refresh");
        }
        Err(CheckoutError::PaymentFailed { order, source }) => {
            warn!(order_id = %order.id, error = %source, "Payment failed, order left pending");
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    for notice in storefront.notifier().active() {
        info!(level = ?notice.level, message = %notice.message, "Notice");
    }

    storefront.shutdown();
    Ok(())
}
