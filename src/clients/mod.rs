//! Type-safe wrappers around [`ResourceAdapter`](crate::framework::ResourceAdapter), one per resource.

pub mod adapter_client;
pub mod category_client;
pub mod order_client;
pub mod payment_client;
pub mod tire_client;
pub mod tyre_size_client;

pub use adapter_client::*;
pub use category_client::*;
pub use order_client::*;
pub use payment_client::*;
pub use tire_client::*;
pub use tyre_size_client::*;
