//! Pure data structures (DTOs) implementing the [`Resource`](crate::framework::Resource) trait.
//!
//! Records deserialize from the API's camelCase JSON and accept Mongo-style `_id` keys.
//! Write payloads choose their own encoding: JSON for orders, payments and tyre sizes,
//! multipart for tires and categories (which carry an image).

/// Declares a string-backed identifier newtype.
macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// An empty id disables single-record queries.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

/// Implements [`IntoRequestBody`](crate::framework::IntoRequestBody) as a JSON body.
macro_rules! json_body {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl crate::framework::IntoRequestBody for $ty {
                fn into_body(
                    self,
                ) -> Result<crate::framework::RequestBody, crate::framework::TransportError> {
                    crate::framework::RequestBody::json(&self)
                }
            }
        )+
    };
}

pub mod category;
pub mod order;
pub mod payment;
pub mod tire;
pub mod tyre_size;

pub use category::*;
pub use order::*;
pub use payment::*;
pub use tire::*;
pub use tyre_size::*;
