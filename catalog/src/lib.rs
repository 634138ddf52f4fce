//! # Product Catalog Client
//!
//! Retrying HTTP client for the product catalog service, used to turn
//! product ids into shopping cart items.
//!
//! ## Example
//!
//! ```no_run
//! use product_catalog_client::ProductCatalogClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Base URL from PRODUCT_CATALOG_URL, or the public mock catalog
//!     let client = ProductCatalogClient::from_env()?;
//!
//!     let items = client.get_shopping_cart_items(&[1, 2]).await?;
//!     for item in items {
//!         println!("{} {}", item.product_name, item.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Retries
//!
//! Transport failures and non-success statuses are retried with exponential
//! backoff (100ms, 200ms, 400ms by default; four attempts in total). Decoding
//! failures are returned immediately.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::ProductCatalogClient;
pub use config::CatalogConfig;
pub use error::CatalogError;
pub use types::{CatalogProduct, ShoppingCartItem};
