//! Product catalog HTTP client

use crate::{
    config::CatalogConfig,
    error::CatalogError,
    types::{ShoppingCartItem, decode_products},
};
use reqwest::{Client, Url};
use special_offers_runtime::{RetryError, retry_with_predicate};
use tokio_util::sync::CancellationToken;

/// Fetches products from the catalog, retrying transient failures.
///
/// Transport errors and non-success statuses are retried with the configured
/// exponential backoff. Bodies that don't decode fail immediately.
#[derive(Clone, Debug)]
pub struct ProductCatalogClient {
    client: Client,
    products_url: Url,
    config: CatalogConfig,
}

impl ProductCatalogClient {
    /// Create a client with configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if `PRODUCT_CATALOG_URL` is not a valid URL
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::new(CatalogConfig::from_env())
    }

    /// Create a client with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if the base URL does not parse, or
    /// `CatalogError::Transport` if the HTTP client cannot be built
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let products_url = format!("{}/products", config.base_url.trim_end_matches('/'));
        let products_url = Url::parse(&products_url)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            products_url,
            config,
        })
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetch cart items for `product_ids`, in the order the catalog returns them.
    ///
    /// # Errors
    ///
    /// - `CatalogError::RemoteUnavailable` once every attempt failed transiently
    /// - `CatalogError::DecodeFailed` if a response body doesn't match the schema
    pub async fn get_shopping_cart_items(
        &self,
        product_ids: &[i64],
    ) -> Result<Vec<ShoppingCartItem>, CatalogError> {
        self.get_shopping_cart_items_with_cancellation(product_ids, &CancellationToken::new())
            .await
    }

    /// Like [`Self::get_shopping_cart_items`], aborting when `cancellation` fires.
    ///
    /// # Errors
    ///
    /// As [`Self::get_shopping_cart_items`], plus `CatalogError::Cancelled`.
    #[tracing::instrument(skip(self, cancellation), fields(url = %self.products_url))]
    pub async fn get_shopping_cart_items_with_cancellation(
        &self,
        product_ids: &[i64],
        cancellation: &CancellationToken,
    ) -> Result<Vec<ShoppingCartItem>, CatalogError> {
        let query = product_ids_query(product_ids);

        let result = retry_with_predicate(
            &self.config.retry_policy,
            cancellation,
            || self.fetch_once(&query),
            CatalogError::is_transient,
        )
        .await;

        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Fetched cart items");
                Ok(items)
            }
            Err(RetryError::Exhausted {
                attempts,
                last_error,
            }) => Err(CatalogError::RemoteUnavailable {
                attempts,
                last_error: Box::new(last_error),
            }),
            Err(RetryError::NotRetryable(error)) => Err(error),
            Err(RetryError::Cancelled { .. }) => Err(CatalogError::Cancelled),
        }
    }

    async fn fetch_once(&self, query: &str) -> Result<Vec<ShoppingCartItem>, CatalogError> {
        let response = self
            .client
            .get(self.products_url.clone())
            .query(&[("productIds", query)])
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        // A body cut short is a transport fault; only a complete body can fail to decode.
        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        decode_products(&body)
    }
}

/// `[1,2,3]`, the list format the catalog expects in `productIds`
fn product_ids_query(product_ids: &[i64]) -> String {
    let joined = product_ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}
