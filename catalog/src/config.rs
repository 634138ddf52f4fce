//! Client configuration

use special_offers_runtime::RetryPolicy;
use std::time::Duration;

/// Environment variable holding the catalog base URL
pub const BASE_URL_ENV: &str = "PRODUCT_CATALOG_URL";

/// Base URL used when [`BASE_URL_ENV`] is unset (the public mock catalog)
pub const DEFAULT_BASE_URL: &str =
    "http://private-05cc8-chapter2productcataloguemicroservice.apiary-mock.com";

/// Where the catalog lives and how hard to try reaching it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Scheme and host of the catalog, without the `/products` path
    pub base_url: String,
    /// Backoff applied to transient failures
    pub retry_policy: RetryPolicy,
    /// Per-attempt request timeout
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry_policy: RetryPolicy::default(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CatalogConfig {
    /// Read the base URL from `PRODUCT_CATALOG_URL`, falling back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Override the per-attempt timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}
