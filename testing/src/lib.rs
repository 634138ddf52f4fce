//! # Special Offers Testing
//!
//! Testing utilities and helpers for the special offers stores.
//!
//! This crate provides:
//! - Deterministic [`FixedClock`]
//! - [`FailingEventStore`] for exercising append-failure paths
//! - Offer fixtures
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use special_offers_runtime::InMemorySpecialOfferStore;
//! use special_offers_testing::{FailingEventStore, sample_offer};
//!
//! #[tokio::test]
//! async fn add_fails_when_the_log_is_down() {
//!     let offers = InMemorySpecialOfferStore::new(Arc::new(FailingEventStore::new()));
//!     assert!(offers.add(sample_offer(1)).await.is_err());
//!     assert!(offers.is_empty().await);
//! }
//! ```

use special_offers_core::offer::{Money, SpecialOffer};

/// Event store doubles
pub mod event_store_mocks;

/// Mock implementations for testing.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use special_offers_core::environment::Clock;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use special_offers_testing::mocks::FixedClock;
    /// use special_offers_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// An offer for `product_catalog_id`, not yet stored.
#[must_use]
pub fn sample_offer(product_catalog_id: i64) -> SpecialOffer {
    SpecialOffer::new(
        product_catalog_id,
        format!("Special offer on product {product_catalog_id}"),
        Money::new("eur", 9.99),
    )
}

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use event_store_mocks::FailingEventStore;
pub use mocks::{FixedClock, test_clock};
