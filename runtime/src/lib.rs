//! # Special Offers Runtime
//!
//! Runtime implementations for the special offers core traits.
//!
//! ## Core Components
//!
//! - **`InMemoryEventStore`**: volatile, globally sequenced event log
//! - **`InMemorySpecialOfferStore`**: offer projection that raises an event per mutation
//! - **`SpecialOffersService`**: owns one log and its projection
//! - **Retry**: exponential backoff with cancellation for remote calls
//! - **Metrics**: Prometheus recorder and metric helpers
//!
//! ## Example
//!
//! ```ignore
//! use special_offers_runtime::SpecialOffersService;
//!
//! let service = SpecialOffersService::in_memory();
//! let id = service.offers().add(offer).await?;
//! let events = service.event_store().get_events(first, last).await?;
//! ```

/// In-memory event store
pub mod event_store;

/// Prometheus metrics for observability
pub mod metrics;

/// In-memory special offer projection
pub mod offer_store;

/// Retry logic with exponential backoff
pub mod retry;

/// Store wiring
pub mod service;

pub use event_store::InMemoryEventStore;
pub use offer_store::InMemorySpecialOfferStore;
pub use retry::{RetryError, RetryPolicy, retry_with_predicate};
pub use service::SpecialOffersService;
