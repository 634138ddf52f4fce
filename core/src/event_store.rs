//! Event store trait and related types for event sourcing.
//!
//! The event store is the system of record: an append-only log with a single global
//! order. Read models such as the special offer projection are derived from it and can
//! always be rebuilt by replaying it.
//!
//! # Design
//!
//! The `EventStore` trait is deliberately small:
//!
//! - Raise an event, receiving the sequence number the store assigned
//! - Query an inclusive range of sequence numbers
//! - Ask for the latest sequence number (for replay and feeds)
//!
//! # Implementations
//!
//! - `InMemoryEventStore` (in `special-offers-runtime`): volatile, process-local log
//! - `FailingEventStore` (in `special-offers-testing`): rejects every append
//!
//! # Example
//!
//! ```no_run
//! use special_offers_core::event::SerializedEvent;
//! use special_offers_core::event_store::{EventStore, EventStoreError};
//! use special_offers_core::sequence::SequenceNumber;
//!
//! async fn example(store: &dyn EventStore) -> Result<(), EventStoreError> {
//!     let event = SerializedEvent::new("PriceChanged".to_string(), vec![1, 2, 3], None);
//!     let sequence_number = store.raise(event).await?;
//!
//!     let events = store.get_events(SequenceNumber::FIRST, sequence_number).await?;
//!     assert!(!events.is_empty());
//!     Ok(())
//! }
//! ```

use crate::event::{RecordedEvent, SerializedEvent};
use crate::sequence::SequenceNumber;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during event store operations.
///
/// The in-memory store never fails; these exist for durable backends behind the
/// same trait.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventStoreError {
    /// The event could not be appended.
    ///
    /// The sequence number drawn for the attempt is burned, never reissued.
    #[error("Failed to append event {event_type}: {reason}")]
    AppendFailed {
        /// Name of the event that was being raised.
        event_type: String,
        /// Backend-specific reason.
        reason: String,
    },

    /// A range query could not be answered.
    #[error("Failed to query events: {0}")]
    QueryFailed(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Append-only, globally sequenced event log.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; `raise` may be called from many tasks at
/// once and must never hand out the same sequence number twice.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so it can be injected as `Arc<dyn EventStore>`.
pub trait EventStore: Send + Sync {
    /// Append an event, returning the sequence number it was assigned.
    ///
    /// The assigned number is strictly greater than every number issued before it.
    /// The timestamp is taken at append time.
    ///
    /// # Errors
    ///
    /// - `AppendFailed`: the backend rejected the write
    fn raise(
        &self,
        event: SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<SequenceNumber, EventStoreError>> + Send + '_>>;

    /// Load every event whose sequence number lies in `[first, last]`.
    ///
    /// Events come back in ascending order with no duplicates. An empty range
    /// (including `first > last`) yields an empty vector, not an error. Events
    /// appended while the query runs may or may not be included.
    ///
    /// # Errors
    ///
    /// - `QueryFailed`: the backend could not be read
    fn get_events(
        &self,
        first: SequenceNumber,
        last: SequenceNumber,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RecordedEvent>, EventStoreError>> + Send + '_>>;

    /// The highest sequence number currently visible in the log, or `None` if the
    /// log is empty.
    ///
    /// # Errors
    ///
    /// - `QueryFailed`: the backend could not be read
    fn latest_sequence_number(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SequenceNumber>, EventStoreError>> + Send + '_>>;
}
