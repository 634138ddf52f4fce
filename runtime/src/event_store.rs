//! In-memory event store.
//!
//! A raise is one short write section: take the next number from the counter, stamp
//! the clock, push. The log is therefore sorted by sequence number and by time, a
//! reader never sees a half-written event, and range queries are two binary
//! searches and a slice copy.

use crate::metrics::EventStoreMetrics;
use special_offers_core::environment::{Clock, SystemClock};
use special_offers_core::event::{RecordedEvent, SerializedEvent};
use special_offers_core::event_store::{EventStore, EventStoreError};
use special_offers_core::sequence::SequenceNumber;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

/// Volatile, process-local event log.
///
/// # Example
///
/// ```
/// use special_offers_core::event::SerializedEvent;
/// use special_offers_core::event_store::EventStore;
/// use special_offers_core::sequence::SequenceNumber;
/// use special_offers_runtime::InMemoryEventStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryEventStore::new();
///
/// let first = store
///     .raise(SerializedEvent::new("OfferViewed".to_string(), vec![1], None))
///     .await?;
/// assert_eq!(first, SequenceNumber::FIRST);
///
/// let events = store.get_events(first, SequenceNumber::MAX).await?;
/// assert_eq!(events.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct InMemoryEventStore {
    /// Last sequence number handed out (0 when none has been). Only advanced
    /// under the log's write guard.
    last_issued: AtomicU64,
    /// Recorded events, kept sorted by sequence number.
    log: RwLock<Vec<RecordedEvent>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryEventStore {
    /// Create an empty store that timestamps events with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store with an injected clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            last_issued: AtomicU64::new(0),
            log: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Number of events currently in the log.
    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }

    /// Whether the log is empty.
    pub async fn is_empty(&self) -> bool {
        self.log.read().await.is_empty()
    }

    fn next_sequence_number(&self) -> SequenceNumber {
        SequenceNumber::new(self.last_issued.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEventStore")
            .field("last_issued", &self.last_issued.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl EventStore for InMemoryEventStore {
    fn raise(
        &self,
        event: SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<SequenceNumber, EventStoreError>> + Send + '_>> {
        Box::pin(async move {
            let started = Instant::now();
            let sequence_number = {
                let mut log = self.log.write().await;
                // Number and timestamp are taken under the guard, so both grow with
                // position in the log.
                let sequence_number = self.next_sequence_number();
                log.push(RecordedEvent::new(sequence_number, self.clock.now(), event));
                sequence_number
            };

            EventStoreMetrics::record_raise(started.elapsed());
            tracing::debug!(%sequence_number, "Event raised");
            Ok(sequence_number)
        })
    }

    fn get_events(
        &self,
        first: SequenceNumber,
        last: SequenceNumber,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RecordedEvent>, EventStoreError>> + Send + '_>>
    {
        Box::pin(async move {
            if first > last {
                return Ok(Vec::new());
            }

            let started = Instant::now();
            let events = {
                let log = self.log.read().await;
                let start = log.partition_point(|e| e.sequence_number() < first);
                let end = log.partition_point(|e| e.sequence_number() <= last);
                log[start..end].to_vec()
            };

            EventStoreMetrics::record_query(events.len(), started.elapsed());
            tracing::trace!(%first, %last, count = events.len(), "Loaded events");
            Ok(events)
        })
    }

    fn latest_sequence_number(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SequenceNumber>, EventStoreError>> + Send + '_>>
    {
        Box::pin(async move {
            Ok(self
                .log
                .read()
                .await
                .last()
                .map(RecordedEvent::sequence_number))
        })
    }
}
