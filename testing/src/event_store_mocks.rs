//! Event store doubles for failure-path tests.

use special_offers_core::environment::Clock;
use special_offers_core::event::{RecordedEvent, SerializedEvent};
use special_offers_core::event_store::{EventStore, EventStoreError};
use special_offers_core::sequence::SequenceNumber;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::Mutex;

use crate::mocks::{FixedClock, test_clock};

/// Event store that starts rejecting appends after a fixed number of successes.
///
/// Rejected appends still burn a sequence number, the way a durable store would.
///
/// # Example
///
/// ```
/// use special_offers_core::event::SerializedEvent;
/// use special_offers_core::event_store::{EventStore, EventStoreError};
/// use special_offers_testing::FailingEventStore;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = FailingEventStore::new();
/// let result = store
///     .raise(SerializedEvent::new("Anything".to_string(), vec![], None))
///     .await;
/// assert!(matches!(result, Err(EventStoreError::AppendFailed { .. })));
/// # }
/// ```
#[derive(Debug)]
pub struct FailingEventStore {
    accepted_before_failing: u64,
    state: Mutex<State>,
    clock: FixedClock,
}

#[derive(Debug, Default)]
struct State {
    last_issued: u64,
    log: Vec<RecordedEvent>,
}

impl FailingEventStore {
    /// A store that rejects every append.
    #[must_use]
    pub fn new() -> Self {
        Self::after(0)
    }

    /// A store that accepts the first `accepted` appends, then rejects the rest.
    #[must_use]
    pub fn after(accepted: u64) -> Self {
        Self {
            accepted_before_failing: accepted,
            state: Mutex::new(State::default()),
            clock: test_clock(),
        }
    }

    /// Number of appends that were accepted.
    pub async fn accepted(&self) -> usize {
        self.state.lock().await.log.len()
    }
}

impl Default for FailingEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore for FailingEventStore {
    fn raise(
        &self,
        event: SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<SequenceNumber, EventStoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            state.last_issued += 1;
            let sequence_number = SequenceNumber::new(state.last_issued);

            if state.log.len() as u64 >= self.accepted_before_failing {
                return Err(EventStoreError::AppendFailed {
                    event_type: event.event_type,
                    reason: "simulated append failure".to_string(),
                });
            }

            state
                .log
                .push(RecordedEvent::new(sequence_number, self.clock.now(), event));
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
            Ok(self
                .state
                .lock()
                .await
                .log
                .iter()
                .filter(|e| (first..=last).contains(&e.sequence_number()))
                .cloned()
                .collect())
        })
    }

    fn latest_sequence_number(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SequenceNumber>, EventStoreError>> + Send + '_>>
    {
        Box::pin(async move {
            Ok(self
                .state
                .lock()
                .await
                .log
                .last()
                .map(RecordedEvent::sequence_number))
        })
    }
}
