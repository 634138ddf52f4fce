//! Sequence numbers for the global event log.
//!
//! Every event appended to an [`EventStore`](crate::event_store::EventStore) receives
//! a [`SequenceNumber`] that is strictly greater than every number issued before it.
//! Sequence numbers establish a total order over all events, across all aggregates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an event in the global event log.
///
/// The first event ever raised gets sequence number `1`. Numbers are issued by the
/// event store only; callers never pick them. Gaps are allowed (a durable store may
/// burn a number on a failed append), duplicates are not.
///
/// # Examples
///
/// ```
/// use special_offers_core::sequence::SequenceNumber;
///
/// let first = SequenceNumber::FIRST;
/// assert_eq!(first.value(), 1);
/// assert_eq!(first.next(), SequenceNumber::new(2));
/// assert!(SequenceNumber::new(3) > first);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// The number assigned to the first event in an empty log.
    pub const FIRST: Self = Self(1);

    /// The largest possible sequence number, handy as an open upper bound for
    /// range queries.
    pub const MAX: Self = Self(u64::MAX);

    /// Create a new `SequenceNumber` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The number directly after this one.
    ///
    /// Saturates at [`SequenceNumber::MAX`].
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SequenceNumber> for u64 {
    fn from(sequence_number: SequenceNumber) -> Self {
        sequence_number.0
    }
}
