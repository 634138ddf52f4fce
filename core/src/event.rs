//! Event trait and the event record types stored in the log.
//!
//! Events are facts about things that have already happened. They are never changed
//! once appended to the event store.
//!
//! # Design
//!
//! Payloads are typed on the way in and on the way out, but opaque to the store:
//!
//! - A domain event enum implements [`Event`], which names each variant and encodes
//!   it with `bincode`.
//! - [`SerializedEvent`] is what callers hand to the store: a name plus payload bytes.
//! - [`RecordedEvent`] is what the store hands back: the same name and bytes, plus the
//!   sequence number and timestamp the store assigned. [`RecordedEvent::decode`]
//!   turns the bytes back into the typed event.
//!
//! # Example
//!
//! ```
//! use special_offers_core::event::{Event, SerializedEvent};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! enum CartEvent {
//!     ItemAdded { product_id: i64 },
//!     ItemRemoved { product_id: i64 },
//! }
//!
//! impl Event for CartEvent {
//!     fn event_type(&self) -> &'static str {
//!         match self {
//!             CartEvent::ItemAdded { .. } => "ItemAdded",
//!             CartEvent::ItemRemoved { .. } => "ItemRemoved",
//!         }
//!     }
//! }
//!
//! let serialized = SerializedEvent::from_event(&CartEvent::ItemAdded { product_id: 7 }, None)
//!     .unwrap();
//! assert_eq!(serialized.event_type, "ItemAdded");
//! ```

use crate::sequence::SequenceNumber;
use crate::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error;

/// Error types for event operations.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to serialize event to bytes.
    #[error("Failed to serialize event: {0}")]
    SerializationError(String),

    /// Failed to deserialize event from bytes.
    #[error("Failed to deserialize event: {0}")]
    DeserializationError(String),

    /// The payload decoded, but into a variant whose name doesn't match the
    /// name recorded alongside it.
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
}

/// A typed event payload that can be raised into an event store.
///
/// `event_type()` returns the name recorded next to the payload, for example
/// `"NewSpecialOffer"`. Readers of the log filter on this name before decoding.
///
/// # Thread Safety
///
/// Events must be `Send + Sync + 'static` to be passed between tasks.
pub trait Event: Send + Sync + 'static {
    /// Returns the event type identifier for this event.
    fn event_type(&self) -> &'static str;

    /// Serialize this event to bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be serialized.
    fn to_bytes(&self) -> Result<Vec<u8>, EventError>
    where
        Self: Serialize,
    {
        bincode::serialize(self).map_err(|e| EventError::SerializationError(e.to_string()))
    }

    /// Deserialize an event from bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::DeserializationError` if the bytes are corrupted or
    /// belong to a different event type.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EventError>
    where
        Self: DeserializeOwned + Sized,
    {
        bincode::deserialize(bytes).map_err(|e| EventError::DeserializationError(e.to_string()))
    }
}

/// An event ready to be raised: name, payload bytes and optional metadata.
///
/// This is the input side of [`EventStore::raise`](crate::event_store::EventStore::raise).
/// It carries no sequence number or timestamp; the store assigns both.
#[derive(Clone, Debug, PartialEq)]
pub struct SerializedEvent {
    /// The event name (e.g., `"NewSpecialOffer"`).
    pub event_type: String,

    /// The bincode-serialized payload.
    pub data: Vec<u8>,

    /// Optional metadata carried verbatim into the recorded event.
    ///
    /// Common fields:
    /// - `correlation_id`: Links related events
    /// - `user_id`: Who triggered the change
    pub metadata: Option<serde_json::Value>,
}

impl SerializedEvent {
    /// Create a new serialized event from raw parts.
    #[must_use]
    pub const fn new(
        event_type: String,
        data: Vec<u8>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            event_type,
            data,
            metadata,
        }
    }

    /// Create a serialized event from a typed [`Event`].
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be serialized.
    pub fn from_event<E: Event + Serialize>(
        event: &E,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, EventError> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            data: event.to_bytes()?,
            metadata,
        })
    }
}

impl fmt::Display for SerializedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerializedEvent {{ type: {}, size: {} bytes }}",
            self.event_type,
            self.data.len()
        )
    }
}

/// An event as it sits in the log.
///
/// Fields are only reachable through accessors: a recorded event is immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    sequence_number: SequenceNumber,
    timestamp: DateTime<Utc>,
    name: String,
    payload: Vec<u8>,
    metadata: Option<serde_json::Value>,
}

impl RecordedEvent {
    /// Stamp a serialized event with its sequence number and append time.
    ///
    /// Only event store implementations should call this.
    #[must_use]
    pub fn new(
        sequence_number: SequenceNumber,
        timestamp: DateTime<Utc>,
        event: SerializedEvent,
    ) -> Self {
        Self {
            sequence_number,
            timestamp,
            name: event.event_type,
            payload: event.data,
            metadata: event.metadata,
        }
    }

    /// Position of this event in the global log.
    #[must_use]
    pub const fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }

    /// When the event was appended (UTC).
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The event name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Metadata supplied when the event was raised.
    #[must_use]
    pub const fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Decode the payload into a typed event.
    ///
    /// The decoded variant's `event_type()` must match the recorded name.
    ///
    /// # Errors
    ///
    /// - `EventError::DeserializationError` if the bytes don't decode as `E`
    /// - `EventError::UnknownEventType` if they decode but the names disagree
    pub fn decode<E>(&self) -> Result<E, EventError>
    where
        E: Event + DeserializeOwned,
    {
        let event = E::from_bytes(&self.payload)?;
        if event.event_type() == self.name {
            Ok(event)
        } else {
            Err(EventError::UnknownEventType(self.name.clone()))
        }
    }
}

impl fmt::Display for RecordedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} at {} ({} bytes)",
            self.sequence_number,
            self.name,
            self.timestamp.to_rfc3339(),
            self.payload.len()
        )
    }
}
