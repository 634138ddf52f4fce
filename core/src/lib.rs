//! # Special Offers Core
//!
//! Core traits and types for an event-sourced special offer store.
//!
//! ## Core Concepts
//!
//! - **Event log**: append-only, globally ordered by [`SequenceNumber`](sequence::SequenceNumber)
//! - **Event**: typed payload ([`event::Event`]) stored as name + bincode bytes
//! - **Read model**: [`offer_store::SpecialOfferStore`], mutated only alongside an event
//! - **Environment**: injected dependencies such as the [`environment::Clock`]
//!
//! ## Architecture Principles
//!
//! - The event log is the system of record; projections can be rebuilt from it
//! - No global state: stores are explicit instances, injected as trait objects
//! - Explicit errors: every failure is a typed variant, nothing is swallowed
//!
//! ## Example
//!
//! ```ignore
//! use special_offers_core::offer::{Money, SpecialOffer};
//! use special_offers_core::offer_store::SpecialOfferStore;
//!
//! async fn publish(store: &dyn SpecialOfferStore) -> Result<(), Box<dyn std::error::Error>> {
//!     let id = store
//!         .add(SpecialOffer::new(1, "Half price socks", Money::new("eur", 2.5)))
//!         .await?;
//!     store.save().await?;
//!
//!     let stored = store.get(id).await?;
//!     assert!(stored.is_some());
//!     Ok(())
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Injected dependencies (clock)
pub mod environment;

/// Event trait and event record types
pub mod event;

/// Event store trait
pub mod event_store;

/// Special offer aggregate and events
pub mod offer;

/// Special offer store trait
pub mod offer_store;

/// Global sequence numbers
pub mod sequence;
