//! Special offer store trait.
//!
//! The offer store is the read model: the current state of every offer, keyed by id.
//! Every mutation it accepts is also raised into the injected
//! [`EventStore`](crate::event_store::EventStore), after the state change has been
//! applied, so the event log remains the complete audit trail.

use crate::event::EventError;
use crate::event_store::EventStoreError;
use crate::offer::{OfferId, SpecialOffer};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors returned by offer store operations.
#[derive(Error, Debug)]
pub enum OfferStoreError {
    /// No offer with this id exists.
    #[error("Special offer not found: {0}")]
    NotFound(OfferId),

    /// The offer was never added, so it has no id to update.
    #[error("Special offer has no id; add it before updating")]
    MissingId,

    /// Every id has been handed out.
    #[error("Special offer ids exhausted")]
    IdsExhausted,

    /// The event for the mutation could not be raised. The mutation was not applied.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// The event payload could not be encoded or decoded.
    #[error("Event payload error: {0}")]
    Serialization(#[from] EventError),
}

/// CRUD-style access to special offers.
///
/// # Contract
///
/// - `add` assigns `max(existing ids) + 1` (or `1` when empty); concurrent adds never
///   share an id.
/// - `add` and `update` raise `"NewSpecialOffer"` / `"UpdatedSpecialOffer"` with the
///   stored offer as payload, after the state change is visible.
/// - Errors from the event store are never swallowed.
///
/// # Dyn Compatibility
///
/// Returns boxed futures so stores can be shared as `Arc<dyn SpecialOfferStore>`.
pub trait SpecialOfferStore: Send + Sync {
    /// Look up an offer. A missing id is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Only backend failures; the in-memory store never fails here.
    fn get(
        &self,
        id: OfferId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SpecialOffer>, OfferStoreError>> + Send + '_>>;

    /// Insert a new offer under a freshly assigned id and raise `"NewSpecialOffer"`.
    ///
    /// Any id already set on `offer` is ignored.
    ///
    /// # Errors
    ///
    /// - `EventStore`: the event could not be raised; the offer was not kept
    /// - `IdsExhausted`: no id left to assign
    fn add(
        &self,
        offer: SpecialOffer,
    ) -> Pin<Box<dyn Future<Output = Result<OfferId, OfferStoreError>> + Send + '_>>;

    /// Overwrite an existing offer and raise `"UpdatedSpecialOffer"`.
    ///
    /// # Errors
    ///
    /// - `MissingId`: `offer.id` is `None`
    /// - `NotFound`: no offer with that id exists
    /// - `EventStore`: the event could not be raised; the previous value was kept
    fn update(
        &self,
        offer: SpecialOffer,
    ) -> Pin<Box<dyn Future<Output = Result<(), OfferStoreError>> + Send + '_>>;

    /// Commit hook for the current unit of work.
    ///
    /// Once this returns, every prior `add`/`update` is durably visible. A volatile
    /// store has nothing to do.
    ///
    /// # Errors
    ///
    /// Only backend failures.
    fn save(&self) -> Pin<Box<dyn Future<Output = Result<(), OfferStoreError>> + Send + '_>>;
}
