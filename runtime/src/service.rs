//! Wiring for the special offers stores.

use crate::event_store::InMemoryEventStore;
use crate::offer_store::InMemorySpecialOfferStore;
use special_offers_core::environment::Clock;
use special_offers_core::event_store::EventStore;
use special_offers_core::offer_store::{OfferStoreError, SpecialOfferStore};
use std::sync::Arc;

/// Owns one event log and the offer projection that writes into it.
///
/// Consumers receive the stores as trait objects, so a durable event store can be
/// swapped in through [`SpecialOffersService::new`] without touching them.
///
/// # Example
///
/// ```
/// use special_offers_core::offer::{Money, SpecialOffer};
/// use special_offers_runtime::SpecialOffersService;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = SpecialOffersService::in_memory();
///
/// let id = service
///     .offers()
///     .add(SpecialOffer::new(1, "Half price socks", Money::new("eur", 2.5)))
///     .await?;
/// service.offers().save().await?;
///
/// assert!(service.offers().get(id).await?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SpecialOffersService {
    event_store: Arc<dyn EventStore>,
    offers: Arc<dyn SpecialOfferStore>,
}

impl SpecialOffersService {
    /// Fresh in-memory log and projection using the system clock.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEventStore::new()))
    }

    /// Fresh in-memory log stamped by `clock`, with its projection.
    #[must_use]
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(InMemoryEventStore::with_clock(clock)))
    }

    /// An empty projection writing into an existing event store.
    #[must_use]
    pub fn new(event_store: Arc<dyn EventStore>) -> Self {
        let offers = Arc::new(InMemorySpecialOfferStore::new(Arc::clone(&event_store)));
        Self {
            event_store,
            offers,
        }
    }

    /// Rebuild the projection from an existing event store.
    ///
    /// # Errors
    ///
    /// See [`InMemorySpecialOfferStore::replay`].
    pub async fn replay(event_store: Arc<dyn EventStore>) -> Result<Self, OfferStoreError> {
        let offers = Arc::new(InMemorySpecialOfferStore::replay(Arc::clone(&event_store)).await?);
        Ok(Self {
            event_store,
            offers,
        })
    }

    /// The event log.
    #[must_use]
    pub const fn event_store(&self) -> &Arc<dyn EventStore> {
        &self.event_store
    }

    /// The offer projection.
    #[must_use]
    pub const fn offers(&self) -> &Arc<dyn SpecialOfferStore> {
        &self.offers
    }
}

impl std::fmt::Debug for SpecialOffersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialOffersService").finish_non_exhaustive()
    }
}
