//! In-memory special offer projection.
//!
//! One write lock covers id assignment, the raise of the matching event and the
//! insert. The projection changes only after the raise succeeds, with no await in
//! between, so a failed raise or a dropped future leaves it untouched. Event order
//! matches id order.

use crate::metrics::OfferStoreMetrics;
use special_offers_core::event::SerializedEvent;
use special_offers_core::event_store::EventStore;
use special_offers_core::offer::{OfferId, SpecialOffer, SpecialOfferEvent};
use special_offers_core::offer_store::{OfferStoreError, SpecialOfferStore};
use special_offers_core::sequence::SequenceNumber;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Special offers held in process memory, backed by an injected event log.
pub struct InMemorySpecialOfferStore {
    offers: RwLock<BTreeMap<OfferId, SpecialOffer>>,
    event_store: Arc<dyn EventStore>,
}

impl InMemorySpecialOfferStore {
    /// Create an empty projection that raises its events into `event_store`.
    #[must_use]
    pub fn new(event_store: Arc<dyn EventStore>) -> Self {
        Self {
            offers: RwLock::new(BTreeMap::new()),
            event_store,
        }
    }

    /// Rebuild the projection from every special offer event in `event_store`.
    ///
    /// Events with other names are skipped. Replaying raises nothing.
    ///
    /// # Errors
    ///
    /// - `EventStore`: the log could not be read
    /// - `Serialization`: an offer event payload did not decode
    /// - `MissingId`: an offer event carried an offer without id
    pub async fn replay(event_store: Arc<dyn EventStore>) -> Result<Self, OfferStoreError> {
        let mut offers = BTreeMap::new();
        let mut applied = 0_usize;

        if let Some(latest) = event_store.latest_sequence_number().await? {
            for recorded in event_store.get_events(SequenceNumber::FIRST, latest).await? {
                if !SpecialOfferEvent::is_offer_event(recorded.name()) {
                    continue;
                }
                let offer = recorded.decode::<SpecialOfferEvent>()?.into_offer();
                let id = offer.id.ok_or(OfferStoreError::MissingId)?;
                offers.insert(id, offer);
                applied += 1;
            }
        }

        tracing::info!(applied, offers = offers.len(), "Replayed special offers");
        Ok(Self {
            offers: RwLock::new(offers),
            event_store,
        })
    }

    /// Number of offers in the projection.
    pub async fn len(&self) -> usize {
        self.offers.read().await.len()
    }

    /// Whether the projection holds no offers.
    pub async fn is_empty(&self) -> bool {
        self.offers.read().await.is_empty()
    }

    /// All assigned ids in ascending order.
    pub async fn ids(&self) -> Vec<OfferId> {
        self.offers.read().await.keys().copied().collect()
    }

    /// Every offer, ordered by id.
    pub async fn all(&self) -> Vec<SpecialOffer> {
        self.offers.read().await.values().cloned().collect()
    }
}

impl std::fmt::Debug for InMemorySpecialOfferStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySpecialOfferStore")
            .finish_non_exhaustive()
    }
}

impl SpecialOfferStore for InMemorySpecialOfferStore {
    fn get(
        &self,
        id: OfferId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SpecialOffer>, OfferStoreError>> + Send + '_>>
    {
        Box::pin(async move { Ok(self.offers.read().await.get(&id).cloned()) })
    }

    #[tracing::instrument(skip(self, offer), fields(product_catalog_id = offer.product_catalog_id))]
    fn add(
        &self,
        offer: SpecialOffer,
    ) -> Pin<Box<dyn Future<Output = Result<OfferId, OfferStoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut offers = self.offers.write().await;

            let id = match offers.last_key_value() {
                Some((last, _)) => last.checked_next().ok_or(OfferStoreError::IdsExhausted)?,
                None => OfferId::FIRST,
            };
            let offer = offer.with_id(id);
            let event = SerializedEvent::from_event(
                &SpecialOfferEvent::NewSpecialOffer(offer.clone()),
                None,
            )?;

            if let Err(error) = self.event_store.raise(event).await {
                OfferStoreMetrics::record_rejection("add");
                tracing::warn!(%id, %error, "Special offer not added, event not raised");
                return Err(error.into());
            }
            // No await between the raise and the insert: a dropped future leaves
            // either both or neither.
            offers.insert(id, offer);

            OfferStoreMetrics::record_mutation("add");
            tracing::info!(%id, "Special offer added");
            Ok(id)
        })
    }

    #[tracing::instrument(skip(self, offer), fields(id = ?offer.id))]
    fn update(
        &self,
        offer: SpecialOffer,
    ) -> Pin<Box<dyn Future<Output = Result<(), OfferStoreError>> + Send + '_>> {
        Box::pin(async move {
            let id = offer.id.ok_or(OfferStoreError::MissingId)?;
            let mut offers = self.offers.write().await;

            if !offers.contains_key(&id) {
                return Err(OfferStoreError::NotFound(id));
            }
            let event = SerializedEvent::from_event(
                &SpecialOfferEvent::UpdatedSpecialOffer(offer.clone()),
                None,
            )?;

            if let Err(error) = self.event_store.raise(event).await {
                OfferStoreMetrics::record_rejection("update");
                tracing::warn!(%id, %error, "Special offer not updated, event not raised");
                return Err(error.into());
            }
            offers.insert(id, offer);

            OfferStoreMetrics::record_mutation("update");
            tracing::info!(%id, "Special offer updated");
            Ok(())
        })
    }

    fn save(&self) -> Pin<Box<dyn Future<Output = Result<(), OfferStoreError>> + Send + '_>> {
        // Volatile storage: every mutation is already visible.
        Box::pin(async { Ok(()) })
    }
}
