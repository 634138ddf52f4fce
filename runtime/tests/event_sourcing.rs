//! End-to-end tests: offers written through the service, read back from the log.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use special_offers_core::environment::Clock;
use special_offers_core::event::SerializedEvent;
use special_offers_core::event_store::EventStore;
use special_offers_core::offer::{Money, OfferId, SpecialOfferEvent};
use special_offers_core::sequence::SequenceNumber;
use special_offers_runtime::{InMemoryEventStore, SpecialOffersService};
use special_offers_testing::{init_test_tracing, sample_offer, test_clock};
use std::sync::Arc;

#[tokio::test]
async fn every_mutation_lands_in_the_log_in_order() {
    init_test_tracing();
    let clock = test_clock();
    let service = SpecialOffersService::in_memory_with_clock(Arc::new(clock.clone()));

    let first = service.offers().add(sample_offer(10)).await.unwrap();
    let second = service.offers().add(sample_offer(20)).await.unwrap();
    let mut changed = sample_offer(10).with_id(first);
    changed.price = Money::new("eur", 4.5);
    service.offers().update(changed.clone()).await.unwrap();
    service.offers().save().await.unwrap();

    let events = service
        .event_store()
        .get_events(SequenceNumber::FIRST, SequenceNumber::MAX)
        .await
        .unwrap();

    let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![
            SpecialOfferEvent::NEW,
            SpecialOfferEvent::NEW,
            SpecialOfferEvent::UPDATED
        ]
    );
    let numbers: Vec<u64> = events.iter().map(|e| e.sequence_number().value()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(events.iter().all(|e| e.timestamp() == clock.now()));

    let decoded: SpecialOfferEvent = events[1].decode().unwrap();
    assert_eq!(decoded.offer().id, Some(second));

    let decoded: SpecialOfferEvent = events[2].decode().unwrap();
    assert_eq!(decoded, SpecialOfferEvent::UpdatedSpecialOffer(changed));
}

#[tokio::test]
async fn replay_reproduces_the_projection() {
    init_test_tracing();
    let service = SpecialOffersService::in_memory();
    for product in 1..=5 {
        service.offers().add(sample_offer(product)).await.unwrap();
    }
    let mut changed = sample_offer(33).with_id(OfferId::new(3));
    changed.description = "Now even cheaper".to_string();
    service.offers().update(changed.clone()).await.unwrap();

    let rebuilt = SpecialOffersService::replay(Arc::clone(service.event_store()))
        .await
        .unwrap();

    for id in 1..=5 {
        let id = OfferId::new(id);
        assert_eq!(
            rebuilt.offers().get(id).await.unwrap(),
            service.offers().get(id).await.unwrap()
        );
    }
    assert_eq!(
        rebuilt.offers().get(OfferId::new(3)).await.unwrap(),
        Some(changed)
    );

    // New ids continue after the replayed ones, and both share one log
    let next = rebuilt.offers().add(sample_offer(6)).await.unwrap();
    assert_eq!(next, OfferId::new(6));
    assert_eq!(
        service.event_store().latest_sequence_number().await.unwrap(),
        Some(SequenceNumber::new(7))
    );
}

#[tokio::test]
async fn offers_share_the_log_with_other_events() {
    init_test_tracing();
    let event_store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    let service = SpecialOffersService::new(Arc::clone(&event_store));

    event_store
        .raise(SerializedEvent::new("CartCreated".to_string(), vec![1], None))
        .await
        .unwrap();
    service.offers().add(sample_offer(1)).await.unwrap();
    event_store
        .raise(SerializedEvent::new("CartCheckedOut".to_string(), vec![2], None))
        .await
        .unwrap();

    let events = event_store
        .get_events(SequenceNumber::new(2), SequenceNumber::new(2))
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), SpecialOfferEvent::NEW);
}

proptest! {
    #[test]
    fn range_queries_return_exactly_the_covered_events(
        count in 0_u64..40,
        first in 0_u64..50,
        last in 0_u64..50,
    ) {
        let store = InMemoryEventStore::new();
        let events = tokio_test::block_on(async {
            for i in 0..count {
                store
                    .raise(SerializedEvent::new(format!("E{i}"), vec![], None))
                    .await
                    .unwrap();
            }
            store
                .get_events(SequenceNumber::new(first), SequenceNumber::new(last))
                .await
                .unwrap()
        });

        let expected: Vec<u64> = (first.max(1)..=last.min(count)).collect();
        let actual: Vec<u64> = events.iter().map(|e| e.sequence_number().value()).collect();
        prop_assert_eq!(actual, expected);
    }
}
