//! Event store and offer projection benchmarks
//!
//! Measures:
//! - Append throughput on the in-memory log
//! - Range query cost as the log grows
//! - Offer add/update (append + projection write under one lock)
//! - Rebuilding the projection from the log
//!
//! Run with: `cargo bench -p special-offers-runtime`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use special_offers_core::event::SerializedEvent;
use special_offers_core::event_store::EventStore;
use special_offers_core::offer::{Money, SpecialOffer};
use special_offers_core::offer_store::SpecialOfferStore;
use special_offers_core::sequence::SequenceNumber;
use special_offers_runtime::{InMemoryEventStore, InMemorySpecialOfferStore};
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

fn payload() -> SerializedEvent {
    SerializedEvent::new("BenchEvent".to_string(), vec![0; 256], None)
}

fn offer(product_catalog_id: i64) -> SpecialOffer {
    SpecialOffer::new(product_catalog_id, "bench offer", Money::new("eur", 1.0))
}

/// Append throughput (events/sec)
fn benchmark_raise(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_store_raise");
    group.throughput(Throughput::Elements(1));
    let runtime = runtime();

    group.bench_function("raise", |b| {
        let store = InMemoryEventStore::new();
        b.to_async(&runtime).iter(|| async {
            let _ = store.raise(black_box(payload())).await;
        });
    });

    group.finish();
}

/// Range queries over logs of increasing size
fn benchmark_get_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_store_get_events");
    let runtime = runtime();

    for size in [100_u64, 1_000, 10_000] {
        let store = InMemoryEventStore::new();
        runtime.block_on(async {
            for _ in 0..size {
                store.raise(payload()).await.expect("raise");
            }
        });

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("full_range", size), &size, |b, _| {
            b.to_async(&runtime).iter(|| async {
                let _ = store
                    .get_events(black_box(SequenceNumber::FIRST), black_box(SequenceNumber::MAX))
                    .await;
            });
        });

        let middle = SequenceNumber::new(size / 2);
        group.throughput(Throughput::Elements(10));
        group.bench_with_input(BenchmarkId::new("ten_from_middle", size), &size, |b, _| {
            b.to_async(&runtime).iter(|| async {
                let _ = store
                    .get_events(middle, SequenceNumber::new(middle.value() + 9))
                    .await;
            });
        });
    }

    group.finish();
}

/// Offer mutations, each raising one event
fn benchmark_offer_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("offer_store");
    group.throughput(Throughput::Elements(1));
    let runtime = runtime();

    group.bench_function("add", |b| {
        let offers = InMemorySpecialOfferStore::new(Arc::new(InMemoryEventStore::new()));
        b.to_async(&runtime).iter(|| async {
            let _ = offers.add(black_box(offer(1))).await;
        });
    });

    group.bench_function("update", |b| {
        let offers = InMemorySpecialOfferStore::new(Arc::new(InMemoryEventStore::new()));
        let id = runtime.block_on(offers.add(offer(1))).expect("add");
        b.to_async(&runtime).iter(|| async {
            let _ = offers.update(black_box(offer(2).with_id(id))).await;
        });
    });

    group.finish();
}

/// Projection rebuild from a populated log
fn benchmark_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("offer_store_replay");
    let runtime = runtime();

    let event_store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    runtime.block_on(async {
        let offers = InMemorySpecialOfferStore::new(Arc::clone(&event_store));
        for product in 0..1_000 {
            offers.add(offer(product)).await.expect("add");
        }
    });

    group.throughput(Throughput::Elements(1_000));
    group.bench_function("replay_1000", |b| {
        b.to_async(&runtime).iter(|| async {
            let _ = InMemorySpecialOfferStore::replay(Arc::clone(&event_store)).await;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_raise,
    benchmark_get_events,
    benchmark_offer_store,
    benchmark_replay,
);
criterion_main!(benches);
