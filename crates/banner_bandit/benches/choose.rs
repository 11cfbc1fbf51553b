// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Benchmarks for choosing banners and recording clicks on a warm cache.

#![allow(missing_docs, reason = "Benchmark code")]

use std::hint::black_box;

use banner_bandit::Bandit;
use banner_store::{BannerId, GroupId, InMemoryStore, SlotId, StatsStore};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tick::Clock;
use tokio::runtime::Runtime;

const SLOT: SlotId = SlotId::new(1);
const GROUP: GroupId = GroupId::new(1);

fn rt() -> Runtime {
    Runtime::new().expect("failed to create runtime")
}

fn warm_bandit(rt: &Runtime, banners: u64) -> Bandit<InMemoryStore> {
    rt.block_on(async {
        let store = InMemoryStore::new();
        for banner in 0..banners {
            store
                .add_banner_to_slot(SLOT, BannerId::new(banner))
                .await
                .expect("in-memory store never fails");
        }

        let bandit = Bandit::builder(store, Clock::new_tokio()).build();
        bandit.choose_banner(SLOT, GROUP).await.expect("slot has banners");
        bandit
    })
}

fn bench_choose(c: &mut Criterion) {
    let rt = rt();
    let mut group = c.benchmark_group("choose_banner");

    for banners in [2_u64, 16, 128] {
        let bandit = warm_bandit(&rt, banners);
        group.bench_with_input(BenchmarkId::from_parameter(banners), &banners, |b, _| {
            b.iter(|| rt.block_on(async { black_box(bandit.choose_banner(black_box(SLOT), black_box(GROUP)).await) }));
        });
    }

    group.finish();
}

fn bench_click(c: &mut Criterion) {
    let rt = rt();
    let bandit = warm_bandit(&rt, 16);

    c.bench_function("record_click", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(
                    bandit
                        .record_click(black_box(SLOT), black_box(BannerId::new(3)), black_box(GROUP))
                        .await,
                )
            })
        });
    });
}

criterion_group!(benches, bench_choose, bench_click);
criterion_main!(benches);
