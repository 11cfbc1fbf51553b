// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Show and click events leaving the bandit.

use std::time::Duration;

use anyspawn::Spawner;
use banner_bandit::Bandit;
use banner_events::{BannerEvent, ChannelWriter, EventProducer, EventType};
use banner_store::testing::{MockStore, RecordingNotifier, StoreOp};
use banner_store::{BannerId, BannerStat, GroupId, Occurrence, SlotId, StatsStore};
use tick::{Clock, ClockControl};

const SLOT: SlotId = SlotId::new(3);
const GROUP: GroupId = GroupId::new(4);
const BANNER: BannerId = BannerId::new(5);

fn inline_spawner() -> Spawner {
    Spawner::new_custom(|work| futures::executor::block_on(work))
}

async fn seeded() -> MockStore {
    let store = MockStore::new();
    store.add_banner_to_slot(SLOT, BANNER).await.unwrap();
    store
}

#[tokio::test]
async fn shows_and_clicks_are_published_as_json() {
    let control = ClockControl::new();
    control.advance(Duration::from_secs(1_714_557_600));
    let (writer, mut receiver) = ChannelWriter::new(16);

    let bandit = Bandit::builder(seeded().await, Clock::new_frozen())
        .notifier(EventProducer::new(writer, control.to_clock()))
        .spawner(Spawner::new_tokio())
        .build();

    let banner = bandit.choose_banner(SLOT, GROUP).await.unwrap();
    bandit.record_click(SLOT, banner, GROUP).await.unwrap();

    let mut events = vec![
        BannerEvent::from_slice(&receiver.recv().await.unwrap()).unwrap(),
        BannerEvent::from_slice(&receiver.recv().await.unwrap()).unwrap(),
    ];
    events.sort_by_key(|event| event.kind == EventType::Click);

    assert_eq!(events[0].occurrence(), Occurrence::show(SLOT, BANNER, GROUP));
    assert_eq!(events[1].occurrence(), Occurrence::click(SLOT, BANNER, GROUP));
    for event in &events {
        assert_eq!(event.timestamp.to_string(), "2024-05-01T10:00:00Z");
    }
}

#[tokio::test]
async fn every_recorded_action_is_notified_once() {
    let notifier = RecordingNotifier::new();
    let bandit = Bandit::builder(seeded().await, Clock::new_frozen())
        .notifier(notifier.clone())
        .spawner(inline_spawner())
        .build();

    for _ in 0..3 {
        bandit.choose_banner(SLOT, GROUP).await.unwrap();
    }
    bandit.record_click(SLOT, BANNER, GROUP).await.unwrap();
    bandit.add_banner_to_slot(SLOT, BannerId::new(6)).await.unwrap();

    let show = Occurrence::show(SLOT, BANNER, GROUP);
    let click = Occurrence::click(SLOT, BANNER, GROUP);
    assert_eq!(notifier.occurrences(), vec![show, show, show, click]);
}

#[tokio::test]
async fn notifier_failure_does_not_fail_the_operation() {
    let store = seeded().await;
    let notifier = RecordingNotifier::new();
    notifier.set_failing(true);
    let bandit = Bandit::builder(store.clone(), Clock::new_frozen())
        .notifier(notifier.clone())
        .spawner(inline_spawner())
        .build();

    let banner = bandit.choose_banner(SLOT, GROUP).await.unwrap();
    bandit.record_click(SLOT, banner, GROUP).await.unwrap();

    assert_eq!(notifier.occurrences().len(), 2);
    assert_eq!(store.inner().stats_for(SLOT, BANNER, GROUP), Some(BannerStat::new(1, 1)));
}

#[tokio::test]
async fn store_failure_sends_no_event() {
    let store = seeded().await;
    let notifier = RecordingNotifier::new();
    let bandit = Bandit::builder(store.clone(), Clock::new_frozen())
        .notifier(notifier.clone())
        .spawner(inline_spawner())
        .build();

    store.fail_when(|op| matches!(op, StoreOp::RecordShow { .. } | StoreOp::RecordClick { .. }));

    assert!(bandit.choose_banner(SLOT, GROUP).await.unwrap_err().is_store_failure());
    assert!(bandit.record_click(SLOT, BANNER, GROUP).await.unwrap_err().is_store_failure());
    assert!(notifier.occurrences().is_empty());
}

#[tokio::test]
async fn full_event_channel_does_not_fail_the_operation() {
    let (writer, mut receiver) = ChannelWriter::new(1);
    let bandit = Bandit::builder(seeded().await, Clock::new_frozen())
        .notifier(EventProducer::new(writer, Clock::new_frozen()))
        .spawner(inline_spawner())
        .build();

    for _ in 0..3 {
        bandit.choose_banner(SLOT, GROUP).await.unwrap();
    }

    assert_eq!(bandit.cached_stats(SLOT, GROUP).unwrap().total_shows(), 3);
    assert!(receiver.recv().await.is_some());
    assert!(receiver.try_recv().is_err());
}
