// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bandit telemetry: structured `tracing` events and OpenTelemetry metrics.
//!
//! With the `logs` feature every notable step of an operation is emitted as a
//! `bandit.event` tracing event. With the `metrics` feature the same steps are counted,
//! store calls are timed and the cache size is reported as a gauge.

#[cfg(any(feature = "logs", feature = "metrics", test))]
use std::sync::Arc;
use std::time::Duration;

use banner_store::{NotifyError, Occurrence, SlotId};
#[cfg(any(feature = "logs", test))]
use opentelemetry::logs::Severity;

use crate::error::StoreOperation;

pub(crate) mod attributes;
#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(any(feature = "logs", feature = "metrics", test))]
mod recorder;
#[cfg(test)]
pub(crate) mod testing;

/// Telemetry sink of a [`Bandit`](crate::Bandit).
///
/// The default value records nothing. Pass a configured instance to
/// [`BanditBuilder::telemetry`](crate::BanditBuilder::telemetry).
///
/// # Examples
///
/// ```ignore
/// use banner_bandit::BanditTelemetry;
///
/// let meter = BanditTelemetry::meter(&meter_provider);
/// let telemetry = BanditTelemetry::new(true, Some(&meter));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BanditTelemetry {
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    inner: Option<Arc<recorder::TelemetryInner>>,
}

impl BanditTelemetry {
    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(unused_variables, reason = "no-op without logs or metrics")
    )]
    pub(crate) fn record(
        &self,
        name: &'static str,
        operation: BanditOperation,
        activity: BanditActivity,
        slot: SlotId,
        duration: Option<Duration>,
    ) {
        #[cfg(any(feature = "logs", feature = "metrics", test))]
        if let Some(recorder) = self.recorder() {
            recorder.record(name, operation, activity, slot, duration);
        }
    }

    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(unused_variables, reason = "no-op without logs or metrics")
    )]
    pub(crate) fn record_store_call(&self, name: &'static str, call: StoreOperation, duration: Duration) {
        #[cfg(any(feature = "logs", feature = "metrics", test))]
        if let Some(recorder) = self.recorder() {
            recorder.record_store_call(name, call, duration);
        }
    }

    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(unused_variables, reason = "no-op without logs or metrics")
    )]
    pub(crate) fn record_cache_size(&self, name: &'static str, size: usize) {
        #[cfg(any(feature = "logs", feature = "metrics", test))]
        if let Some(recorder) = self.recorder() {
            recorder.record_cache_size(name, size);
        }
    }

    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(unused_variables, reason = "no-op without logs or metrics")
    )]
    pub(crate) fn record_notifier_failure(&self, name: &'static str, occurrence: &Occurrence, error: &NotifyError) {
        #[cfg(any(feature = "logs", feature = "metrics", test))]
        if let Some(recorder) = self.recorder() {
            recorder.record_notifier_failure(name, occurrence, error);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BanditOperation {
    ChooseBanner,
    RecordClick,
    AddBanner,
    RemoveBanner,
    Load,
}

impl BanditOperation {
    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(dead_code, reason = "only read when telemetry is compiled in")
    )]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChooseBanner => "bandit.choose_banner",
            Self::RecordClick => "bandit.record_click",
            Self::AddBanner => "bandit.add_banner",
            Self::RemoveBanner => "bandit.remove_banner",
            Self::Load => "bandit.load",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BanditActivity {
    CacheHit,
    CacheMiss,
    CacheLoaded,
    CacheLoadRaced,
    CacheLoadSuperseded,
    CacheInvalidated,
    CacheStale,
    BannerExplored,
    BannerExploited,
    ShowRecorded,
    ClickRecorded,
    MembershipChanged,
    StoreError,
    NoBanners,
    NotifierError,
}

impl BanditActivity {
    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(dead_code, reason = "only read when telemetry is compiled in")
    )]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CacheHit => "cache.hit",
            Self::CacheMiss => "cache.miss",
            Self::CacheLoaded => "cache.loaded",
            Self::CacheLoadRaced => "cache.load_raced",
            Self::CacheLoadSuperseded => "cache.load_superseded",
            Self::CacheInvalidated => "cache.invalidated",
            Self::CacheStale => "cache.stale",
            Self::BannerExplored => "banner.explored",
            Self::BannerExploited => "banner.exploited",
            Self::ShowRecorded => "show.recorded",
            Self::ClickRecorded => "click.recorded",
            Self::MembershipChanged => "membership.changed",
            Self::StoreError => "store.error",
            Self::NoBanners => "no_banners",
            Self::NotifierError => "notifier.error",
        }
    }

    #[cfg(any(feature = "logs", test))]
    pub fn severity(self) -> Severity {
        match self {
            Self::CacheHit
            | Self::CacheMiss
            | Self::BannerExplored
            | Self::BannerExploited
            | Self::ShowRecorded
            | Self::ClickRecorded => Severity::Debug,
            Self::CacheLoaded
            | Self::CacheLoadRaced
            | Self::CacheLoadSuperseded
            | Self::CacheInvalidated
            | Self::CacheStale
            | Self::MembershipChanged => Severity::Info,
            Self::NoBanners | Self::NotifierError => Severity::Warn,
            Self::StoreError => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_as_str() {
        assert_eq!(BanditOperation::ChooseBanner.as_str(), "bandit.choose_banner");
        assert_eq!(BanditOperation::RecordClick.as_str(), "bandit.record_click");
        assert_eq!(BanditOperation::AddBanner.as_str(), "bandit.add_banner");
        assert_eq!(BanditOperation::RemoveBanner.as_str(), "bandit.remove_banner");
        assert_eq!(BanditOperation::Load.as_str(), "bandit.load");
    }

    #[test]
    fn activity_as_str() {
        assert_eq!(BanditActivity::CacheHit.as_str(), "cache.hit");
        assert_eq!(BanditActivity::CacheLoadSuperseded.as_str(), "cache.load_superseded");
        assert_eq!(BanditActivity::BannerExplored.as_str(), "banner.explored");
        assert_eq!(BanditActivity::CacheStale.as_str(), "cache.stale");
        assert_eq!(BanditActivity::MembershipChanged.as_str(), "membership.changed");
        assert_eq!(BanditActivity::NoBanners.as_str(), "no_banners");
        assert_eq!(BanditActivity::NotifierError.as_str(), "notifier.error");
    }

    #[test]
    fn activity_severity() {
        assert_eq!(BanditActivity::CacheHit.severity(), Severity::Debug);
        assert_eq!(BanditActivity::ShowRecorded.severity(), Severity::Debug);
        assert_eq!(BanditActivity::CacheLoaded.severity(), Severity::Info);
        assert_eq!(BanditActivity::CacheInvalidated.severity(), Severity::Info);
        assert_eq!(BanditActivity::CacheStale.severity(), Severity::Info);
        assert_eq!(BanditActivity::NoBanners.severity(), Severity::Warn);
        assert_eq!(BanditActivity::NotifierError.severity(), Severity::Warn);
        assert_eq!(BanditActivity::StoreError.severity(), Severity::Error);
    }
}
