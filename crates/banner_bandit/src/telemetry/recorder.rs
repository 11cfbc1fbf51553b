// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Recording of bandit telemetry.

use std::sync::Arc;
use std::time::Duration;

use banner_store::{EventKind, NotifyError, Occurrence, SlotId};
use opentelemetry::KeyValue;
#[cfg(any(feature = "logs", test))]
use opentelemetry::logs::Severity;
use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter, MeterProvider};

use crate::error::StoreOperation;
use crate::telemetry::metrics::{create_cache_size_gauge, create_event_counter, create_meter, create_store_duration_histogram};
use crate::telemetry::{BanditActivity, BanditOperation, BanditTelemetry, attributes};

#[derive(Debug)]
pub(crate) struct TelemetryInner {
    logging_enabled: bool,
    event_counter: Option<Counter<u64>>,
    store_duration: Option<Histogram<f64>>,
    cache_size: Option<Gauge<u64>>,
}

impl BanditTelemetry {
    /// Creates a telemetry sink.
    ///
    /// # Arguments
    ///
    /// * `logging_enabled` - Emit `tracing` events (requires the `logs` feature)
    /// * `meter` - Meter to create the instruments on, see [`BanditTelemetry::meter`]
    #[must_use]
    pub fn new(logging_enabled: bool, meter: Option<&Meter>) -> Self {
        Self {
            inner: Some(Arc::new(TelemetryInner {
                logging_enabled,
                event_counter: meter.map(create_event_counter),
                store_duration: meter.map(create_store_duration_histogram),
                cache_size: meter.map(create_cache_size_gauge),
            })),
        }
    }

    /// Returns a meter with this crate's instrumentation scope.
    #[must_use]
    pub fn meter(provider: &dyn MeterProvider) -> Meter {
        create_meter(provider)
    }

    pub(super) fn recorder(&self) -> Option<&TelemetryInner> {
        self.inner.as_deref()
    }
}

impl TelemetryInner {
    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(unused_variables, reason = "slot and duration are only logged")
    )]
    pub fn record(&self, name: &'static str, operation: BanditOperation, activity: BanditActivity, slot: SlotId, duration: Option<Duration>) {
        if let Some(counter) = &self.event_counter {
            counter.add(
                1,
                &[
                    KeyValue::new(attributes::BANDIT_NAME, name),
                    KeyValue::new(attributes::BANDIT_OPERATION_NAME, operation.as_str()),
                    KeyValue::new(attributes::BANDIT_ACTIVITY_NAME, activity.as_str()),
                ],
            );
        }

        if self.logging_enabled {
            #[cfg(any(feature = "logs", test))]
            emit(name, operation, activity, slot, duration);
        }
    }

    pub fn record_store_call(&self, name: &'static str, call: StoreOperation, duration: Duration) {
        if let Some(histogram) = &self.store_duration {
            histogram.record(
                duration.as_secs_f64(),
                &[
                    KeyValue::new(attributes::BANDIT_NAME, name),
                    KeyValue::new(attributes::BANDIT_STORE_CALL_NAME, call.as_str()),
                ],
            );
        }
    }

    pub fn record_cache_size(&self, name: &'static str, size: usize) {
        if let Some(gauge) = &self.cache_size {
            gauge.record(
                u64::try_from(size).unwrap_or(u64::MAX),
                &[KeyValue::new(attributes::BANDIT_NAME, name)],
            );
        }
    }

    #[cfg_attr(not(any(feature = "logs", test)), expect(unused_variables, reason = "the error is only logged"))]
    pub fn record_notifier_failure(&self, name: &'static str, occurrence: &Occurrence, error: &NotifyError) {
        let operation = match occurrence.kind {
            EventKind::Show => BanditOperation::ChooseBanner,
            EventKind::Click => BanditOperation::RecordClick,
        };
        let activity = BanditActivity::NotifierError;

        if let Some(counter) = &self.event_counter {
            counter.add(
                1,
                &[
                    KeyValue::new(attributes::BANDIT_NAME, name),
                    KeyValue::new(attributes::BANDIT_OPERATION_NAME, operation.as_str()),
                    KeyValue::new(attributes::BANDIT_ACTIVITY_NAME, activity.as_str()),
                ],
            );
        }

        if self.logging_enabled {
            #[cfg(any(feature = "logs", test))]
            tracing::warn!(
                bandit.name = name,
                bandit.operation = operation.as_str(),
                bandit.activity = activity.as_str(),
                bandit.slot = occurrence.slot.get(),
                bandit.banner = occurrence.banner.get(),
                bandit.group = occurrence.group.get(),
                error = %error,
                "bandit.event"
            );
        }
    }
}

#[cfg(any(feature = "logs", test))]
fn emit(name: &'static str, operation: BanditOperation, activity: BanditActivity, slot: SlotId, duration: Option<Duration>) {
    let op = operation.as_str();
    let act = activity.as_str();
    let slot = slot.get();
    let duration_ns = duration.map(|d| d.as_nanos());

    // Tracing level must be constant, so a macro selects the level.
    macro_rules! emit_event {
        ($level:ident) => {
            tracing::$level!(
                bandit.name = name,
                bandit.operation = op,
                bandit.activity = act,
                bandit.slot = slot,
                bandit.duration_ns = ?duration_ns,
                "bandit.event"
            )
        };
    }

    match activity.severity() {
        Severity::Error => emit_event!(error),
        Severity::Warn => emit_event!(warn),
        Severity::Info => emit_event!(info),
        Severity::Debug => emit_event!(debug),
        _ => {}
    }
}
