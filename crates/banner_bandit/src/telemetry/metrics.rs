// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use opentelemetry::{
    InstrumentationScope,
    metrics::{Counter, Gauge, Histogram, Meter, MeterProvider},
};

const METER_NAME: &str = "banner_bandit";
const VERSION: &str = "v0.1.0";
const SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.47.0";
const BANDIT_EVENT_COUNT_NAME: &str = "bandit.event.count";
const BANDIT_STORE_DURATION_NAME: &str = "bandit.store.duration";
const BANDIT_CACHE_SIZE_NAME: &str = "bandit.cache.size";

pub(crate) fn create_meter(meter_provider: &dyn MeterProvider) -> Meter {
    meter_provider.meter_with_scope(
        InstrumentationScope::builder(METER_NAME)
            .with_version(VERSION)
            .with_schema_url(SCHEMA_URL)
            .build(),
    )
}

pub(crate) fn create_event_counter(meter: &Meter) -> Counter<u64> {
    meter
        .u64_counter(BANDIT_EVENT_COUNT_NAME)
        .with_description("Bandit events")
        .with_unit("{event}")
        .build()
}

pub(crate) fn create_store_duration_histogram(meter: &Meter) -> Histogram<f64> {
    meter
        .f64_histogram(BANDIT_STORE_DURATION_NAME)
        .with_description("Duration of statistics store calls")
        .with_unit("s")
        .build()
}

pub(crate) fn create_cache_size_gauge(meter: &Meter) -> Gauge<u64> {
    meter
        .u64_gauge(BANDIT_CACHE_SIZE_NAME)
        .with_description("Number of (slot, group) entries in the statistics cache")
        .with_unit("{entry}")
        .build()
}

#[cfg(test)]
pub(crate) const EVENT_COUNT: &str = BANDIT_EVENT_COUNT_NAME;

#[cfg(test)]
pub(crate) const STORE_DURATION: &str = BANDIT_STORE_DURATION_NAME;

#[cfg(test)]
pub(crate) const CACHE_SIZE: &str = BANDIT_CACHE_SIZE_NAME;
