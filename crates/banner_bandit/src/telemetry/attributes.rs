// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Field names must match the tracing fields emitted in recorder.rs.

#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) const BANDIT_NAME: &str = "bandit.name";

#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) const BANDIT_OPERATION_NAME: &str = "bandit.operation";

#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) const BANDIT_ACTIVITY_NAME: &str = "bandit.activity";

#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) const BANDIT_STORE_CALL_NAME: &str = "bandit.store_call";

#[cfg(test)]
pub(crate) const BANDIT_SLOT_NAME: &str = "bandit.slot";

#[cfg(test)]
pub(crate) const BANDIT_DURATION_NAME: &str = "bandit.duration_ns";

#[cfg(test)]
pub(crate) const BANDIT_EVENT_NAME: &str = "bandit.event";
