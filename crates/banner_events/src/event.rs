// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use banner_store::{BannerId, EventKind, GroupId, Occurrence, SlotId};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The `type` field of a [`BannerEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// A banner was displayed.
    Show,
    /// A banner was clicked.
    Click,
}

impl From<EventKind> for EventType {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Show => Self::Show,
            EventKind::Click => Self::Click,
        }
    }
}

impl From<EventType> for EventKind {
    fn from(kind: EventType) -> Self {
        match kind {
            EventType::Show => Self::Show,
            EventType::Click => Self::Click,
        }
    }
}

/// A show or click as published to analytics consumers.
///
/// Serializes to a flat JSON object with the fields `type`, `slot_id`, `banner_id`,
/// `group_id` and an RFC 3339 `timestamp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerEvent {
    /// Show or click.
    #[serde(rename = "type")]
    pub kind: EventType,
    /// The slot identifier.
    pub slot_id: u64,
    /// The banner identifier.
    pub banner_id: u64,
    /// The audience group identifier.
    pub group_id: u64,
    /// When the event was produced.
    pub timestamp: Timestamp,
}

impl BannerEvent {
    /// Builds the event for an occurrence observed at `timestamp`.
    #[must_use]
    pub fn new(occurrence: Occurrence, timestamp: Timestamp) -> Self {
        Self {
            kind: occurrence.kind.into(),
            slot_id: occurrence.slot.get(),
            banner_id: occurrence.banner.get(),
            group_id: occurrence.group.get(),
            timestamp,
        }
    }

    /// Returns the occurrence this event describes.
    #[must_use]
    pub fn occurrence(&self) -> Occurrence {
        Occurrence {
            kind: self.kind.into(),
            slot: SlotId::new(self.slot_id),
            banner: BannerId::new(self.banner_id),
            group: GroupId::new(self.group_id),
        }
    }

    /// Serializes the event as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parses an event from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a valid event.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
