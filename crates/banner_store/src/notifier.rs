// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use crate::{BannerId, GroupId, NotifyError, SlotId};

/// The kind of user interaction being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A banner was displayed.
    Show,
    /// A displayed banner was clicked.
    Click,
}

impl EventKind {
    /// Returns the wire name of the event kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Click => "click",
        }
    }
}

/// A show or click that was recorded by the rotation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occurrence {
    /// Whether this is a show or a click.
    pub kind: EventKind,
    /// The slot the banner was shown in.
    pub slot: SlotId,
    /// The banner involved.
    pub banner: BannerId,
    /// The audience group of the user.
    pub group: GroupId,
}

impl Occurrence {
    /// Describes a recorded show.
    #[must_use]
    pub const fn show(slot: SlotId, banner: BannerId, group: GroupId) -> Self {
        Self {
            kind: EventKind::Show,
            slot,
            banner,
            group,
        }
    }

    /// Describes a recorded click.
    #[must_use]
    pub const fn click(slot: SlotId, banner: BannerId, group: GroupId) -> Self {
        Self {
            kind: EventKind::Click,
            slot,
            banner,
            group,
        }
    }
}

/// Receives shows and clicks for downstream analytics.
///
/// Delivery is best effort. The rotation engine dispatches notifications off the request
/// path and only logs a returned [`NotifyError`].
pub trait EventNotifier: Send + Sync {
    /// Delivers one occurrence.
    fn notify(&self, occurrence: Occurrence) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// A notifier that drops every occurrence.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl EventNotifier for NoopNotifier {
    async fn notify(&self, _occurrence: Occurrence) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl<N: EventNotifier> EventNotifier for Arc<N> {
    fn notify(&self, occurrence: Occurrence) -> impl Future<Output = Result<(), NotifyError>> + Send {
        N::notify(self, occurrence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names() {
        assert_eq!(EventKind::Show.as_str(), "show");
        assert_eq!(EventKind::Click.as_str(), "click");
    }

    #[test]
    fn constructors_set_kind() {
        let show = Occurrence::show(SlotId::new(1), BannerId::new(2), GroupId::new(3));
        assert_eq!(show.kind, EventKind::Show);
        assert_eq!(show.banner, BannerId::new(2));

        let click = Occurrence::click(SlotId::new(1), BannerId::new(2), GroupId::new(3));
        assert_eq!(click.kind, EventKind::Click);
    }

    #[tokio::test]
    async fn noop_accepts_everything() {
        let occurrence = Occurrence::show(SlotId::new(1), BannerId::new(1), GroupId::new(1));
        NoopNotifier.notify(occurrence).await.unwrap();
        Arc::new(NoopNotifier).notify(occurrence).await.unwrap();
    }
}
