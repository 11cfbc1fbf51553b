// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use banner_store::{EventNotifier, NotifyError, Occurrence};
use jiff::Timestamp;
use tick::Clock;

use crate::{BannerEvent, MessageWriter};

/// Publishes every occurrence as a JSON [`BannerEvent`].
///
/// The event timestamp is taken from the supplied [`Clock`] when the occurrence is
/// delivered, not when the show or click was recorded.
#[derive(Debug)]
pub struct EventProducer<W> {
    writer: W,
    clock: Clock,
}

impl<W> EventProducer<W> {
    /// Creates a producer that writes to `writer`.
    #[must_use]
    pub fn new(writer: W, clock: Clock) -> Self {
        Self { writer, clock }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Builds the event for `occurrence` stamped with the current time.
    #[must_use]
    pub fn event(&self, occurrence: Occurrence) -> BannerEvent {
        BannerEvent::new(occurrence, self.clock.system_time_as::<Timestamp>())
    }
}

impl<W: MessageWriter> EventNotifier for EventProducer<W> {
    async fn notify(&self, occurrence: Occurrence) -> Result<(), NotifyError> {
        let payload = self.event(occurrence).to_vec().map_err(NotifyError::from_source)?;
        self.writer.write_message(payload).await
    }
}
