// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use banner_store::NotifyError;

/// Sink for serialized events, typically a message-broker producer.
pub trait MessageWriter: Send + Sync {
    /// Writes one serialized event.
    fn write_message(&self, payload: Vec<u8>) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// A [`MessageWriter`] that feeds a bounded Tokio channel.
///
/// Writes never wait for capacity. A full or closed channel is reported as a
/// [`NotifyError`] and the payload is dropped.
#[cfg(any(feature = "channel", test))]
#[derive(Clone, Debug)]
pub struct ChannelWriter {
    sender: tokio::sync::mpsc::Sender<Vec<u8>>,
}

#[cfg(any(feature = "channel", test))]
impl ChannelWriter {
    /// Creates a writer and the receiving end of its channel.
    ///
    /// A `capacity` of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, tokio::sync::mpsc::Receiver<Vec<u8>>) {
        let (sender, receiver) = tokio::sync::mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[cfg(any(feature = "channel", test))]
impl MessageWriter for ChannelWriter {
    async fn write_message(&self, payload: Vec<u8>) -> Result<(), NotifyError> {
        use tokio::sync::mpsc::error::TrySendError;

        self.sender.try_send(payload).map_err(|error| match error {
            TrySendError::Full(_) => NotifyError::from_message("event channel is full"),
            TrySendError::Closed(_) => NotifyError::from_message("event channel is closed"),
        })
    }
}
