// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! JSON events for banner shows and clicks.
//!
//! [`EventProducer`] is an [`EventNotifier`](banner_store::EventNotifier) that stamps each
//! occurrence with the current time, serializes it as a [`BannerEvent`] and hands the bytes
//! to a [`MessageWriter`]. Plug a message-broker client in by implementing [`MessageWriter`];
//! the `channel` feature provides [`ChannelWriter`], which feeds a bounded Tokio channel.
//!
//! # Examples
//!
//! ```no_run
//! use banner_events::{BannerEvent, ChannelWriter, EventProducer};
//! use banner_store::{BannerId, EventNotifier, GroupId, Occurrence, SlotId};
//! use tick::Clock;
//!
//! # async fn example(clock: Clock) -> Result<(), Box<dyn std::error::Error>> {
//! let (writer, mut receiver) = ChannelWriter::new(1024);
//! let producer = EventProducer::new(writer, clock);
//!
//! producer
//!     .notify(Occurrence::show(SlotId::new(1), BannerId::new(7), GroupId::new(2)))
//!     .await?;
//!
//! let payload = receiver.recv().await.ok_or("channel closed")?;
//! let event = BannerEvent::from_slice(&payload)?;
//! assert_eq!(event.banner_id, 7);
//! # Ok(())
//! # }
//! ```

mod event;
mod producer;
mod writer;

#[doc(inline)]
pub use event::{BannerEvent, EventType};
#[doc(inline)]
pub use producer::EventProducer;
#[cfg(any(feature = "channel", test))]
#[doc(inline)]
pub use writer::ChannelWriter;
#[doc(inline)]
pub use writer::MessageWriter;
