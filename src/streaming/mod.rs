//! Real-time events over the Misskey streaming API.
//!
//! **Feature flag:** `ws` (enabled by default)
//!
//! Frames flow through four stages:
//!
//! 1. [`crate::ws::Connection`] reads one frame and decodes its JSON.
//! 2. [`Router`] normalizes the frame's type tag, unwraps channel envelopes and
//!    decodes the payload into a domain object bound to the REST client.
//! 3. [`EventDispatcher`] hands the resulting [`Event`] to every callback registered
//!    under its [`EventName`].
//! 4. [`Client`] supervises the whole loop, reconnecting when the server drops the
//!    connection and joining the configured channels after every connect.

pub mod client;
pub mod dispatcher;
pub mod event;
pub mod router;

pub use client::{Client, streaming_url};
pub use dispatcher::{BoxError, EventDispatcher};
pub use event::{Event, EventName};
pub use router::{NotificationFilter, Routed, Router};
