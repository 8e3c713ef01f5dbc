#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod error;
pub mod models;
pub mod rest;
pub(crate) mod serde_helpers;
#[cfg(feature = "ws")]
pub mod streaming;
#[cfg(feature = "ws")]
pub mod ws;

pub use auth::Token;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Normalize a streaming frame tag (`messagingMessage`, `messaging_message`) to the
/// `MESSAGING_MESSAGE` form used by the dispatch table.
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    serde_helpers::normalize_tag(tag)
}
