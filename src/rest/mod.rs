//! Misskey REST API client.
//!
//! Every Misskey endpoint is a `POST` with a JSON body; authenticated calls carry the
//! access token as the `i` field of that body. The transport sits behind the
//! [`Requester`] trait so that domain objects only ever hold a cheap, cloneable
//! [`Client`] handle and tests can substitute their own transport.
//!
//! # Example
//!
//! ```no_run
//! use misskey_client_sdk::rest::Client;
//! use misskey_client_sdk::rest::types::request::NoteRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("https://misskey.example", "token".into())?;
//!
//! let note = client
//!     .create_note(&NoteRequest::builder().text("hello from rust").build())
//!     .await?;
//! note.react(":blobcat:").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod http;
pub mod types;

mod chat;
mod drive;
mod instance;
mod moderation;
mod notes;
mod users;

pub use client::{Client, Requester};
pub use http::HttpRequester;
