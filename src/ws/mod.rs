//! Core WebSocket infrastructure.
//!
//! This module provides the transport half of the streaming client: opening a socket
//! with connector-failure retries and polling it one frame at a time. Routing decoded
//! frames to events lives in [`crate::streaming`].
//!
//! # Architecture
//!
//! - [`Connection`]: one live socket with `connect`, `poll`, `send` and `close`
//! - [`Config`]: poll timeout, close grace interval, retry strategy and channels
//! - [`WsError`]: transport-level failure causes

pub mod config;
pub mod connection;
pub mod error;

pub use config::{Channel, Config, ReconnectConfig};
pub use connection::{Connection, ConnectionState};
#[expect(
    clippy::module_name_repetitions,
    reason = "WsError includes module name for clarity when used outside this module"
)]
pub use error::WsError;
