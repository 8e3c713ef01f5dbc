#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// WebSocket error variants.
#[non_exhaustive]
#[derive(Debug)]
pub enum WsError {
    /// Error connecting to or communicating with the WebSocket server
    Connection(tokio_tungstenite::tungstenite::Error),
    /// A connection attempt did not complete in time
    ConnectTimeout(Duration),
    /// The server closed the connection; the caller should reconnect
    ReconnectRequested,
    /// A frame was not valid JSON
    Decode(serde_json::Error),
    /// A frame was valid JSON but not shaped like a Misskey event
    InvalidMessage(String),
    /// An event callback returned an error or panicked
    Callback(String),
}

impl WsError {
    /// Whether a failed connection attempt is worth retrying.
    ///
    /// Only connector-level failures qualify: DNS, refused or reset TCP connections,
    /// attempts that time out and handshakes cut short. A rejected upgrade, a bad URL or a
    /// TLS setup error is final.
    #[must_use]
    pub fn is_connector_failure(&self) -> bool {
        use tokio_tungstenite::tungstenite::Error as TungsteniteError;
        use tokio_tungstenite::tungstenite::error::ProtocolError;

        matches!(
            self,
            Self::ConnectTimeout(_)
                | Self::Connection(
                    TungsteniteError::Io(_)
                        | TungsteniteError::ConnectionClosed
                        | TungsteniteError::Protocol(ProtocolError::HandshakeIncomplete)
                )
        )
    }
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "WebSocket connection error: {e}"),
            Self::ConnectTimeout(wait) => {
                write!(f, "WebSocket connection attempt timed out after {wait:?}")
            }
            Self::ReconnectRequested => write!(f, "WebSocket connection closed, reconnect requested"),
            Self::Decode(e) => write!(f, "Failed to decode WebSocket frame: {e}"),
            Self::InvalidMessage(msg) => write!(f, "Invalid WebSocket message: {msg}"),
            Self::Callback(msg) => write!(f, "Event callback failed: {msg}"),
        }
    }
}

impl StdError for WsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Connection(e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

// Integration with main Error type
impl From<WsError> for crate::error::Error {
    fn from(e: WsError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::WebSocket, e)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for crate::error::Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        crate::error::Error::with_source(crate::error::Kind::WebSocket, WsError::Connection(e))
    }
}
