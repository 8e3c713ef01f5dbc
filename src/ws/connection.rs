#![expect(
    clippy::module_name_repetitions,
    reason = "Connection types expose their domain in the name for clarity"
)]

use std::time::{Duration, Instant};

use backoff::backoff::Backoff;
use futures::{SinkExt as _, StreamExt as _};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use super::error::WsError;
use crate::Result;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection state tracking.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,
    /// Attempting to connect
    Connecting,
    /// Successfully connected
    Connected {
        /// When the connection was established
        since: Instant,
    },
    /// Connection lost, a new one is being set up
    Reconnecting {
        /// Number of connections lost so far
        attempt: u32,
    },
}

impl ConnectionState {
    /// Check if the connection is currently active.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

/// One live streaming session.
///
/// A `Connection` is owned by exactly one supervisor loop. Once [`Connection::poll`]
/// reports [`WsError::ReconnectRequested`] the connection is spent and must be closed
/// and replaced.
pub struct Connection {
    stream: WsStream,
    close_grace: Duration,
}

impl Connection {
    /// Open a connection to `url`, retrying connector failures forever.
    ///
    /// Each attempt is bounded by `connect_timeout`; an attempt that runs out of time counts
    /// as a connector failure. Between attempts the task sleeps for the next interval
    /// produced by `backoff`. The backoff is reset once a connection is established.
    ///
    /// # Errors
    ///
    /// Returns any failure that is not a connector failure, see
    /// [`WsError::is_connector_failure`].
    pub async fn connect(
        url: &Url,
        backoff: &mut (dyn Backoff + Send),
        connect_timeout: Duration,
        close_grace: Duration,
    ) -> Result<Self> {
        loop {
            let attempt = match timeout(connect_timeout, connect_async(url.as_str())).await {
                Ok(result) => result.map_err(WsError::Connection),
                Err(_elapsed) => Err(WsError::ConnectTimeout(connect_timeout)),
            };

            match attempt {
                Ok((stream, _response)) => {
                    backoff.reset();
                    return Ok(Self {
                        stream,
                        close_grace,
                    });
                }
                Err(error) => {
                    if !error.is_connector_failure() {
                        #[cfg(feature = "tracing")]
                        tracing::error!(endpoint = %redacted(url), error = %error, "Unable to connect");
                        return Err(error.into());
                    }

                    let wait = backoff.next_backoff().unwrap_or(close_grace);

                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        endpoint = %redacted(url),
                        error = %error,
                        retry_in = ?wait,
                        "Unable to connect, retrying"
                    );
                    #[cfg(not(feature = "tracing"))]
                    let _ = &error;

                    sleep(wait).await;
                }
            }
        }
    }

    /// Wait up to `wait` for the next frame.
    ///
    /// Returns `Ok(Some(frame))` for a JSON text frame (or a binary frame holding UTF-8
    /// text), and `Ok(None)` when the wait elapsed or the frame was a ping, pong or other
    /// non-data frame. When the server closes the connection or the transport fails, the
    /// call sleeps for the close grace interval and then fails with
    /// [`WsError::ReconnectRequested`].
    ///
    /// # Errors
    ///
    /// [`WsError::Decode`] for malformed JSON, which leaves the connection usable, and
    /// [`WsError::ReconnectRequested`] as described above.
    pub async fn poll(&mut self, wait: Duration) -> Result<Option<Value>> {
        let Ok(frame) = timeout(wait, self.stream.next()).await else {
            return Ok(None);
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(text = %text.as_str(), "Received WebSocket text message");

                decode(text.as_str()).map(Some)
            }
            Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                Ok(text) => decode(text).map(Some),
                Err(_) => Ok(None),
            },
            Some(Ok(Message::Close(frame))) => {
                #[cfg(feature = "tracing")]
                tracing::info!(?frame, "WebSocket closed by server");
                #[cfg(not(feature = "tracing"))]
                let _ = &frame;

                self.closed().await
            }
            Some(Err(e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "WebSocket transport error");
                #[cfg(not(feature = "tracing"))]
                let _ = &e;

                self.closed().await
            }
            None => self.closed().await,
            Some(Ok(_)) => Ok(None),
        }
    }

    async fn closed(&self) -> Result<Option<Value>> {
        sleep(self.close_grace).await;
        Err(WsError::ReconnectRequested.into())
    }

    /// Send a JSON request, e.g. a channel connect message.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be written to the socket.
    pub async fn send(&mut self, request: &Value) -> Result<()> {
        let text = serde_json::to_string(request)?;
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Close the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the close handshake cannot be written.
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

fn decode(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| WsError::Decode(e).into())
}

/// The endpoint without its query string, which carries the access token.
#[cfg(feature = "tracing")]
fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url
}
