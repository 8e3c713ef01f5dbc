use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde_json::json;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use super::dispatcher::{BoxError, EventDispatcher};
use super::event::{Event, EventName};
use super::router::{NotificationFilter, Router};
use crate::Result;
use crate::auth::Token;
use crate::error::Error;
use crate::rest;
use crate::ws::{Config, Connection, ConnectionState, WsError};

/// Derive the streaming endpoint from a REST host: `https` becomes `wss`, `http`
/// becomes `ws`, and the path is `/streaming`.
///
/// # Errors
///
/// Returns a validation error for hosts that are not `http(s)` or `ws(s)` URLs.
pub fn streaming_url(host: &Url) -> Result<Url> {
    let scheme = match host.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(Error::validation(format!(
                "cannot derive a streaming endpoint from a {other} URL"
            )));
        }
    };

    let mut url = host.clone();
    url.set_scheme(scheme)
        .map_err(|()| Error::validation(format!("cannot use {scheme} for {host}")))?;
    url.set_path("/streaming");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Streaming client: keeps one connection to the streaming endpoint alive and turns
/// its frames into typed events.
///
/// Register callbacks with [`Client::on`] before calling [`Client::run`]. The run loop
/// handles one frame at a time: a frame is routed and all of its callbacks have
/// returned before the next frame is read. Callbacks that start slow work, such as a
/// REST call answering a note, should hand it to [`tokio::spawn`].
///
/// # Example
///
/// ```no_run
/// use misskey_client_sdk::streaming::{Client, Event, EventName};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("https://misskey.example", "token".into())?;
///
/// client.on(EventName::Message, |event| async move {
///     if let Event::Note(note) = event {
///         tokio::spawn(async move { note.react(":blobcat:").await });
///     }
///     Ok::<(), misskey_client_sdk::error::Error>(())
/// });
///
/// client.run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    rest: rest::Client,
    endpoint: Url,
    token: Token,
    config: Config,
    notifications: NotificationFilter,
    dispatcher: EventDispatcher,
    cancel: CancellationToken,
    state_tx: watch::Sender<ConnectionState>,
    running: AtomicBool,
}

/// Clears the running flag when a run loop ends, including when its future is dropped.
struct RunGuard<'flag>(&'flag AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Client {
    /// Creates a REST and streaming client for `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or the HTTP client fails to build.
    pub fn new(host: &str, token: Token) -> Result<Self> {
        let rest = rest::Client::new(host, token.clone())?;
        let endpoint = streaming_url(&Url::parse(host)?)?;

        Ok(Self::with_endpoint(rest, endpoint, token))
    }

    /// Creates a streaming client with an explicit endpoint, e.g. `wss://host/streaming`.
    #[must_use]
    pub fn with_endpoint(rest: rest::Client, endpoint: Url, token: Token) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            rest,
            endpoint,
            token,
            config: Config::default(),
            notifications: NotificationFilter::default(),
            dispatcher: EventDispatcher::new(),
            cancel: CancellationToken::new(),
            state_tx,
            running: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Notification kinds to forward, [`NotificationFilter::REACTION`] by default.
    #[must_use]
    pub fn with_notifications(mut self, notifications: NotificationFilter) -> Self {
        self.notifications = notifications;
        self
    }

    /// Register `callback` for every event dispatched under `name`.
    pub fn on<F, Fut, E>(&self, name: EventName, callback: F)
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        self.dispatcher.on(name, callback);
    }

    /// The REST handle shared with every dispatched object.
    #[must_use]
    pub fn rest(&self) -> &rest::Client {
        &self.rest
    }

    #[must_use]
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Subscribe to connection state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// A token that stops [`Client::run`] when cancelled. Callbacks can hold a clone.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop [`Client::run`], including while it waits for a frame or a retry.
    ///
    /// Shutdown is final: a client that has been shut down cannot run again. Build a new
    /// client to reconnect.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Connect and process frames until [`Client::shutdown`] is called.
    ///
    /// Lost connections are re-established transparently. The first connection emits
    /// [`EventName::Ready`], later ones [`EventName::Reconnect`], and each lost
    /// connection [`EventName::Disconnect`].
    ///
    /// # Errors
    ///
    /// Returns a validation error if the client is already running or has been shut
    /// down. Otherwise returns an error if the dispatch table is incomplete or a
    /// connection attempt fails for a reason other than a connector failure, such as a
    /// rejected upgrade.
    pub async fn run(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::validation("streaming client has been shut down"));
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::validation("streaming client is already running"));
        }
        let _running = RunGuard(&self.running);

        let router = Router::new(
            self.rest.clone(),
            self.dispatcher.clone(),
            self.notifications,
        )?;

        let result = tokio::select! {
            () = self.cancel.cancelled() => Ok(()),
            result = self.supervise(&router) => result,
        };

        self.state_tx.send_replace(ConnectionState::Disconnected);

        #[cfg(feature = "tracing")]
        tracing::info!(endpoint = %self.endpoint, "Streaming client stopped");

        result
    }

    async fn supervise(&self, router: &Router) -> Result<()> {
        let url = self.token.authorize_url(&self.endpoint);
        let mut backoff = self.config.reconnect.strategy();
        let mut lost = 0_u32;

        loop {
            self.state_tx.send_replace(ConnectionState::Connecting);

            let mut connection = Connection::connect(
                &url,
                backoff.as_mut(),
                self.config.connect_timeout,
                self.config.close_grace,
            )
            .await?;

            self.state_tx.send_replace(ConnectionState::Connected {
                since: Instant::now(),
            });

            #[cfg(feature = "tracing")]
            tracing::info!(
                endpoint = %self.endpoint,
                reconnect = (lost > 0),
                "Connected to streaming endpoint"
            );

            let (name, event) = if lost == 0 {
                (EventName::Ready, Event::Ready)
            } else {
                (EventName::Reconnect, Event::Reconnect)
            };
            self.dispatcher.dispatch(name, event).await;

            self.join_channels(&mut connection).await;
            self.pump(&mut connection, router).await;

            lost = lost.saturating_add(1);
            self.state_tx.send_replace(ConnectionState::Reconnecting { attempt: lost });
            self.dispatcher
                .dispatch(EventName::Disconnect, Event::Disconnect)
                .await;

            if let Err(e) = connection.close().await {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %e, "Error closing spent connection");
                #[cfg(not(feature = "tracing"))]
                let _ = &e;
            }
        }
    }

    async fn join_channels(&self, connection: &mut Connection) {
        for channel in &self.config.channels {
            let request = json!({
                "type": "connect",
                "body": { "channel": channel.as_ref(), "id": Uuid::new_v4().to_string() }
            });

            if let Err(e) = connection.send(&request).await {
                // The next poll observes the broken socket and triggers a reconnect.
                #[cfg(feature = "tracing")]
                tracing::warn!(%channel, error = %e, "Failed to join channel");
                #[cfg(not(feature = "tracing"))]
                let _ = &e;
                return;
            }
        }
    }

    /// Poll and route frames until the connection is spent.
    async fn pump(&self, connection: &mut Connection, router: &Router) {
        loop {
            match connection.poll(self.config.poll_timeout).await {
                Ok(Some(frame)) => match router.route_frame(frame).await {
                    Ok(routed) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(?routed, "Routed frame");
                        #[cfg(not(feature = "tracing"))]
                        let _ = &routed;
                    }
                    Err(e) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(error = %e, "Dropping frame that could not be routed");
                        #[cfg(not(feature = "tracing"))]
                        let _ = &e;
                    }
                },
                Ok(None) => {}
                Err(e) if matches!(e.downcast_ref::<WsError>(), Some(WsError::Decode(_))) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, "Dropping malformed frame");
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(reason = %e, "Streaming connection lost, reconnecting");
                    #[cfg(not(feature = "tracing"))]
                    let _ = &e;
                    return;
                }
            }
        }
    }
}
