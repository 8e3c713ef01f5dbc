use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dashmap::DashMap;
use futures::FutureExt as _;
use futures::future::BoxFuture;

use super::event::{Event, EventName};
use crate::ws::WsError;

/// Error type callbacks may return.
pub type BoxError = Box<dyn StdError + Send + Sync>;
type Callback = dyn Fn(Event) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync;

/// Named-event fan-out to user callbacks.
///
/// Callbacks for one name run in registration order, each awaited before the next. A
/// callback that fails or panics is logged and skipped; it never stops the remaining
/// callbacks or the streaming loop. Cloning shares the registry.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: Arc<DashMap<EventName, Vec<Arc<Callback>>>>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`.
    pub fn on<F, Fut, E>(&self, name: EventName, callback: F)
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        let callback: Arc<Callback> = Arc::new(
            move |event: Event| -> BoxFuture<'static, Result<(), BoxError>> {
                let future = callback(event);
                Box::pin(async move { future.await.map_err(Into::into) })
            },
        );

        self.listeners.entry(name).or_default().push(callback);
    }

    #[must_use]
    pub fn listener_count(&self, name: EventName) -> usize {
        self.listeners.get(&name).map_or(0, |listeners| listeners.len())
    }

    /// Invoke every callback registered under `name` and return how many completed
    /// successfully.
    pub async fn dispatch(&self, name: EventName, event: Event) -> usize {
        let listeners: Vec<Arc<Callback>> = self
            .listeners
            .get(&name)
            .map(|listeners| listeners.value().clone())
            .unwrap_or_default();

        let mut completed = 0;
        for listener in listeners {
            let event = event.clone();
            let outcome = AssertUnwindSafe(async move { listener(event).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => completed += 1,
                Ok(Err(e)) => {
                    let error = WsError::Callback(e.to_string());
                    #[cfg(feature = "tracing")]
                    tracing::warn!(event = %name, error = %error, "Event callback failed");
                    #[cfg(not(feature = "tracing"))]
                    let _ = &error;
                }
                Err(panic) => {
                    let error = WsError::Callback(panic_message(&*panic));
                    #[cfg(feature = "tracing")]
                    tracing::error!(event = %name, error = %error, "Event callback panicked");
                    #[cfg(not(feature = "tracing"))]
                    let _ = &error;
                }
            }
        }

        completed
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<(EventName, usize)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().len()))
            .collect();
        names.sort_by_key(|(name, _)| name.as_ref().to_owned());

        f.debug_struct("EventDispatcher")
            .field("listeners", &names)
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}
