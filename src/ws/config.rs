#![expect(
    clippy::module_name_repetitions,
    reason = "Configuration types intentionally mirror the module name for clarity"
)]

use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use strum_macros::{AsRefStr, Display};

const DEFAULT_POLL_TIMEOUT_DURATION: Duration = Duration::from_secs(60);
const DEFAULT_CONNECT_TIMEOUT_DURATION: Duration = Duration::from_secs(10);
const DEFAULT_CLOSE_GRACE_DURATION: Duration = Duration::from_secs(3);
const DEFAULT_RETRY_INTERVAL_DURATION: Duration = Duration::from_secs(3);
const DEFAULT_INITIAL_BACKOFF_DURATION: Duration = Duration::from_secs(1);
const DEFAULT_MAX_BACKOFF_DURATION: Duration = Duration::from_secs(60);
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Configuration for the streaming connection.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Config {
    /// How long a single poll waits for a frame before returning empty-handed
    pub poll_timeout: Duration,
    /// Upper bound for a single connection attempt, handshake included
    pub connect_timeout: Duration,
    /// Pause after the server closes the connection, before reconnecting
    pub close_grace: Duration,
    /// Retry policy for connector failures (DNS, refused, reset)
    pub reconnect: ReconnectConfig,
    /// Channels joined after every (re)connect
    pub channels: Vec<Channel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_timeout: DEFAULT_POLL_TIMEOUT_DURATION,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_DURATION,
            close_grace: DEFAULT_CLOSE_GRACE_DURATION,
            reconnect: ReconnectConfig::default(),
            channels: vec![Channel::Main],
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn with_close_grace(mut self, close_grace: Duration) -> Self {
        self.close_grace = close_grace;
        self
    }

    #[must_use]
    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    #[must_use]
    pub fn with_channels(mut self, channels: Vec<Channel>) -> Self {
        self.channels = channels;
        self
    }
}

/// Wait between failed connection attempts. Neither strategy ever gives up.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum ReconnectConfig {
    /// The same pause before every attempt
    Fixed {
        interval: Duration,
    },
    /// Growing pauses with jitter, capped at `max_backoff`
    Exponential {
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
    },
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self::Fixed {
            interval: DEFAULT_RETRY_INTERVAL_DURATION,
        }
    }
}

impl ReconnectConfig {
    /// Exponential backoff with the default bounds (1 s doubling up to 60 s).
    #[must_use]
    pub fn exponential() -> Self {
        Self::Exponential {
            initial_backoff: DEFAULT_INITIAL_BACKOFF_DURATION,
            max_backoff: DEFAULT_MAX_BACKOFF_DURATION,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    pub(crate) fn strategy(&self) -> Box<dyn Backoff + Send> {
        match *self {
            Self::Fixed { interval } => Box::new(Constant::new(interval)),
            Self::Exponential {
                initial_backoff,
                max_backoff,
                backoff_multiplier,
            } => {
                let backoff: ExponentialBackoff = ExponentialBackoffBuilder::default()
                    .with_initial_interval(initial_backoff)
                    .with_max_interval(max_backoff)
                    .with_multiplier(backoff_multiplier)
                    .with_max_elapsed_time(None)
                    .build();
                Box::new(backoff)
            }
        }
    }
}

/// Streaming channels a client can join.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Channel {
    /// Notifications, mentions, follows and direct messages of the account
    Main,
    HomeTimeline,
    LocalTimeline,
    HybridTimeline,
    GlobalTimeline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retry_is_fixed_three_seconds() {
        let mut backoff = ReconnectConfig::default().strategy();

        for _ in 0..5 {
            assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(3)));
        }
    }

    #[test]
    fn exponential_backoff_respects_max() {
        let config = ReconnectConfig::Exponential {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(2),
            backoff_multiplier: 3.0,
        };
        let mut backoff = config.strategy();

        let first = backoff.next_backoff().expect("never gives up");
        assert!(first >= Duration::from_millis(500) && first <= Duration::from_millis(1500));

        for _ in 0..10 {
            let _next = backoff.next_backoff();
        }

        let duration = backoff.next_backoff().expect("never gives up");
        assert!(duration <= Duration::from_secs(3));
    }

    #[test]
    fn default_config_joins_main_channel() {
        let config = Config::default();

        assert_eq!(config.channels, vec![Channel::Main]);
        assert_eq!(config.close_grace, Duration::from_secs(3));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn channel_names_are_camel_case() {
        assert_eq!(Channel::Main.as_ref(), "main");
        assert_eq!(Channel::HybridTimeline.to_string(), "hybridTimeline");
        assert_eq!(Channel::LocalTimeline.as_ref(), "localTimeline");
    }
}
