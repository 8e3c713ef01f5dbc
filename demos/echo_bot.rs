//! Streaming example: a bot that answers mentions and direct messages.
//!
//! Run with tracing enabled:
//! ```sh
//! MISSKEY_HOST=https://misskey.example MISSKEY_TOKEN=... RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,rustls=off cargo run --example echo_bot --features tracing
//! ```
//!
//! Optionally log to a file:
//! ```sh
//! LOG_FILE=echo_bot.log MISSKEY_HOST=https://misskey.example MISSKEY_TOKEN=... RUST_LOG=info cargo run --example echo_bot --features tracing
//! ```

use std::fs::File;
use std::time::Duration;

use misskey_client_sdk::Token;
use misskey_client_sdk::streaming::{Client, Event, EventName, NotificationFilter};
use misskey_client_sdk::ws::{Channel, Config, ReconnectConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let host = std::env::var("MISSKEY_HOST")?;
    let token = Token::new(std::env::var("MISSKEY_TOKEN")?);

    let config = Config::default()
        .with_channels(vec![Channel::Main, Channel::HomeTimeline])
        .with_reconnect(ReconnectConfig::exponential())
        .with_poll_timeout(Duration::from_secs(30));

    let client = Client::new(&host, token)?
        .with_config(config)
        .with_notifications(NotificationFilter::REACTION | NotificationFilter::FOLLOW_REQUEST_ACCEPTED);

    let me = client.rest().me().await?;
    info!(user = %me.acct(), "Logged in");

    client.on(EventName::Ready, |_event| async {
        info!("Streaming connection ready");
        Ok::<(), anyhow::Error>(())
    });

    client.on(EventName::Disconnect, |_event| async {
        warn!("Streaming connection lost");
        Ok::<(), anyhow::Error>(())
    });

    client.on(EventName::Mention, |event| async move {
        if let Event::Note(note) = event {
            info!(note = %note.id, author = %note.user_id, "Mentioned");
            tokio::spawn(async move {
                let text = note.text.clone().unwrap_or_default();
                match note.reply(&format!("echo: {text}")).await {
                    Ok(reply) => info!(note = %reply.id, "Replied"),
                    Err(e) => error!(error = %e, "Reply failed"),
                }
            });
        }
        Ok::<(), anyhow::Error>(())
    });

    client.on(EventName::Message, |event| async move {
        if let Event::Chat(chat) = event {
            tokio::spawn(async move {
                if let Err(e) = chat.reply("echo").await {
                    error!(error = %e, "Chat reply failed");
                }
            });
        }
        Ok::<(), anyhow::Error>(())
    });

    client.on(EventName::Reaction, |event| async move {
        if let Event::Reaction(reaction) = event {
            info!(reaction = ?reaction.reaction, "Received reaction");
        }
        Ok::<(), anyhow::Error>(())
    });

    client.on(EventName::FollowRequest, |event| async move {
        if let Event::FollowRequest(request) = event {
            info!(from = %request.from.acct(), "Accepting follow request");
            request.accept().await?;
        }
        Ok::<(), anyhow::Error>(())
    });

    let shutdown = client.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    client.run().await?;

    Ok(())
}
