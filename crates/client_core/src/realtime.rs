//! Push-event subscription over the backend's WebSocket.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use futures::StreamExt;
use shared::protocol::PushEvent;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connected,
    Push(PushEvent),
    Disconnected(String),
}

enum SessionEnd {
    Closed(String),
    ReceiverGone,
}

/// Derives the push endpoint from the backend's HTTP base URL.
pub fn websocket_url(server_url: &str) -> Result<Url> {
    let mut url = Url::parse(server_url.trim())
        .with_context(|| format!("invalid server_url: {server_url}"))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => bail!("server_url must start with http:// or https://"),
    };
    url.set_scheme(scheme)
        .map_err(|_| anyhow!("cannot derive websocket url from {server_url}"))?;
    let path = format!("{}/ws", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url)
}

pub struct PushChannel {
    ws_url: Url,
    reconnect_delay: Duration,
}

impl PushChannel {
    pub fn new(ws_url: Url) -> Self {
        Self {
            ws_url,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Runs the subscription until the receiving side is dropped, reconnecting after failures.
    pub fn spawn(self, events: mpsc::Sender<ChannelEvent>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(events).await })
    }

    async fn run(self, events: mpsc::Sender<ChannelEvent>) {
        loop {
            let reason = match self.session(&events).await {
                Ok(SessionEnd::ReceiverGone) => return,
                Ok(SessionEnd::Closed(reason)) => reason,
                Err(err) => format!("{err:#}"),
            };
            warn!(url = %self.ws_url, reason = %reason, "realtime: channel down");
            if events.send(ChannelEvent::Disconnected(reason)).await.is_err() {
                return;
            }
            tokio::time::sleep(self.reconnect_delay).await;
            if events.is_closed() {
                return;
            }
        }
    }

    async fn session(&self, events: &mpsc::Sender<ChannelEvent>) -> Result<SessionEnd> {
        let (mut ws_stream, _) = connect_async(self.ws_url.as_str())
            .await
            .with_context(|| format!("failed to connect websocket: {}", self.ws_url))?;
        info!(url = %self.ws_url, "realtime: connected");
        if events.send(ChannelEvent::Connected).await.is_err() {
            return Ok(SessionEnd::ReceiverGone);
        }

        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<PushEvent>(&text) {
                    Ok(event) => {
                        debug!(
                            event = event.name(),
                            order_id = event.order_id().0,
                            "realtime: push event received"
                        );
                        if events.send(ChannelEvent::Push(event)).await.is_err() {
                            return Ok(SessionEnd::ReceiverGone);
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "realtime: skipping malformed push event");
                    }
                },
                Ok(Message::Close(_)) => {
                    return Ok(SessionEnd::Closed("closed by server".to_string()));
                }
                Ok(_) => {}
                Err(err) => return Err(anyhow!(err).context("websocket receive failed")),
            }
        }
        Ok(SessionEnd::Closed("stream ended".to_string()))
    }
}

#[cfg(test)]
#[path = "tests/realtime_tests.rs"]
mod tests;
