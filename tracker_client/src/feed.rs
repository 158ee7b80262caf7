//! WebSocket transport for the price feed.
//!
//! The transport runs on its own thread with a current-thread tokio runtime and
//! only forwards what it sees as `FeedEvent`s into a crossbeam channel:
//! `Connected` after the handshake, one `Message` per text frame, and a single
//! `TransportError` if connecting or reading fails. It never reconnects.
//!
//! The driver stops it through the `FeedHandle` returned by `FeedClient::spawn`,
//! which aborts a pending handshake or closes an open connection.
use crossbeam_channel::Sender;
use futures_util::StreamExt;
use log::{debug, info};
use std::thread;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tracker_common::{FeedEvent, Result, TrackerError};

/// Connects to one feed endpoint.
pub struct FeedClient {
    url: String,
}

/// Stops the transport thread when terminated or dropped.
pub struct FeedHandle {
    stop_tx: watch::Sender<bool>,
}

impl FeedHandle {
    /// Abort the handshake or close the connection.
    pub fn terminate(&self) {
        let _ = self.stop_tx.send(true);
    }
}

impl FeedClient {
    /// Creates a client for `url` (e.g., `ws://127.0.0.1:9002`).
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    /// Start the transport thread; events go to `events` in arrival order.
    pub fn spawn(self, events: Sender<FeedEvent>) -> Result<FeedHandle> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (stop_tx, stop_rx) = watch::channel(false);

        thread::Builder::new()
            .name("feed".to_string())
            .spawn(move || runtime.block_on(self.run(events, stop_rx)))?;
        Ok(FeedHandle { stop_tx })
    }

    async fn run(self, events: Sender<FeedEvent>, mut stop: watch::Receiver<bool>) {
        info!("Connecting to feed at {}", self.url);

        let ws_stream = tokio::select! {
            res = tokio_tungstenite::connect_async(&self.url) => match res {
                Ok((ws_stream, _resp)) => ws_stream,
                Err(e) => {
                    let _ = forward(&events, FeedEvent::TransportError(e.to_string()));
                    return;
                }
            },
            _ = stop.changed() => {
                info!("Connection attempt to {} terminated", self.url);
                return;
            }
        };

        if forward(&events, FeedEvent::Connected).is_err() {
            return;
        }
        let (_write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if forward(&events, FeedEvent::Message(text.to_string())).is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Feed closed the connection: {:?}", frame);
                        break;
                    }
                    Some(Ok(other)) => debug!("Ignoring non-text frame: {:?}", other),
                    Some(Err(e)) => {
                        let _ = forward(&events, FeedEvent::TransportError(e.to_string()));
                        break;
                    }
                    None => {
                        info!("Feed stream ended");
                        break;
                    }
                },
                _ = stop.changed() => {
                    info!("Feed connection terminated");
                    break;
                }
            }
        }
    }
}

/// Push one event to the driver; fails once the driver is gone.
fn forward(events: &Sender<FeedEvent>, event: FeedEvent) -> Result<()> {
    events
        .send(event)
        .map_err(|e| TrackerError::ChannelSend(e.to_string()))
}
