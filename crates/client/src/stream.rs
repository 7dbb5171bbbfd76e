//! Long-lived SSE consumer with fixed-backoff reconnection.
//!
//! The consumer opens the dashboard stream, parses frames, and applies
//! each decoded event to the shared mirror. On any transport failure it
//! closes the connection and retries after a fixed delay; cancellation
//! tears down the read loop and any pending backoff sleep, so nothing
//! outlives the caller.

use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use atelier_events::DashboardEvent;

use crate::error::ClientError;
use crate::mirror::SharedMirror;
use crate::sse::SseParser;

/// Delay between reconnection attempts. Fixed, not exponential: a shop
/// LAN either comes back quickly or the staff reloads the page.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Owns one stream connection at a time and keeps it alive until cancelled.
pub struct StreamConsumer {
    http: reqwest::Client,
    url: String,
    mirror: SharedMirror,
    cancel: CancellationToken,
}

impl StreamConsumer {
    /// `url` is the SSE endpoint (see [`ApiClient::stream_url`](crate::ApiClient::stream_url)).
    pub fn new(url: impl Into<String>, mirror: SharedMirror, cancel: CancellationToken) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            mirror,
            cancel,
        }
    }

    /// Run until the cancellation token fires.
    ///
    /// Each connection attempt streams frames into the mirror; on error or
    /// server-side close the consumer waits [`RECONNECT_DELAY`] and tries
    /// again.
    pub async fn run(self) {
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                result = self.connect_once() => match result {
                    Ok(()) => {
                        if self.cancel.is_cancelled() {
                            break;
                        }
                        tracing::info!("Stream ended, reconnecting");
                    }
                    Err(error) => {
                        tracing::warn!(%error, "Stream connection failed");
                    }
                },
            }

            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(RECONNECT_DELAY) => {}
            }
        }
        tracing::debug!("Stream consumer stopped");
    }

    /// One connection lifetime: open, read frames, apply events.
    async fn connect_once(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(url = %self.url, "Stream connected");

        let mut body = response.bytes_stream();
        let mut parser = SseParser::new();

        loop {
            let chunk = tokio::select! {
                () = self.cancel.cancelled() => return Ok(()),
                chunk = body.next() => chunk,
            };
            let Some(chunk) = chunk else {
                // Server closed the stream; the outer loop reconnects.
                return Ok(());
            };
            let chunk = chunk?;
            let text = String::from_utf8_lossy(&chunk);

            for frame in parser.feed(&text) {
                match frame.event.as_deref() {
                    Some("connected") => {
                        tracing::debug!("Stream handshake complete");
                    }
                    Some(name) => match DashboardEvent::from_wire(name, &frame.data) {
                        Some(event) => {
                            self.mirror.write().await.apply(event);
                        }
                        // Malformed or unknown payloads are dropped; the
                        // next event supersedes whatever was missed.
                        None => {
                            tracing::trace!(event = name, "Dropped undecodable frame");
                        }
                    },
                    None => {}
                }
            }
        }
    }
}
