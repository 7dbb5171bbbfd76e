//! SSE stream endpoints backed by the event bus.
//!
//! Each connection owns one frame stream combining three sources:
//!
//! 1. an initial `connected` frame, written immediately so clients can
//!    distinguish "stream established" from "still negotiating",
//! 2. bus events, serialized as `event: <name>\ndata: <json>` frames,
//! 3. heartbeat comments (`: heartbeat`) every [`HEARTBEAT_INTERVAL`],
//!    keeping intermediary proxies from timing out idle connections.
//!
//! The bus receiver and the heartbeat interval both live inside the frame
//! stream, so a client disconnect (which drops the response body) frees
//! the subscription and cancels the timer in one step, exactly once,
//! regardless of how the connection ended.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderName;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use futures::future::ready;
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};

use atelier_events::{DashboardEvent, EventBus, Topic};

use crate::state::AppState;

/// Interval between heartbeat comment frames.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);

/// One frame of an SSE connection, before wire encoding.
#[derive(Debug, Clone, PartialEq)]
enum StreamFrame {
    /// The initial "stream established" marker.
    Connected,
    /// A keepalive comment; clients ignore its content.
    Heartbeat,
    /// A domain event to deliver.
    Event(DashboardEvent),
}

/// Build the frame stream for one connection.
///
/// `topic` filters which bus events the connection receives; `None`
/// delivers everything. Lagged-receiver errors are skipped silently: the
/// client misses some updates but the stream stays up, and a page refresh
/// recovers the authoritative state.
fn frame_stream(
    bus: &EventBus,
    topic: Option<Topic>,
) -> impl Stream<Item = StreamFrame> + Send {
    let events = BroadcastStream::new(bus.subscribe()).filter_map(move |result| {
        ready(match result {
            Ok(event) if topic.map_or(true, |t| event.topic() == t) => {
                Some(StreamFrame::Event(event))
            }
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(missed)) => {
                tracing::warn!(missed, "SSE subscriber lagged, skipping");
                None
            }
        })
    });

    // First tick after one full interval, not immediately.
    let heartbeats = IntervalStream::new(tokio::time::interval_at(
        tokio::time::Instant::now() + HEARTBEAT_INTERVAL,
        HEARTBEAT_INTERVAL,
    ))
    .map(|_| StreamFrame::Heartbeat);

    stream::once(ready(StreamFrame::Connected)).chain(stream::select(events, heartbeats))
}

/// Encode a frame for the wire. Returns `None` if the payload cannot be
/// serialized; the frame is dropped and the connection keeps going.
fn encode_frame(frame: StreamFrame) -> Option<Event> {
    match frame {
        StreamFrame::Connected => Some(Event::default().event("connected").data("{}")),
        StreamFrame::Heartbeat => Some(Event::default().comment("heartbeat")),
        StreamFrame::Event(event) => match event.payload_json() {
            Ok(json) => Some(Event::default().event(event.name()).data(json)),
            Err(error) => {
                tracing::warn!(event = event.name(), %error, "Dropping unserializable event");
                None
            }
        },
    }
}

/// Wrap a frame stream in an SSE response with caching and proxy
/// buffering disabled, so frames flush to the client immediately.
fn sse_response(
    frames: impl Stream<Item = StreamFrame> + Send + 'static,
) -> impl IntoResponse {
    let stream = frames
        .filter_map(|frame| ready(encode_frame(frame)))
        .map(Ok::<_, Infallible>);
    (
        [
            (CACHE_CONTROL, "no-cache, no-transform"),
            (HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Sse::new(stream),
    )
}

/// GET /api/v1/stream
///
/// All dashboard events: workflow, planning, note, and order changes.
pub async fn dashboard_stream(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Dashboard stream connected");
    sse_response(frame_stream(&state.event_bus, None))
}

/// GET /api/v1/orders/stream
///
/// Order events only: clients of the order board connect here and receive
/// `new-order` frames without polling.
pub async fn orders_stream(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Orders stream connected");
    sse_response(frame_stream(&state.event_bus, Some(Topic::Orders)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
