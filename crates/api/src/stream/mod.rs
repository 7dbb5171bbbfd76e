//! Server-Sent Events infrastructure for real-time dashboard updates.
//!
//! Converts bus events into long-lived `text/event-stream` responses,
//! one per connected client, with periodic heartbeat comments.

mod sse;

pub use sse::{dashboard_stream, orders_stream, HEARTBEAT_INTERVAL};
