//! Atelier event bus.
//!
//! This crate provides the real-time backbone of the dashboard:
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DashboardEvent`] -- the typed domain event, one variant per wire
//!   topic, so consumers pattern-match instead of trusting raw JSON.
//! - [`Topic`] -- coarse event grouping used by stream endpoints and
//!   client consumers to filter what they receive.

pub mod bus;

pub use bus::{DashboardEvent, DeletedId, EventBus, NoteChange, Topic};
