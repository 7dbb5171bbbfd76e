//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`DashboardEvent`]s.
//! It is constructed once in `main`, shared via `Arc<EventBus>` through the
//! application state, and never recreated for the life of the process.

use atelier_core::team::TodoItem;
use atelier_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use atelier_db::models::order::OrderSummary;
use atelier_db::models::planning_item::PlanningItem;
use atelier_db::models::workflow_item::WorkflowItem;

// ---------------------------------------------------------------------------
// DashboardEvent
// ---------------------------------------------------------------------------

/// Coarse grouping of events, used to filter stream subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// New-order notifications (the order board's feed).
    Orders,
    /// Workflow, planning, and note changes (the collaborative boards).
    Board,
}

/// Payload of a deletion event: only the id survives the delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedId {
    pub id: DbId,
}

/// Payload of a `note-changed` event: the person plus whichever parts of
/// the note actually changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteChange {
    pub person: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<TodoItem>>,
}

/// A change notification fanned out to connected dashboard clients.
///
/// One variant per wire topic. The wire representation is an SSE frame
/// whose event name is [`name`](DashboardEvent::name) and whose data is
/// the JSON-serialized variant payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    NewOrder(OrderSummary),
    WorkflowCreated(WorkflowItem),
    WorkflowUpdated(WorkflowItem),
    WorkflowDeleted(DeletedId),
    PlanningCreated(PlanningItem),
    PlanningUpdated(PlanningItem),
    PlanningDeleted(DeletedId),
    NoteChanged(NoteChange),
}

impl DashboardEvent {
    /// Wire-level event name, as it appears in the SSE `event:` field.
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::NewOrder(_) => "new-order",
            DashboardEvent::WorkflowCreated(_) => "workflow:created",
            DashboardEvent::WorkflowUpdated(_) => "workflow:updated",
            DashboardEvent::WorkflowDeleted(_) => "workflow:deleted",
            DashboardEvent::PlanningCreated(_) => "planning:created",
            DashboardEvent::PlanningUpdated(_) => "planning:updated",
            DashboardEvent::PlanningDeleted(_) => "planning:deleted",
            DashboardEvent::NoteChanged(_) => "note-changed",
        }
    }

    /// Which stream feeds carry this event.
    pub fn topic(&self) -> Topic {
        match self {
            DashboardEvent::NewOrder(_) => Topic::Orders,
            _ => Topic::Board,
        }
    }

    /// Serialize the variant payload for the SSE `data:` field.
    pub fn payload_json(&self) -> Result<String, serde_json::Error> {
        match self {
            DashboardEvent::NewOrder(order) => serde_json::to_string(order),
            DashboardEvent::WorkflowCreated(item)
            | DashboardEvent::WorkflowUpdated(item) => serde_json::to_string(item),
            DashboardEvent::WorkflowDeleted(id) => serde_json::to_string(id),
            DashboardEvent::PlanningCreated(item)
            | DashboardEvent::PlanningUpdated(item) => serde_json::to_string(item),
            DashboardEvent::PlanningDeleted(id) => serde_json::to_string(id),
            DashboardEvent::NoteChanged(change) => serde_json::to_string(change),
        }
    }

    /// Parse an event back from its wire name and JSON data.
    ///
    /// Returns `None` for unknown names or malformed payloads; consumers
    /// drop those silently (the next event supersedes).
    pub fn from_wire(name: &str, data: &str) -> Option<DashboardEvent> {
        match name {
            "new-order" => serde_json::from_str(data).ok().map(DashboardEvent::NewOrder),
            "workflow:created" => serde_json::from_str(data)
                .ok()
                .map(DashboardEvent::WorkflowCreated),
            "workflow:updated" => serde_json::from_str(data)
                .ok()
                .map(DashboardEvent::WorkflowUpdated),
            "workflow:deleted" => serde_json::from_str(data)
                .ok()
                .map(DashboardEvent::WorkflowDeleted),
            "planning:created" => serde_json::from_str(data)
                .ok()
                .map(DashboardEvent::PlanningCreated),
            "planning:updated" => serde_json::from_str(data)
                .ok()
                .map(DashboardEvent::PlanningUpdated),
            "planning:deleted" => serde_json::from_str(data)
                .ok()
                .map(DashboardEvent::PlanningDeleted),
            "note-changed" => serde_json::from_str(data)
                .ok()
                .map(DashboardEvent::NoteChanged),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
///
/// Also serves as the subscriber safety ceiling: the channel supports far
/// more than the couple hundred concurrent SSE clients a single shop
/// instance will ever see.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DashboardEvent`]. Dropping a
/// receiver unsubscribes it; there is no separate handle bookkeeping.
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Fire-and-forget: if there are no active subscribers the event is
    /// silently dropped. The authoritative state is already in the
    /// database, so a missed live update costs a refresh at worst.
    pub fn publish(&self, event: DashboardEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers. Used by tests to verify that closed
    /// stream connections release their subscription.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
