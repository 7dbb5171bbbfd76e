//! Local mirror of the server-pushed dashboard state.
//!
//! The mirror is the single source the UI renders from. Server pushes and
//! optimistic local mutations both land here; the editing-suppression
//! rule keeps a push from overwriting the record the local user is
//! typing into.

use std::sync::Arc;

use atelier_core::ordering::sort_for_display;
use atelier_core::types::{DbId, Timestamp};
use atelier_db::models::order::OrderSummary;
use atelier_db::models::person_note::PersonNote;
use atelier_db::models::planning_item::PlanningItem;
use atelier_db::models::workflow_item::{WorkflowBoard, WorkflowItem, WorkflowType};
use atelier_events::DashboardEvent;
use tokio::sync::RwLock;

/// Mirror shared between the stream consumer and the UI-facing workspace.
pub type SharedMirror = Arc<RwLock<BoardMirror>>;

/// Identity of the record currently open for local editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKey {
    Workflow(DbId),
    Planning(DbId),
    Note(String),
}

/// Local dashboard state.
#[derive(Debug, Default)]
pub struct BoardMirror {
    pub workflow: WorkflowBoard,
    pub planning: Vec<PlanningItem>,
    pub notes: Vec<PersonNote>,
    pub orders: Vec<OrderSummary>,
    editing: Option<EditKey>,
}

impl BoardMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a record as being edited locally; pushes for it are ignored
    /// until [`end_editing`](Self::end_editing).
    pub fn begin_editing(&mut self, key: EditKey) {
        self.editing = Some(key);
    }

    /// Clear the editing mark, returning it so the caller can flush the
    /// record's pending writes.
    pub fn end_editing(&mut self) -> Option<EditKey> {
        self.editing.take()
    }

    pub fn editing(&self) -> Option<&EditKey> {
        self.editing.as_ref()
    }

    /// Whether an incoming event targets the record being edited.
    pub fn is_suppressed(&self, event: &DashboardEvent) -> bool {
        match (&self.editing, edit_key_of(event)) {
            (Some(editing), Some(target)) => *editing == target,
            _ => false,
        }
    }

    /// Apply a pushed event. Returns `false` if it was suppressed by the
    /// editing rule (the event is dropped; the next push supersedes it).
    pub fn apply(&mut self, event: DashboardEvent) -> bool {
        if self.is_suppressed(&event) {
            tracing::trace!(event = event.name(), "Push suppressed while editing");
            return false;
        }
        match event {
            DashboardEvent::NewOrder(order) => {
                if !self.orders.iter().any(|o| o.id == order.id) {
                    self.orders.insert(0, order);
                }
            }
            DashboardEvent::WorkflowCreated(item)
            | DashboardEvent::WorkflowUpdated(item) => {
                self.upsert_workflow(item);
            }
            DashboardEvent::WorkflowDeleted(deleted) => {
                for item_type in WorkflowType::ALL {
                    self.workflow
                        .bucket_mut(item_type)
                        .retain(|i| i.id != deleted.id);
                }
            }
            DashboardEvent::PlanningCreated(item)
            | DashboardEvent::PlanningUpdated(item) => {
                self.planning.retain(|i| i.id != item.id);
                self.planning.push(item);
                sort_for_display(&mut self.planning);
            }
            DashboardEvent::PlanningDeleted(deleted) => {
                self.planning.retain(|i| i.id != deleted.id);
            }
            DashboardEvent::NoteChanged(change) => {
                let note = self.note_entry(&change.person);
                if let Some(content) = change.content {
                    note.content = content;
                }
                if let Some(todos) = change.todos {
                    note.todos.0 = todos;
                }
                note.updated_at = chrono::Utc::now();
            }
        }
        true
    }

    /// Insert or replace a workflow item in its bucket, keeping the
    /// bucket display-sorted. A replace also handles the item appearing
    /// in a different bucket than before.
    pub fn upsert_workflow(&mut self, item: WorkflowItem) {
        for item_type in WorkflowType::ALL {
            self.workflow.bucket_mut(item_type).retain(|i| i.id != item.id);
        }
        let bucket = self.workflow.bucket_mut(item.item_type);
        bucket.push(item);
        sort_for_display(bucket);
    }

    /// Swap an optimistic temp record for the canonical one returned by
    /// the server. A live-update echo may already have inserted the
    /// canonical record, so this also dedupes.
    pub fn resolve_temp_workflow(&mut self, temp_id: DbId, item: WorkflowItem) {
        for item_type in WorkflowType::ALL {
            self.workflow
                .bucket_mut(item_type)
                .retain(|i| i.id != temp_id);
        }
        self.upsert_workflow(item);
    }

    /// Look up a workflow item across all buckets.
    pub fn find_workflow(&self, id: DbId) -> Option<&WorkflowItem> {
        WorkflowType::ALL
            .iter()
            .flat_map(|t| self.workflow.bucket(*t).iter())
            .find(|i| i.id == id)
    }

    pub fn find_planning(&self, id: DbId) -> Option<&PlanningItem> {
        self.planning.iter().find(|i| i.id == id)
    }

    pub fn find_planning_mut(&mut self, id: DbId) -> Option<&mut PlanningItem> {
        self.planning.iter_mut().find(|i| i.id == id)
    }

    /// The note for `person`, created empty on first touch.
    pub fn note_entry(&mut self, person: &str) -> &mut PersonNote {
        if let Some(index) = self.notes.iter().position(|n| n.person == person) {
            return &mut self.notes[index];
        }
        let now: Timestamp = chrono::Utc::now();
        self.notes.push(PersonNote {
            person: person.to_string(),
            content: String::new(),
            todos: sqlx::types::Json(Vec::new()),
            created_at: now,
            updated_at: now,
        });
        self.notes.last_mut().unwrap()
    }

    pub fn note(&self, person: &str) -> Option<&PersonNote> {
        self.notes.iter().find(|n| n.person == person)
    }

    // Wholesale replacement, used by initial load and reconciliation.

    pub fn replace_workflow(&mut self, board: WorkflowBoard) {
        self.workflow = board;
    }

    pub fn replace_planning(&mut self, items: Vec<PlanningItem>) {
        self.planning = items;
    }

    pub fn replace_notes(&mut self, notes: Vec<PersonNote>) {
        self.notes = notes;
    }

    pub fn replace_orders(&mut self, orders: Vec<OrderSummary>) {
        self.orders = orders;
    }
}

/// The edit key an event targets, if the suppression rule applies to it.
fn edit_key_of(event: &DashboardEvent) -> Option<EditKey> {
    match event {
        DashboardEvent::NewOrder(_) => None,
        DashboardEvent::WorkflowCreated(item)
        | DashboardEvent::WorkflowUpdated(item) => Some(EditKey::Workflow(item.id)),
        DashboardEvent::WorkflowDeleted(deleted) => Some(EditKey::Workflow(deleted.id)),
        DashboardEvent::PlanningCreated(item)
        | DashboardEvent::PlanningUpdated(item) => Some(EditKey::Planning(item.id)),
        DashboardEvent::PlanningDeleted(deleted) => Some(EditKey::Planning(deleted.id)),
        DashboardEvent::NoteChanged(change) => Some(EditKey::Note(change.person.clone())),
    }
}
