//! Workflow item entity model and DTOs.

use atelier_core::ordering::Positioned;
use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The four production lists of the shop floor.
///
/// Positions are maintained independently per type: reordering one list
/// never touches the others.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowType {
    Achat,
    Standard,
    Atelier,
    Dtf,
}

impl WorkflowType {
    /// All types, in board display order.
    pub const ALL: [WorkflowType; 4] = [
        WorkflowType::Achat,
        WorkflowType::Standard,
        WorkflowType::Atelier,
        WorkflowType::Dtf,
    ];
}

/// A row from the `workflow_items` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct WorkflowItem {
    pub id: DbId,
    pub content: String,
    pub item_type: WorkflowType,
    pub position: i32,
    pub done: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Positioned for WorkflowItem {
    fn id(&self) -> DbId {
        self.id
    }
    fn position(&self) -> i32 {
        self.position
    }
    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

/// DTO for creating a workflow item. The position is assigned server-side
/// (max within the type + 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkflowItem {
    pub content: String,
    pub item_type: WorkflowType,
}

/// DTO for partial updates. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkflowItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// DTO for a drag-and-drop reorder of one list.
///
/// `ids` is the complete id sequence of the list in its new display order;
/// positions `0..n-1` are rewritten to match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderWorkflow {
    pub item_type: WorkflowType,
    pub ids: Vec<DbId>,
}

/// Workflow items grouped by type, each list position-sorted: the shape
/// the board renders from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowBoard {
    #[serde(rename = "ACHAT")]
    pub achat: Vec<WorkflowItem>,
    #[serde(rename = "STANDARD")]
    pub standard: Vec<WorkflowItem>,
    #[serde(rename = "ATELIER")]
    pub atelier: Vec<WorkflowItem>,
    #[serde(rename = "DTF")]
    pub dtf: Vec<WorkflowItem>,
}

impl WorkflowBoard {
    /// Group a flat, already-sorted item list into per-type buckets.
    pub fn from_items(items: Vec<WorkflowItem>) -> Self {
        let mut board = Self::default();
        for item in items {
            board.bucket_mut(item.item_type).push(item);
        }
        board
    }

    pub fn bucket(&self, item_type: WorkflowType) -> &Vec<WorkflowItem> {
        match item_type {
            WorkflowType::Achat => &self.achat,
            WorkflowType::Standard => &self.standard,
            WorkflowType::Atelier => &self.atelier,
            WorkflowType::Dtf => &self.dtf,
        }
    }

    pub fn bucket_mut(&mut self, item_type: WorkflowType) -> &mut Vec<WorkflowItem> {
        match item_type {
            WorkflowType::Achat => &mut self.achat,
            WorkflowType::Standard => &mut self.standard,
            WorkflowType::Atelier => &mut self.atelier,
            WorkflowType::Dtf => &mut self.dtf,
        }
    }
}
