//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod order;
pub mod person_note;
pub mod planning_item;
pub mod user_profile;
pub mod workflow_item;

pub use order::{
    CreateOrder, CreateOrderItem, Order, OrderItem, OrderStats, OrderSummary, OrderWithItems,
    OrderStatus, PaymentStatus,
};
pub use person_note::{PersonNote, UpdatePersonNote};
pub use planning_item::{
    CreatePlanningItem, PlanningItem, PlanningStatus, Priority, ReorderPlanning,
    UpdatePlanningItem,
};
pub use user_profile::{UpdateUserProfile, UserProfile};
pub use workflow_item::{
    CreateWorkflowItem, ReorderWorkflow, UpdateWorkflowItem, WorkflowBoard, WorkflowItem,
    WorkflowType,
};
