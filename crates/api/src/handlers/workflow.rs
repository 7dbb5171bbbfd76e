//! Handlers for the four workflow lists.
//!
//! Every successful mutation publishes its event on the bus after the
//! database write commits; connected dashboards apply the change without
//! reloading. The publish is fire-and-forget.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::validate::validate_content;
use atelier_db::models::workflow_item::{
    CreateWorkflowItem, ReorderWorkflow, UpdateWorkflowItem, WorkflowBoard,
};
use atelier_db::repositories::WorkflowRepo;
use atelier_events::{DashboardEvent, DeletedId};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /workflow
///
/// All items grouped by type, each list position-sorted.
pub async fn list_items(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = WorkflowRepo::list(&state.pool).await?;
    let board = WorkflowBoard::from_items(items);
    Ok(Json(DataResponse { data: board }))
}

/// POST /workflow
///
/// Create an item at the end of its type's list.
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflowItem>,
) -> AppResult<impl IntoResponse> {
    validate_content(&input.content).map_err(AppError::BadRequest)?;

    let item = WorkflowRepo::create(&state.pool, &input).await?;

    state
        .event_bus
        .publish(DashboardEvent::WorkflowCreated(item.clone()));

    tracing::info!(
        item_id = item.id,
        item_type = ?item.item_type,
        position = item.position,
        "Workflow item created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PATCH /workflow/{id}
///
/// Partial update: content, done, and/or position.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkflowItem>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref content) = input.content {
        validate_content(content).map_err(AppError::BadRequest)?;
    }

    let item = WorkflowRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkflowItem",
            id,
        }))?;

    state
        .event_bus
        .publish(DashboardEvent::WorkflowUpdated(item.clone()));

    tracing::info!(item_id = id, "Workflow item updated");

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /workflow/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = WorkflowRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "WorkflowItem",
            id,
        }));
    }

    state
        .event_bus
        .publish(DashboardEvent::WorkflowDeleted(DeletedId { id }));

    tracing::info!(item_id = id, "Workflow item deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /workflow/reorder
///
/// Batch position rewrite for one list: `ids` is the complete id sequence
/// in the new display order.
pub async fn reorder_items(
    State(state): State<AppState>,
    Json(input): Json<ReorderWorkflow>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".to_string()));
    }

    let updated = WorkflowRepo::reorder(&state.pool, input.item_type, &input.ids).await?;

    tracing::info!(
        item_type = ?input.item_type,
        count = updated,
        "Workflow list reordered"
    );

    Ok(Json(DataResponse { data: serde_json::json!({ "updated": updated }) }))
}
