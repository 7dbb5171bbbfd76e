//! Handlers for the global planning list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::validate::validate_quantity;
use atelier_db::models::planning_item::{
    CreatePlanningItem, ReorderPlanning, UpdatePlanningItem,
};
use atelier_db::repositories::PlanningRepo;
use atelier_events::{DashboardEvent, DeletedId};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /planning
///
/// The whole list in display order.
pub async fn list_items(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = PlanningRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /planning
///
/// Create a row at the end of the list. An empty body creates a blank row
/// the staff fills in afterwards.
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreatePlanningItem>,
) -> AppResult<impl IntoResponse> {
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity).map_err(AppError::BadRequest)?;
    }

    let item = PlanningRepo::create(&state.pool, &input).await?;

    state
        .event_bus
        .publish(DashboardEvent::PlanningCreated(item.clone()));

    tracing::info!(item_id = item.id, position = item.position, "Planning row created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PATCH /planning/{id}
///
/// Partial update of any column; `"deadline": null` clears the deadline.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlanningItem>,
) -> AppResult<impl IntoResponse> {
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity).map_err(AppError::BadRequest)?;
    }

    let item = PlanningRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PlanningItem",
            id,
        }))?;

    state
        .event_bus
        .publish(DashboardEvent::PlanningUpdated(item.clone()));

    tracing::info!(item_id = id, "Planning row updated");

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /planning/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PlanningRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PlanningItem",
            id,
        }));
    }

    state
        .event_bus
        .publish(DashboardEvent::PlanningDeleted(DeletedId { id }));

    tracing::info!(item_id = id, "Planning row deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /planning/reorder
///
/// Batch position rewrite of the global list.
pub async fn reorder_items(
    State(state): State<AppState>,
    Json(input): Json<ReorderPlanning>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".to_string()));
    }

    let updated = PlanningRepo::reorder(&state.pool, &input.ids).await?;

    tracing::info!(count = updated, "Planning list reordered");

    Ok(Json(DataResponse { data: serde_json::json!({ "updated": updated }) }))
}
