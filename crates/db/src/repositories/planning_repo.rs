//! Repository for the `planning_items` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::planning_item::{
    CreatePlanningItem, PlanningItem, PlanningStatus, Priority, UpdatePlanningItem,
};

/// Column list for `planning_items` queries.
const COLUMNS: &str = "\
    id, priority, client_name, quantity, designation, note, unit_price, \
    deadline, status, responsible, position, created_at, updated_at";

/// CRUD and reorder operations for the global planning list.
pub struct PlanningRepo;

impl PlanningRepo {
    /// All rows in display order: position ascending, id tie-break.
    pub async fn list(pool: &PgPool) -> Result<Vec<PlanningItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM planning_items \
             ORDER BY position, id"
        );
        sqlx::query_as::<_, PlanningItem>(&query).fetch_all(pool).await
    }

    /// Insert a row at the end of the list. Unset fields get fresh-row
    /// defaults (MOYENNE priority, A_DEVISER status, quantity 1).
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlanningItem,
    ) -> Result<PlanningItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO planning_items \
                 (priority, client_name, quantity, designation, note, \
                  unit_price, deadline, status, responsible, position) \
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, \
                    COALESCE(MAX(position) + 1, 0) \
             FROM planning_items \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlanningItem>(&query)
            .bind(input.priority.unwrap_or(Priority::Moyenne))
            .bind(input.client_name.as_deref().unwrap_or(""))
            .bind(input.quantity.unwrap_or(1))
            .bind(input.designation.as_deref().unwrap_or(""))
            .bind(input.note.as_deref().unwrap_or(""))
            .bind(input.unit_price.unwrap_or(0.0))
            .bind(input.deadline)
            .bind(input.status.unwrap_or(PlanningStatus::ADeviser))
            .bind(input.responsible.as_deref().unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    /// Partially update a row; absent fields keep their current value.
    ///
    /// `deadline` is special-cased: `Some(None)` clears it (explicit JSON
    /// null), `None` leaves it untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlanningItem,
    ) -> Result<Option<PlanningItem>, sqlx::Error> {
        let base = "UPDATE planning_items SET \
                 priority = COALESCE($2, priority), \
                 client_name = COALESCE($3, client_name), \
                 quantity = COALESCE($4, quantity), \
                 designation = COALESCE($5, designation), \
                 note = COALESCE($6, note), \
                 unit_price = COALESCE($7, unit_price), \
                 status = COALESCE($8, status), \
                 responsible = COALESCE($9, responsible)";
        let query = if input.deadline.is_some() {
            format!(
                "{base}, deadline = $10, updated_at = NOW() \
                 WHERE id = $1 RETURNING {COLUMNS}"
            )
        } else {
            format!(
                "{base}, updated_at = NOW() \
                 WHERE id = $1 RETURNING {COLUMNS}"
            )
        };

        let mut q = sqlx::query_as::<_, PlanningItem>(&query)
            .bind(id)
            .bind(input.priority)
            .bind(input.client_name.as_deref())
            .bind(input.quantity)
            .bind(input.designation.as_deref())
            .bind(input.note.as_deref())
            .bind(input.unit_price)
            .bind(input.status)
            .bind(input.responsible.as_deref());
        if let Some(deadline) = input.deadline {
            q = q.bind(deadline);
        }
        q.fetch_optional(pool).await
    }

    /// Delete a row. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM planning_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite the global ordering to match the given id sequence, inside
    /// one transaction. Returns the number of rows updated.
    pub async fn reorder(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;
        for (position, id) in ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE planning_items SET position = $1, updated_at = NOW() \
                 WHERE id = $2",
            )
            .bind(position as i32)
            .bind(id)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }
}
