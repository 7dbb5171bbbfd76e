//! Repository for the `workflow_items` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::workflow_item::{
    CreateWorkflowItem, UpdateWorkflowItem, WorkflowItem, WorkflowType,
};

/// Column list for `workflow_items` queries.
const COLUMNS: &str = "id, content, item_type, position, done, created_at, updated_at";

/// CRUD and reorder operations for workflow items.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// All items, sorted for display: type, then position, id tie-break.
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkflowItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_items \
             ORDER BY item_type, position, id"
        );
        sqlx::query_as::<_, WorkflowItem>(&query).fetch_all(pool).await
    }

    /// Items of one type, position-sorted.
    pub async fn list_by_type(
        pool: &PgPool,
        item_type: WorkflowType,
    ) -> Result<Vec<WorkflowItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_items \
             WHERE item_type = $1 \
             ORDER BY position, id"
        );
        sqlx::query_as::<_, WorkflowItem>(&query)
            .bind(item_type)
            .fetch_all(pool)
            .await
    }

    /// Insert a new item at the end of its type's list.
    ///
    /// The position is computed in the same statement (max within the type
    /// plus one, or 0 for an empty list) so concurrent appends cannot race
    /// a separate max-read.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkflowItem,
    ) -> Result<WorkflowItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_items (content, item_type, position) \
             SELECT $1, $2, COALESCE(MAX(position) + 1, 0) \
             FROM workflow_items WHERE item_type = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowItem>(&query)
            .bind(&input.content)
            .bind(input.item_type)
            .fetch_one(pool)
            .await
    }

    /// Partially update an item; absent fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkflowItem,
    ) -> Result<Option<WorkflowItem>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_items SET \
                 content = COALESCE($2, content), \
                 done = COALESCE($3, done), \
                 position = COALESCE($4, position), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowItem>(&query)
            .bind(id)
            .bind(input.content.as_deref())
            .bind(input.done)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflow_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite the positions of one type's list to match the given id order.
    ///
    /// Runs inside a transaction so readers never observe a half-applied
    /// ordering. The `item_type` predicate keeps a reorder of one bucket
    /// from ever touching rows of another, even if the caller passes a
    /// foreign id. Returns the number of rows updated.
    pub async fn reorder(
        pool: &PgPool,
        item_type: WorkflowType,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;
        for (position, id) in ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE workflow_items SET position = $1, updated_at = NOW() \
                 WHERE id = $2 AND item_type = $3",
            )
            .bind(position as i32)
            .bind(id)
            .bind(item_type)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }
}
