//! Optimistic mutations with debounced persistence.
//!
//! Every operation updates the mirror immediately, so the UI renders the
//! change with zero latency, then persists on a quiet-period debounce.
//! Deletes persist immediately and reconcile by refetch on failure, since
//! a failed delete leaves the UI showing less than the server has.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use atelier_core::ordering::{apply_order, sort_for_display};
use atelier_core::team::TodoItem;
use atelier_core::types::DbId;
use atelier_db::models::order::OrderSummary;
use atelier_db::models::person_note::UpdatePersonNote;
use atelier_db::models::planning_item::{
    CreatePlanningItem, PlanningItem, ReorderPlanning, UpdatePlanningItem,
};
use atelier_db::models::workflow_item::{
    CreateWorkflowItem, ReorderWorkflow, UpdateWorkflowItem, WorkflowItem, WorkflowType,
};

use crate::api::ApiClient;
use crate::debounce::DebouncedWriter;
use crate::error::ClientError;
use crate::mirror::{EditKey, SharedMirror};

/// Debounce for workflow and note edits (fast single-line fields).
pub const WORKFLOW_DEBOUNCE: Duration = Duration::from_millis(600);
/// Debounce for planning row edits (wider grid, slower typing).
pub const PLANNING_DEBOUNCE: Duration = Duration::from_millis(800);
/// Debounce for note/todo edits.
pub const NOTE_DEBOUNCE: Duration = Duration::from_millis(600);

/// Client-side mutation layer: mirror + API + debounced writer.
pub struct Workspace {
    mirror: SharedMirror,
    api: Arc<ApiClient>,
    writer: DebouncedWriter,
    /// Planning edits accumulate here between debounce firings so a burst
    /// touching several fields persists as one merged patch.
    pending_planning: Arc<Mutex<HashMap<DbId, UpdatePlanningItem>>>,
    /// Optimistic records get negative ids until the server replies.
    next_temp_id: AtomicI64,
}

impl Workspace {
    pub fn new(api: ApiClient, mirror: SharedMirror) -> Self {
        Self {
            mirror,
            api: Arc::new(api),
            writer: DebouncedWriter::new(),
            pending_planning: Arc::new(Mutex::new(HashMap::new())),
            next_temp_id: AtomicI64::new(-1),
        }
    }

    pub fn mirror(&self) -> &SharedMirror {
        &self.mirror
    }

    pub fn writer(&self) -> &DebouncedWriter {
        &self.writer
    }

    /// Load the authoritative state into the mirror.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let board = self.api.fetch_workflow().await?;
        let planning = self.api.fetch_planning().await?;
        let notes = self.api.fetch_notes().await?;
        let orders = self.api.fetch_orders().await?;

        let mut mirror = self.mirror.write().await;
        mirror.replace_workflow(board);
        mirror.replace_planning(planning);
        mirror.replace_notes(notes);
        mirror.replace_orders(
            orders
                .iter()
                .map(|o| OrderSummary::from(&o.order))
                .collect(),
        );
        Ok(())
    }

    /// Drop every pending write. Call on teardown.
    pub fn shutdown(&self) {
        self.writer.cancel_all();
    }

    // --- Editing focus ------------------------------------------------

    /// Mark a record as being edited; pushes for it are suppressed.
    pub async fn begin_editing(&self, key: EditKey) {
        self.mirror.write().await.begin_editing(key);
    }

    /// End editing and commit the record's pending writes immediately.
    pub async fn end_editing(&self) {
        let key = self.mirror.write().await.end_editing();
        match key {
            Some(EditKey::Workflow(id)) => self.commit_workflow_item(id).await,
            Some(EditKey::Planning(id)) => self.commit_planning_row(id).await,
            Some(EditKey::Note(person)) => self.commit_note(&person).await,
            None => {}
        }
    }

    // --- Workflow -----------------------------------------------------

    /// Add an item to a list. Shows up instantly under a temporary
    /// (negative) id; the debounced POST swaps in the canonical record.
    pub async fn add_workflow_item(&self, item_type: WorkflowType, content: &str) -> DbId {
        let temp_id = self.next_temp_id.fetch_sub(1, Ordering::Relaxed);
        {
            let mut mirror = self.mirror.write().await;
            let bucket = mirror.workflow.bucket_mut(item_type);
            let now = chrono::Utc::now();
            let position = bucket.len() as i32;
            bucket.push(WorkflowItem {
                id: temp_id,
                content: content.to_string(),
                item_type,
                position,
                done: false,
                created_at: now,
                updated_at: now,
            });
        }

        let api = Arc::clone(&self.api);
        let mirror = Arc::clone(&self.mirror);
        self.writer.schedule(
            &format!("workflow:create:{temp_id}"),
            WORKFLOW_DEBOUNCE,
            async move {
                // Read the item at fire time so follow-up keystrokes on
                // the unsaved row are included in the create.
                let input = mirror
                    .read()
                    .await
                    .find_workflow(temp_id)
                    .map(|item| CreateWorkflowItem {
                        content: item.content.clone(),
                        item_type: item.item_type,
                    });
                let Some(input) = input else {
                    return; // removed before it was ever persisted
                };
                match api.create_workflow_item(&input).await {
                    Ok(item) => {
                        mirror.write().await.resolve_temp_workflow(temp_id, item);
                    }
                    Err(error) => {
                        tracing::warn!(%error, "Failed to persist new workflow item");
                    }
                }
            },
        );
        temp_id
    }

    /// Edit an item's text. Applied locally at once, persisted after the
    /// debounce window.
    pub async fn set_workflow_content(&self, id: DbId, content: &str) {
        {
            let mut mirror = self.mirror.write().await;
            let Some(item_type) = mirror.find_workflow(id).map(|i| i.item_type) else {
                return;
            };
            if let Some(item) = mirror
                .workflow
                .bucket_mut(item_type)
                .iter_mut()
                .find(|i| i.id == id)
            {
                item.content = content.to_string();
            }
        }
        if id < 0 {
            // Unsaved row: the pending create reads the latest content.
            return;
        }
        self.schedule_workflow_patch(id, "content", WORKFLOW_DEBOUNCE);
    }

    /// Toggle an item's done flag, persisted on the same debounce.
    pub async fn toggle_workflow_done(&self, id: DbId) {
        {
            let mut mirror = self.mirror.write().await;
            let Some(item_type) = mirror.find_workflow(id).map(|i| i.item_type) else {
                return;
            };
            if let Some(item) = mirror
                .workflow
                .bucket_mut(item_type)
                .iter_mut()
                .find(|i| i.id == id)
            {
                item.done = !item.done;
            }
        }
        if id < 0 {
            return;
        }
        self.schedule_workflow_patch(id, "done", WORKFLOW_DEBOUNCE);
    }

    /// Schedule a single-field PATCH whose value is read from the mirror
    /// when the debounce fires, so only the final value is sent.
    fn schedule_workflow_patch(&self, id: DbId, field: &'static str, delay: Duration) {
        let api = Arc::clone(&self.api);
        let mirror = Arc::clone(&self.mirror);
        self.writer.schedule(
            &format!("workflow:{id}:{field}"),
            delay,
            async move {
                let patch = {
                    let state = mirror.read().await;
                    state.find_workflow(id).map(|item| match field {
                        "content" => UpdateWorkflowItem {
                            content: Some(item.content.clone()),
                            ..Default::default()
                        },
                        _ => UpdateWorkflowItem {
                            done: Some(item.done),
                            ..Default::default()
                        },
                    })
                };
                let Some(patch) = patch else { return };
                if let Err(error) = api.update_workflow_item(id, &patch).await {
                    tracing::warn!(%error, item_id = id, "Failed to persist workflow edit");
                }
            },
        );
    }

    /// Short-circuit the debounce for one item (blur / explicit commit).
    pub async fn commit_workflow_item(&self, id: DbId) {
        self.writer.flush(&format!("workflow:create:{id}")).await;
        self.writer.flush(&format!("workflow:{id}:content")).await;
        self.writer.flush(&format!("workflow:{id}:done")).await;
    }

    /// Remove an item. The UI drops it immediately; the DELETE goes out
    /// right away, and a failure reconciles by refetching the lists.
    pub async fn remove_workflow_item(&self, id: DbId) -> Result<(), ClientError> {
        {
            let mut mirror = self.mirror.write().await;
            for item_type in WorkflowType::ALL {
                mirror.workflow.bucket_mut(item_type).retain(|i| i.id != id);
            }
        }
        self.writer.cancel(&format!("workflow:{id}:content"));
        self.writer.cancel(&format!("workflow:{id}:done"));

        if id < 0 {
            // Never persisted: cancelling the create is the whole delete.
            self.writer.cancel(&format!("workflow:create:{id}"));
            return Ok(());
        }

        if let Err(error) = self.api.delete_workflow_item(id).await {
            tracing::warn!(%error, item_id = id, "Delete failed, refetching workflow lists");
            let board = self.api.fetch_workflow().await?;
            self.mirror.write().await.replace_workflow(board);
        }
        Ok(())
    }

    /// Apply a drag-and-drop ordering: positions `0..n-1` locally, one
    /// batched request to persist. A failed persist logs and leaves the
    /// optimistic order until the next sync.
    pub async fn reorder_workflow(&self, item_type: WorkflowType, ids: &[DbId]) {
        {
            let mut mirror = self.mirror.write().await;
            apply_order(mirror.workflow.bucket_mut(item_type), ids);
        }
        let input = ReorderWorkflow {
            item_type,
            ids: ids.to_vec(),
        };
        if let Err(error) = self.api.reorder_workflow(&input).await {
            tracing::warn!(%error, ?item_type, "Failed to persist reorder");
        }
    }

    // --- Planning -----------------------------------------------------

    /// Add a blank planning row. Rows are created server-side immediately
    /// (they are born empty, there is nothing to debounce).
    pub async fn add_planning_row(&self) -> Result<PlanningItem, ClientError> {
        let item = self
            .api
            .create_planning_item(&CreatePlanningItem::default())
            .await?;
        {
            let mut mirror = self.mirror.write().await;
            mirror.planning.retain(|i| i.id != item.id);
            mirror.planning.push(item.clone());
            sort_for_display(&mut mirror.planning);
        }
        Ok(item)
    }

    /// Edit planning fields. The patch applies to the mirror at once and
    /// merges into the row's pending patch; one debounced PATCH carries
    /// the final value of every field touched during the burst.
    pub async fn update_planning_row(&self, id: DbId, patch: UpdatePlanningItem) {
        {
            let mut mirror = self.mirror.write().await;
            if let Some(item) = mirror.find_planning_mut(id) {
                apply_planning_patch(item, &patch);
            } else {
                return;
            }
        }
        merge_planning_patch(
            self.pending_planning.lock().unwrap().entry(id).or_default(),
            patch,
        );

        let api = Arc::clone(&self.api);
        let pending = Arc::clone(&self.pending_planning);
        self.writer.schedule(
            &format!("planning:{id}"),
            PLANNING_DEBOUNCE,
            async move {
                let patch = pending.lock().unwrap().remove(&id);
                let Some(patch) = patch else { return };
                if let Err(error) = api.update_planning_item(id, &patch).await {
                    tracing::warn!(%error, item_id = id, "Failed to persist planning edit");
                }
            },
        );
    }

    /// Short-circuit the debounce for one row (blur / explicit commit).
    pub async fn commit_planning_row(&self, id: DbId) {
        self.writer.flush(&format!("planning:{id}")).await;
    }

    /// Remove a row, optimistically; refetch the list if the DELETE fails.
    pub async fn remove_planning_row(&self, id: DbId) -> Result<(), ClientError> {
        self.mirror.write().await.planning.retain(|i| i.id != id);
        self.writer.cancel(&format!("planning:{id}"));
        self.pending_planning.lock().unwrap().remove(&id);

        if let Err(error) = self.api.delete_planning_item(id).await {
            tracing::warn!(%error, item_id = id, "Delete failed, refetching planning list");
            let items = self.api.fetch_planning().await?;
            self.mirror.write().await.replace_planning(items);
        }
        Ok(())
    }

    /// Reorder the global planning list.
    pub async fn reorder_planning(&self, ids: &[DbId]) {
        {
            let mut mirror = self.mirror.write().await;
            apply_order(&mut mirror.planning, ids);
        }
        let input = ReorderPlanning { ids: ids.to_vec() };
        if let Err(error) = self.api.reorder_planning(&input).await {
            tracing::warn!(%error, "Failed to persist planning reorder");
        }
    }

    // --- Notes --------------------------------------------------------

    /// Append a todo to a person's list.
    pub async fn add_todo(&self, person: &str, text: &str) -> TodoItem {
        let todo = TodoItem {
            id: uuid::Uuid::new_v4().simple().to_string(),
            text: text.to_string(),
            done: false,
        };
        {
            let mut mirror = self.mirror.write().await;
            mirror.note_entry(person).todos.0.push(todo.clone());
        }
        self.schedule_note_todos(person);
        todo
    }

    /// Flip a todo's done flag.
    pub async fn toggle_todo(&self, person: &str, todo_id: &str) {
        {
            let mut mirror = self.mirror.write().await;
            let note = mirror.note_entry(person);
            if let Some(todo) = note.todos.0.iter_mut().find(|t| t.id == todo_id) {
                todo.done = !todo.done;
            }
        }
        self.schedule_note_todos(person);
    }

    /// Remove a todo from a person's list.
    pub async fn remove_todo(&self, person: &str, todo_id: &str) {
        {
            let mut mirror = self.mirror.write().await;
            mirror.note_entry(person).todos.0.retain(|t| t.id != todo_id);
        }
        self.schedule_note_todos(person);
    }

    /// Edit a person's free-text note.
    pub async fn set_note_content(&self, person: &str, content: &str) {
        {
            let mut mirror = self.mirror.write().await;
            mirror.note_entry(person).content = content.to_string();
        }
        let api = Arc::clone(&self.api);
        let mirror = Arc::clone(&self.mirror);
        let person = person.to_string();
        let key = format!("note:{person}:content");
        self.writer.schedule(&key, NOTE_DEBOUNCE, async move {
            let content = mirror
                .read()
                .await
                .note(&person)
                .map(|n| n.content.clone());
            let Some(content) = content else { return };
            let patch = UpdatePersonNote {
                content: Some(content),
                todos: None,
            };
            if let Err(error) = api.update_note(&person, &patch).await {
                tracing::warn!(%error, person = %person, "Failed to persist note content");
            }
        });
    }

    /// Debounced persistence of a person's whole todo array; the array is
    /// read at fire time so a burst of toggles sends one final state.
    fn schedule_note_todos(&self, person: &str) {
        let api = Arc::clone(&self.api);
        let mirror = Arc::clone(&self.mirror);
        let person = person.to_string();
        let key = format!("note:{person}:todos");
        self.writer.schedule(&key, NOTE_DEBOUNCE, async move {
            let todos = mirror.read().await.note(&person).map(|n| n.todos.0.clone());
            let Some(todos) = todos else { return };
            let patch = UpdatePersonNote {
                content: None,
                todos: Some(todos),
            };
            if let Err(error) = api.update_note(&person, &patch).await {
                tracing::warn!(%error, person = %person, "Failed to persist todos");
            }
        });
    }

    /// Short-circuit pending note writes for one person.
    pub async fn commit_note(&self, person: &str) {
        self.writer.flush(&format!("note:{person}:content")).await;
        self.writer.flush(&format!("note:{person}:todos")).await;
    }
}

/// Apply the `Some` fields of a patch onto a planning row.
fn apply_planning_patch(item: &mut PlanningItem, patch: &UpdatePlanningItem) {
    if let Some(priority) = patch.priority {
        item.priority = priority;
    }
    if let Some(ref client_name) = patch.client_name {
        item.client_name = client_name.clone();
    }
    if let Some(quantity) = patch.quantity {
        item.quantity = quantity;
    }
    if let Some(ref designation) = patch.designation {
        item.designation = designation.clone();
    }
    if let Some(ref note) = patch.note {
        item.note = note.clone();
    }
    if let Some(unit_price) = patch.unit_price {
        item.unit_price = unit_price;
    }
    if let Some(deadline) = patch.deadline {
        item.deadline = deadline;
    }
    if let Some(status) = patch.status {
        item.status = status;
    }
    if let Some(ref responsible) = patch.responsible {
        item.responsible = responsible.clone();
    }
}

/// Merge `new` into `base`: later edits win field by field.
fn merge_planning_patch(base: &mut UpdatePlanningItem, new: UpdatePlanningItem) {
    if new.priority.is_some() {
        base.priority = new.priority;
    }
    if new.client_name.is_some() {
        base.client_name = new.client_name;
    }
    if new.quantity.is_some() {
        base.quantity = new.quantity;
    }
    if new.designation.is_some() {
        base.designation = new.designation;
    }
    if new.note.is_some() {
        base.note = new.note;
    }
    if new.unit_price.is_some() {
        base.unit_price = new.unit_price;
    }
    if new.deadline.is_some() {
        base.deadline = new.deadline;
    }
    if new.status.is_some() {
        base.status = new.status;
    }
    if new.responsible.is_some() {
        base.responsible = new.responsible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::RwLock;

    use crate::mirror::BoardMirror;

    /// Workspace pointed at a dead port: optimistic behaviour is
    /// observable, persistence calls fail fast.
    fn offline_workspace() -> Workspace {
        let mirror: SharedMirror = Arc::new(RwLock::new(BoardMirror::new()));
        Workspace::new(ApiClient::new("http://127.0.0.1:1"), mirror)
    }

    #[tokio::test(start_paused = true)]
    async fn added_items_render_immediately_with_temp_ids() {
        let ws = offline_workspace();

        let temp = ws.add_workflow_item(WorkflowType::Achat, "Buy thread").await;
        assert!(temp < 0);

        let mirror = ws.mirror().read().await;
        let bucket = mirror.workflow.bucket(WorkflowType::Achat);
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].content, "Buy thread");
        assert_eq!(bucket[0].position, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn temp_ids_are_distinct_per_bucket_entry() {
        let ws = offline_workspace();
        let a = ws.add_workflow_item(WorkflowType::Achat, "a").await;
        let b = ws.add_workflow_item(WorkflowType::Achat, "b").await;
        assert_ne!(a, b);

        let mirror = ws.mirror().read().await;
        assert_eq!(mirror.workflow.achat[1].position, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn content_edits_apply_locally_before_any_persistence() {
        let ws = offline_workspace();
        let id = ws.add_workflow_item(WorkflowType::Dtf, "dra").await;

        ws.set_workflow_content(id, "draft final").await;

        let mirror = ws.mirror().read().await;
        assert_eq!(mirror.workflow.dtf[0].content, "draft final");
        // Only the pending create is scheduled; temp rows don't PATCH.
        assert_eq!(ws.writer().pending_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn removing_a_temp_item_cancels_its_create() {
        let ws = offline_workspace();
        let id = ws.add_workflow_item(WorkflowType::Atelier, "oops").await;
        assert_eq!(ws.writer().pending_count(), 1);

        ws.remove_workflow_item(id).await.unwrap();

        assert_eq!(ws.writer().pending_count(), 0);
        let mirror = ws.mirror().read().await;
        assert!(mirror.workflow.atelier.is_empty());
    }

    #[tokio::test]
    async fn reorder_rewrites_local_positions_even_if_persist_fails() {
        let ws = offline_workspace();
        {
            let mut mirror = ws.mirror().write().await;
            let now = chrono::Utc::now();
            for (id, position) in [(1, 0), (2, 1), (3, 2)] {
                mirror.workflow.dtf.push(WorkflowItem {
                    id,
                    content: format!("item {id}"),
                    item_type: WorkflowType::Dtf,
                    position,
                    done: false,
                    created_at: now,
                    updated_at: now,
                });
            }
        }

        // Drag [1, 2, 3] into [3, 1, 2]; the persist call fails (dead
        // port) but the local order stands.
        ws.reorder_workflow(WorkflowType::Dtf, &[3, 1, 2]).await;

        let mirror = ws.mirror().read().await;
        let order: Vec<_> = mirror.workflow.dtf.iter().map(|i| (i.id, i.position)).collect();
        assert_eq!(order, vec![(3, 0), (1, 1), (2, 2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn planning_edit_bursts_merge_into_one_pending_patch() {
        let ws = offline_workspace();
        {
            let mut mirror = ws.mirror().write().await;
            mirror.replace_planning(vec![blank_planning_row(5)]);
        }

        ws.update_planning_row(
            5,
            UpdatePlanningItem {
                client_name: Some("Olda".to_string()),
                ..Default::default()
            },
        )
        .await;
        ws.update_planning_row(
            5,
            UpdatePlanningItem {
                client_name: Some("Olda Studio".to_string()),
                ..Default::default()
            },
        )
        .await;
        ws.update_planning_row(
            5,
            UpdatePlanningItem {
                quantity: Some(50),
                ..Default::default()
            },
        )
        .await;

        // One debounce entry for the row; the pending patch carries the
        // final value of both fields.
        assert_eq!(ws.writer().pending_count(), 1);
        {
            let pending = ws.pending_planning.lock().unwrap();
            let patch = pending.get(&5).unwrap();
            assert_eq!(patch.client_name.as_deref(), Some("Olda Studio"));
            assert_eq!(patch.quantity, Some(50));
        }

        let mirror = ws.mirror().read().await;
        let row = mirror.find_planning(5).unwrap();
        assert_eq!(row.client_name, "Olda Studio");
        assert_eq!(row.quantity, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn todo_operations_edit_the_mirror_and_schedule_one_write() {
        let ws = offline_workspace();

        let todo = ws.add_todo("loic", "rappeler client").await;
        ws.toggle_todo("loic", &todo.id).await;
        ws.add_todo("loic", "commander encre").await;

        let mirror = ws.mirror().read().await;
        let note = mirror.note("loic").unwrap();
        assert_eq!(note.todos.0.len(), 2);
        assert!(note.todos.0[0].done);
        drop(mirror);

        // All three operations coalesced under the person's todos key.
        assert_eq!(ws.writer().pending_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ending_an_edit_flushes_that_records_pending_writes() {
        let ws = offline_workspace();
        ws.begin_editing(EditKey::Note("melina".to_string())).await;
        ws.add_todo("melina", "nettoyer presse").await;
        assert_eq!(ws.writer().pending_count(), 1);

        // Blur: the debounce is short-circuited (the write itself fails
        // against the dead port, which is fine here).
        ws.end_editing().await;
        assert_eq!(ws.writer().pending_count(), 0);
        assert!(ws.mirror().read().await.editing().is_none());
    }

    fn blank_planning_row(id: DbId) -> PlanningItem {
        use atelier_db::models::planning_item::{PlanningStatus, Priority};
        let now = chrono::Utc::now();
        PlanningItem {
            id,
            priority: Priority::Moyenne,
            client_name: String::new(),
            quantity: 1,
            designation: String::new(),
            note: String::new(),
            unit_price: 0.0,
            deadline: None,
            status: PlanningStatus::ADeviser,
            responsible: String::new(),
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
