//! Integration tests for the board repositories against a real database:
//! - Workflow item creation assigns per-type positions
//! - Reordering one type leaves other types untouched
//! - Planning list global ordering
//! - Person note lazy creation and updates
//! - Order ingest, unique order numbers, and stats

use atelier_core::team::TodoItem;
use atelier_db::models::order::{CreateOrder, CreateOrderItem};
use atelier_db::models::person_note::UpdatePersonNote;
use atelier_db::models::planning_item::{
    CreatePlanningItem, Priority, UpdatePlanningItem,
};
use atelier_db::models::workflow_item::{
    CreateWorkflowItem, UpdateWorkflowItem, WorkflowType,
};
use atelier_db::repositories::{
    NoteRepo, OrderRepo, PlanningRepo, ProfileRepo, WorkflowRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_item(content: &str, item_type: WorkflowType) -> CreateWorkflowItem {
    CreateWorkflowItem {
        content: content.to_string(),
        item_type,
    }
}

fn new_order(order_number: &str) -> CreateOrder {
    CreateOrder {
        order_number: order_number.to_string(),
        customer_name: "Marie Dupont".to_string(),
        customer_email: "marie@example.com".to_string(),
        customer_phone: None,
        status: None,
        payment_status: None,
        total: 149.99,
        subtotal: 129.99,
        shipping: Some(9.9),
        tax: Some(10.1),
        currency: None,
        notes: None,
        category: Some("t-shirt".to_string()),
        deadline: None,
        items: vec![CreateOrderItem {
            name: "T-Shirt Premium".to_string(),
            sku: Some("TSP-001".to_string()),
            quantity: 2,
            price: 49.99,
            image_url: None,
        }],
    }
}

// ---------------------------------------------------------------------------
// Workflow items
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn workflow_create_appends_within_type(pool: PgPool) {
    let a = WorkflowRepo::create(&pool, &new_item("a", WorkflowType::Achat))
        .await
        .unwrap();
    let b = WorkflowRepo::create(&pool, &new_item("b", WorkflowType::Achat))
        .await
        .unwrap();
    // A different type starts its own sequence at 0.
    let d = WorkflowRepo::create(&pool, &new_item("d", WorkflowType::Dtf))
        .await
        .unwrap();

    assert_eq!(a.position, 0);
    assert_eq!(b.position, 1);
    assert_eq!(d.position, 0);
}

#[sqlx::test]
async fn workflow_reorder_rewrites_one_bucket_only(pool: PgPool) {
    // DTF bucket: A, B, C in insertion order.
    let a = WorkflowRepo::create(&pool, &new_item("A", WorkflowType::Dtf))
        .await
        .unwrap();
    let b = WorkflowRepo::create(&pool, &new_item("B", WorkflowType::Dtf))
        .await
        .unwrap();
    let c = WorkflowRepo::create(&pool, &new_item("C", WorkflowType::Dtf))
        .await
        .unwrap();
    // An unrelated bucket that must not move.
    let x = WorkflowRepo::create(&pool, &new_item("X", WorkflowType::Atelier))
        .await
        .unwrap();

    // Drag into [C, A, B].
    let updated = WorkflowRepo::reorder(&pool, WorkflowType::Dtf, &[c.id, a.id, b.id])
        .await
        .unwrap();
    assert_eq!(updated, 3);

    let dtf = WorkflowRepo::list_by_type(&pool, WorkflowType::Dtf)
        .await
        .unwrap();
    let order: Vec<_> = dtf.iter().map(|i| (i.id, i.position)).collect();
    assert_eq!(order, vec![(c.id, 0), (a.id, 1), (b.id, 2)]);

    let atelier = WorkflowRepo::list_by_type(&pool, WorkflowType::Atelier)
        .await
        .unwrap();
    assert_eq!(atelier[0].id, x.id);
    assert_eq!(atelier[0].position, 0);
}

#[sqlx::test]
async fn workflow_reorder_ignores_foreign_ids(pool: PgPool) {
    let a = WorkflowRepo::create(&pool, &new_item("A", WorkflowType::Dtf))
        .await
        .unwrap();
    let other = WorkflowRepo::create(&pool, &new_item("other", WorkflowType::Achat))
        .await
        .unwrap();

    // Sneaking another bucket's id into the reorder must not move it.
    let updated = WorkflowRepo::reorder(&pool, WorkflowType::Dtf, &[other.id, a.id])
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let achat = WorkflowRepo::list_by_type(&pool, WorkflowType::Achat)
        .await
        .unwrap();
    assert_eq!(achat[0].position, 0);
}

#[sqlx::test]
async fn workflow_update_and_delete(pool: PgPool) {
    let item = WorkflowRepo::create(&pool, &new_item("Buy thread", WorkflowType::Achat))
        .await
        .unwrap();

    let updated = WorkflowRepo::update(
        &pool,
        item.id,
        &UpdateWorkflowItem {
            done: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("item should exist");
    assert!(updated.done);
    assert_eq!(updated.content, "Buy thread");

    assert!(WorkflowRepo::delete(&pool, item.id).await.unwrap());
    assert!(!WorkflowRepo::delete(&pool, item.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Planning items
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn planning_rows_share_one_global_order(pool: PgPool) {
    let first = PlanningRepo::create(&pool, &CreatePlanningItem::default())
        .await
        .unwrap();
    let second = PlanningRepo::create(&pool, &CreatePlanningItem::default())
        .await
        .unwrap();

    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);
    assert_eq!(first.priority, Priority::Moyenne);
    assert_eq!(first.quantity, 1);

    PlanningRepo::reorder(&pool, &[second.id, first.id])
        .await
        .unwrap();
    let rows = PlanningRepo::list(&pool).await.unwrap();
    let order: Vec<_> = rows.iter().map(|r| r.id).collect();
    assert_eq!(order, vec![second.id, first.id]);
}

#[sqlx::test]
async fn planning_update_clears_deadline_on_explicit_null(pool: PgPool) {
    let row = PlanningRepo::create(
        &pool,
        &CreatePlanningItem {
            deadline: Some(chrono::Utc::now()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(row.deadline.is_some());

    // Patch without deadline: unchanged.
    let patched = PlanningRepo::update(
        &pool,
        row.id,
        &UpdatePlanningItem {
            note: Some("urgent".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(patched.deadline.is_some());
    assert_eq!(patched.note, "urgent");

    // Explicit null clears it.
    let cleared = PlanningRepo::update(
        &pool,
        row.id,
        &UpdatePlanningItem {
            deadline: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cleared.deadline.is_none());
}

// ---------------------------------------------------------------------------
// Person notes and profiles
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn notes_are_lazily_created_for_the_whole_team(pool: PgPool) {
    let notes = NoteRepo::list(&pool).await.unwrap();
    let people: Vec<_> = notes.iter().map(|n| n.person.as_str()).collect();
    assert_eq!(people, vec!["loic", "charlie", "melina", "amandine"]);
    assert!(notes.iter().all(|n| n.todos.0.is_empty()));

    // Listing again must not duplicate rows.
    let again = NoteRepo::list(&pool).await.unwrap();
    assert_eq!(again.len(), 4);
}

#[sqlx::test]
async fn note_update_replaces_todos(pool: PgPool) {
    NoteRepo::get_or_create(&pool, "charlie").await.unwrap();

    let todos = vec![TodoItem {
        id: "t1".to_string(),
        text: "maquette NS300".to_string(),
        done: false,
    }];
    let updated = NoteRepo::update(
        &pool,
        "charlie",
        &UpdatePersonNote {
            content: None,
            todos: Some(todos.clone()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.todos.0, todos);
    assert_eq!(updated.content, "");
}

#[sqlx::test]
async fn profile_upsert_preserves_unset_fields(pool: PgPool) {
    use atelier_db::models::user_profile::UpdateUserProfile;

    ProfileRepo::update(
        &pool,
        &UpdateUserProfile {
            person: "melina".to_string(),
            mood: Some("en forme".to_string()),
            profile_photo_link: None,
        },
    )
    .await
    .unwrap();

    let updated = ProfileRepo::update(
        &pool,
        &UpdateUserProfile {
            person: "melina".to_string(),
            mood: None,
            profile_photo_link: Some("https://example.com/melina.jpg".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.mood, "en forme");
    assert_eq!(
        updated.profile_photo_link.as_deref(),
        Some("https://example.com/melina.jpg")
    );
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn order_ingest_inserts_items_and_lists_newest_first(pool: PgPool) {
    OrderRepo::create(&pool, &new_order("CMD-1001")).await.unwrap();
    OrderRepo::create(&pool, &new_order("CMD-1002")).await.unwrap();

    let orders = OrderRepo::list(&pool, 50, 0).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order.order_number, "CMD-1002");
    assert_eq!(orders[1].items.len(), 1);
    assert_eq!(orders[1].items[0].quantity, 2);
}

#[sqlx::test]
async fn duplicate_order_number_is_rejected(pool: PgPool) {
    OrderRepo::create(&pool, &new_order("CMD-1001")).await.unwrap();
    let err = OrderRepo::create(&pool, &new_order("CMD-1001"))
        .await
        .expect_err("duplicate order_number must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_orders_order_number"));
        }
        other => panic!("expected database error, got: {other:?}"),
    }
}

#[sqlx::test]
async fn stats_roll_up_totals(pool: PgPool) {
    let mut paid = new_order("CMD-2001");
    paid.payment_status = Some(atelier_db::models::order::PaymentStatus::Paid);
    OrderRepo::create(&pool, &paid).await.unwrap();
    OrderRepo::create(&pool, &new_order("CMD-2002")).await.unwrap();

    let stats = OrderRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.paid_orders, 1);
    assert_eq!(stats.pending_orders, 1);
    // Both created just now, so today's figures match the totals.
    assert_eq!(stats.today_orders, 2);
    assert!((stats.total_revenue - 299.98).abs() < 1e-6);
}
