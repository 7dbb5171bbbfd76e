//! Planning row entity model and DTOs.

use atelier_core::ordering::Positioned;
use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Row priority, cycled by clicking the priority pill.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Basse,
    Moyenne,
    Haute,
}

impl Priority {
    /// The next priority in the BASSE → MOYENNE → HAUTE → BASSE cycle.
    pub fn cycled(self) -> Self {
        match self {
            Priority::Basse => Priority::Moyenne,
            Priority::Moyenne => Priority::Haute,
            Priority::Haute => Priority::Basse,
        }
    }
}

/// Production status of a planning row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanningStatus {
    ADeviser,
    AttenteValidation,
    MaquetteAFaire,
    AttenteMarchandise,
    APreparer,
    AProduire,
    EnProduction,
    AMonterNettoyer,
    ManqueInformation,
    Termine,
    PrevenirClient,
    ClientPrevenu,
    RelanceClient,
    ProduitRecupere,
    AFacturer,
    FactureFaite,
}

/// A row from the `planning_items` table. Globally ordered by `position`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlanningItem {
    pub id: DbId,
    pub priority: Priority,
    pub client_name: String,
    pub quantity: i32,
    pub designation: String,
    pub note: String,
    pub unit_price: f64,
    pub deadline: Option<Timestamp>,
    pub status: PlanningStatus,
    pub responsible: String,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Positioned for PlanningItem {
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

/// DTO for creating a planning row. Everything is optional: a freshly added
/// row starts as an empty line the staff fills in afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlanningItem {
    pub priority: Option<Priority>,
    pub client_name: Option<String>,
    pub quantity: Option<i32>,
    pub designation: Option<String>,
    pub note: Option<String>,
    pub unit_price: Option<f64>,
    pub deadline: Option<Timestamp>,
    pub status: Option<PlanningStatus>,
    pub responsible: Option<String>,
}

/// DTO for partial updates.
///
/// `deadline` distinguishes "absent" (leave unchanged) from an explicit
/// `null` (clear the deadline) via the double-`Option` pattern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlanningItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub deadline: Option<Option<Timestamp>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanningStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
}

/// DTO for reordering the global planning list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderPlanning {
    pub ids: Vec<DbId>,
}

/// Deserialize a field that may be absent, `null`, or a value into
/// `None` / `Some(None)` / `Some(Some(v))` respectively.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
