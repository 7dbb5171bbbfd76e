//! Typed HTTP client for the dashboard API.
//!
//! Thin wrapper over `reqwest` unwrapping the server's `{ "data": ... }`
//! envelope and mapping non-success statuses to [`ClientError::Api`].

use atelier_core::types::DbId;
use atelier_db::models::order::OrderWithItems;
use atelier_db::models::person_note::{PersonNote, UpdatePersonNote};
use atelier_db::models::planning_item::{
    CreatePlanningItem, PlanningItem, ReorderPlanning, UpdatePlanningItem,
};
use atelier_db::models::user_profile::{UpdateUserProfile, UserProfile};
use atelier_db::models::workflow_item::{
    CreateWorkflowItem, ReorderWorkflow, UpdateWorkflowItem, WorkflowBoard, WorkflowItem,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;

/// Server response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Typed access to the dashboard's mutation and read endpoints.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// The `/api/v1/stream` URL for the stream consumer.
    pub fn stream_url(&self) -> String {
        format!("{}/api/v1/stream", self.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    /// Unwrap the data envelope, or surface the server's error message.
    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["error"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<Envelope<T>>().await?.data)
    }

    /// Check the status of a response whose body we do not need.
    async fn expect_success(response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // --- Workflow -----------------------------------------------------

    pub async fn fetch_workflow(&self) -> Result<WorkflowBoard, ClientError> {
        let response = self.http.get(self.url("/workflow")).send().await?;
        Self::parse(response).await
    }

    pub async fn create_workflow_item(
        &self,
        input: &CreateWorkflowItem,
    ) -> Result<WorkflowItem, ClientError> {
        let response = self
            .http
            .post(self.url("/workflow"))
            .json(input)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn update_workflow_item(
        &self,
        id: DbId,
        input: &UpdateWorkflowItem,
    ) -> Result<WorkflowItem, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/workflow/{id}")))
            .json(input)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_workflow_item(&self, id: DbId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/workflow/{id}")))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    pub async fn reorder_workflow(&self, input: &ReorderWorkflow) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/workflow/reorder"))
            .json(input)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    // --- Planning -----------------------------------------------------

    pub async fn fetch_planning(&self) -> Result<Vec<PlanningItem>, ClientError> {
        let response = self.http.get(self.url("/planning")).send().await?;
        Self::parse(response).await
    }

    pub async fn create_planning_item(
        &self,
        input: &CreatePlanningItem,
    ) -> Result<PlanningItem, ClientError> {
        let response = self
            .http
            .post(self.url("/planning"))
            .json(input)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn update_planning_item(
        &self,
        id: DbId,
        input: &UpdatePlanningItem,
    ) -> Result<PlanningItem, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/planning/{id}")))
            .json(input)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_planning_item(&self, id: DbId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/planning/{id}")))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    pub async fn reorder_planning(&self, input: &ReorderPlanning) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/planning/reorder"))
            .json(input)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    // --- Notes / profiles ---------------------------------------------

    pub async fn fetch_notes(&self) -> Result<Vec<PersonNote>, ClientError> {
        let response = self.http.get(self.url("/notes")).send().await?;
        Self::parse(response).await
    }

    pub async fn update_note(
        &self,
        person: &str,
        input: &UpdatePersonNote,
    ) -> Result<PersonNote, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/notes/{person}")))
            .json(input)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn fetch_profiles(&self) -> Result<Vec<UserProfile>, ClientError> {
        let response = self.http.get(self.url("/profiles")).send().await?;
        Self::parse(response).await
    }

    pub async fn update_profile(
        &self,
        input: &UpdateUserProfile,
    ) -> Result<UserProfile, ClientError> {
        let response = self
            .http
            .patch(self.url("/profiles"))
            .json(input)
            .send()
            .await?;
        Self::parse(response).await
    }

    // --- Orders -------------------------------------------------------

    pub async fn fetch_orders(&self) -> Result<Vec<OrderWithItems>, ClientError> {
        let response = self.http.get(self.url("/orders")).send().await?;
        Self::parse(response).await
    }
}
