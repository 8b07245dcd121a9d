//! Server seam used by the wizard.
//!
//! The app layer talks to the server exclusively through this trait so the
//! wizard flow can be driven in tests by a scripted fake. [`ApiClient`]
//! is the production implementation.
//!
//! [`ApiClient`]: super::ApiClient

use async_trait::async_trait;

use super::error::ApiError;
use crate::types::{
    Action, ActionCreate, Application, ApplicationUpdate, Company, CompanyCreate, Contact,
    ContactCreate, Document, DocumentCreate, Opportunity, OpportunityUpdate, Product,
    ProductCreate, ScheduledEvent, ScheduledEventCreate, WizardInitRequest,
};

/// Operations the wizard issues against the server.
///
/// Every call is a single request/response round-trip; no retry, no
/// batching. Callers apply local state changes only after `Ok`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Combined init: create an Opportunity and its Application atomically.
    /// Returns the created Application (carrying `opportunity_id`).
    async fn init_application(&self, request: &WizardInitRequest) -> Result<Application, ApiError>;

    async fn get_opportunity(&self, id: i64) -> Result<Opportunity, ApiError>;
    async fn get_application(&self, id: i64) -> Result<Application, ApiError>;

    /// Partial update; used by the primary-company link toggle.
    async fn update_opportunity(
        &self,
        id: i64,
        update: &OpportunityUpdate,
    ) -> Result<Opportunity, ApiError>;

    /// Partial update; used by the resume / cover-letter role toggles.
    async fn update_application(
        &self,
        id: i64,
        update: &ApplicationUpdate,
    ) -> Result<Application, ApiError>;

    async fn create_company(&self, create: &CompanyCreate) -> Result<Company, ApiError>;
    async fn delete_company(&self, id: i64) -> Result<(), ApiError>;

    async fn create_contact(&self, create: &ContactCreate) -> Result<Contact, ApiError>;
    async fn delete_contact(&self, id: i64) -> Result<(), ApiError>;

    async fn create_document(&self, create: &DocumentCreate) -> Result<Document, ApiError>;
    async fn delete_document(&self, id: i64) -> Result<(), ApiError>;

    async fn create_product(&self, create: &ProductCreate) -> Result<Product, ApiError>;
    async fn delete_product(&self, id: i64) -> Result<(), ApiError>;

    async fn create_event(&self, create: &ScheduledEventCreate)
        -> Result<ScheduledEvent, ApiError>;
    async fn delete_event(&self, id: i64) -> Result<(), ApiError>;

    async fn create_action(&self, create: &ActionCreate) -> Result<Action, ApiError>;
    async fn delete_action(&self, id: i64) -> Result<(), ApiError>;
}
