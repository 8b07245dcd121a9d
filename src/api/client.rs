//! HTTP client for the CandiDash REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::auth::AuthToken;
use super::backend::Backend;
use super::error::ApiError;
use crate::types::{
    Action, ActionCreate, Application, ApplicationUpdate, Company, CompanyCreate, Contact,
    ContactCreate, Document, DocumentCreate, Opportunity, OpportunityContact,
    OpportunityContactCreate, OpportunityCreate, OpportunityProduct, OpportunityProductCreate,
    OpportunityUpdate, Product, ProductCreate, ScheduledEvent, ScheduledEventCreate, User,
    WizardInitRequest,
};

const USER_AGENT: &str = concat!("candidash-tui/", env!("CARGO_PKG_VERSION"));

/// Client for the CandiDash API (`<base_url>/api/v1`).
///
/// Cheap to clone; holds the bearer token for authenticated calls. Only
/// `login` works without one.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn bearer(&self) -> Result<String, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::NotAuthenticated)?;
        Ok(format!("Bearer {token}"))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::network(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.api_url(path))
            .header("Authorization", self.bearer()?)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.api_url(path))
            .header("Authorization", self.bearer()?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .put(self.api_url(path))
            .header("Authorization", self.bearer()?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.api_url(path))
            .header("Authorization", self.bearer()?)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body));
        }
        Ok(())
    }

    /// Exchange credentials for a bearer token. OAuth2 password flow: the
    /// email goes in the `username` form field.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, ApiError> {
        let response = self
            .client
            .post(self.api_url("/auth/login"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        Self::read_json(response).await
    }

    /// The authenticated account; its id scopes the wizard session key.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/users/me").await
    }

    pub async fn list_opportunities(&self) -> Result<Vec<Opportunity>, ApiError> {
        self.get_json("/opportunities/").await
    }

    pub async fn list_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.get_json("/applications/").await
    }

    pub async fn list_events(&self) -> Result<Vec<ScheduledEvent>, ApiError> {
        self.get_json("/scheduled-events/").await
    }

    pub async fn list_actions(&self) -> Result<Vec<Action>, ApiError> {
        self.get_json("/actions/").await
    }

    pub async fn create_opportunity(
        &self,
        create: &OpportunityCreate,
    ) -> Result<Opportunity, ApiError> {
        self.post_json("/opportunities/", create).await
    }

    pub async fn delete_opportunity(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/opportunities/{id}")).await
    }

    pub async fn delete_application(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/applications/{id}")).await
    }

    pub async fn create_opportunity_contact(
        &self,
        create: &OpportunityContactCreate,
    ) -> Result<OpportunityContact, ApiError> {
        self.post_json("/opportunity-contacts/", create).await
    }

    pub async fn delete_opportunity_contact(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/opportunity-contacts/{id}")).await
    }

    pub async fn create_opportunity_product(
        &self,
        create: &OpportunityProductCreate,
    ) -> Result<OpportunityProduct, ApiError> {
        self.post_json("/opportunity-products/", create).await
    }

    pub async fn delete_opportunity_product(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/opportunity-products/{id}")).await
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn init_application(&self, request: &WizardInitRequest) -> Result<Application, ApiError> {
        self.post_json("/applications/with-opportunity", request)
            .await
    }

    async fn get_opportunity(&self, id: i64) -> Result<Opportunity, ApiError> {
        self.get_json(&format!("/opportunities/{id}")).await
    }

    async fn get_application(&self, id: i64) -> Result<Application, ApiError> {
        self.get_json(&format!("/applications/{id}")).await
    }

    async fn update_opportunity(
        &self,
        id: i64,
        update: &OpportunityUpdate,
    ) -> Result<Opportunity, ApiError> {
        self.put_json(&format!("/opportunities/{id}"), update).await
    }

    async fn update_application(
        &self,
        id: i64,
        update: &ApplicationUpdate,
    ) -> Result<Application, ApiError> {
        self.put_json(&format!("/applications/{id}"), update).await
    }

    async fn create_company(&self, create: &CompanyCreate) -> Result<Company, ApiError> {
        self.post_json("/companies/", create).await
    }

    async fn delete_company(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/companies/{id}")).await
    }

    async fn create_contact(&self, create: &ContactCreate) -> Result<Contact, ApiError> {
        self.post_json("/contacts/", create).await
    }

    async fn delete_contact(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/contacts/{id}")).await
    }

    async fn create_document(&self, create: &DocumentCreate) -> Result<Document, ApiError> {
        self.post_json("/documents/", create).await
    }

    async fn delete_document(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/documents/{id}")).await
    }

    async fn create_product(&self, create: &ProductCreate) -> Result<Product, ApiError> {
        self.post_json("/products/", create).await
    }

    async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/products/{id}")).await
    }

    async fn create_event(
        &self,
        create: &ScheduledEventCreate,
    ) -> Result<ScheduledEvent, ApiError> {
        self.post_json("/scheduled-events/", create).await
    }

    async fn delete_event(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/scheduled-events/{id}")).await
    }

    async fn create_action(&self, create: &ActionCreate) -> Result<Action, ApiError> {
        self.post_json("/actions/", create).await
    }

    async fn delete_action(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/actions/{id}")).await
    }
}
