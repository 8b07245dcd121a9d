//! Integration tests against a live CandiDash API server
//!
//! These tests verify that:
//! - Login issues a usable bearer token
//! - The combined init call creates an opportunity and application pair
//! - Link updates (primary company, resume, cover letter) round-trip
//! - Association endpoints (opportunity contacts / products) attach and detach
//! - Deletes remove records and missing records report 404
//!
//! ## Environment Variables
//!
//! - `CANDIDASH_API_TEST_ENABLED=true` - Required to run these tests
//! - `CANDIDASH_API_TEST_URL` - Server base URL (default: http://localhost:8000)
//! - `CANDIDASH_API_TEST_EMAIL` - Account to log in with
//! - `CANDIDASH_API_TEST_PASSWORD` - Password for that account
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all API integration tests
//! CANDIDASH_API_TEST_ENABLED=true \
//! CANDIDASH_API_TEST_EMAIL=test@example.com \
//! CANDIDASH_API_TEST_PASSWORD=secret \
//! cargo test --test api_integration -- --nocapture --test-threads=1
//!
//! # Run a specific test
//! CANDIDASH_API_TEST_ENABLED=true \
//! CANDIDASH_API_TEST_EMAIL=test@example.com \
//! CANDIDASH_API_TEST_PASSWORD=secret \
//! cargo test --test api_integration test_wizard_init_creates_both_records -- --nocapture
//! ```
//!
//! ## Notes
//!
//! - Tests create real records and delete them before finishing
//! - Record names carry a millisecond suffix so reruns never collide
//! - Use a throwaway account; a failed test can leave records behind

use std::env;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use candidash::api::{ApiClient, Backend};
use candidash::types::{
    ApplicationSeed, ApplicationUpdate, CompanyCreate, ContactCreate, DocumentCreate,
    OpportunityContactCreate, OpportunityCreate, OpportunityProductCreate, OpportunityUpdate,
    ProductCreate, WizardInitRequest,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Check if API integration tests are enabled
fn api_tests_enabled() -> bool {
    env::var("CANDIDASH_API_TEST_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Macro to skip tests if not configured
macro_rules! skip_if_not_configured {
    () => {
        if !api_tests_enabled() {
            eprintln!("Skipping test: CANDIDASH_API_TEST_ENABLED not set to true");
            return;
        }
    };
}

fn base_url() -> String {
    env::var("CANDIDASH_API_TEST_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Millisecond suffix so repeated runs never reuse a record name
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_millis()
}

// ─── Test Context ─────────────────────────────────────────────────────────────

/// Authenticated client shared by one test run
struct ApiTestContext {
    client: ApiClient,
}

impl ApiTestContext {
    /// Log in with the configured account and return a ready client
    async fn login() -> Self {
        let email = env::var("CANDIDASH_API_TEST_EMAIL")
            .expect("CANDIDASH_API_TEST_EMAIL must be set when API tests are enabled");
        let password = env::var("CANDIDASH_API_TEST_PASSWORD")
            .expect("CANDIDASH_API_TEST_PASSWORD must be set when API tests are enabled");

        let client = ApiClient::new(base_url(), Duration::from_secs(10))
            .expect("Failed to build API client");
        let token = client
            .login(&email, &password)
            .await
            .expect("Login should succeed with the configured credentials");

        Self {
            client: client.with_token(token.access_token),
        }
    }

    /// Create an opportunity + application pair the way wizard step 1 does
    async fn init(&self, job_title: &str) -> (i64, i64) {
        let request = WizardInitRequest {
            opportunity: OpportunityCreate {
                job_title: job_title.to_string(),
                ..OpportunityCreate::default()
            },
            application: ApplicationSeed::default(),
        };
        let application = self
            .client
            .init_application(&request)
            .await
            .expect("Init call should create both records");
        (application.id, application.opportunity_id)
    }

    /// Remove an init pair; the application goes first so the opportunity
    /// has no dependent rows left
    async fn delete_pair(&self, application_id: i64, opportunity_id: i64) {
        self.client
            .delete_application(application_id)
            .await
            .expect("Cleanup: delete application");
        self.client
            .delete_opportunity(opportunity_id)
            .await
            .expect("Cleanup: delete opportunity");
    }
}

// ─── Test Cases ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_and_me() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;

    let user = ctx.client.me().await.expect("me() should succeed");
    assert!(user.id > 0, "User id should be positive");
    assert!(
        user.email.contains('@'),
        "User email should look like an address"
    );
    assert!(user.is_active, "Test account should be active");
}

#[tokio::test]
async fn test_listing_endpoints_respond() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;

    ctx.client
        .list_opportunities()
        .await
        .expect("Opportunities listing should succeed");
    ctx.client
        .list_applications()
        .await
        .expect("Applications listing should succeed");
    ctx.client
        .list_events()
        .await
        .expect("Events listing should succeed");
    ctx.client
        .list_actions()
        .await
        .expect("Actions listing should succeed");
}

#[tokio::test]
async fn test_wizard_init_creates_both_records() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;
    let title = format!("Backend Engineer {}", unique_suffix());

    let (application_id, opportunity_id) = ctx.init(&title).await;

    // Both halves must be fetchable and point at each other
    let application = ctx
        .client
        .get_application(application_id)
        .await
        .expect("Created application should be fetchable");
    assert_eq!(
        application.opportunity_id, opportunity_id,
        "Application should reference the opportunity created with it"
    );

    let opportunity = ctx
        .client
        .get_opportunity(opportunity_id)
        .await
        .expect("Created opportunity should be fetchable");
    assert_eq!(opportunity.job_title, title);
    assert!(
        opportunity.company_id.is_none(),
        "A fresh opportunity has no primary company"
    );

    ctx.delete_pair(application_id, opportunity_id).await;
}

#[tokio::test]
async fn test_primary_company_link_round_trip() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;
    let suffix = unique_suffix();
    let (application_id, opportunity_id) = ctx.init(&format!("SRE {suffix}")).await;

    let company = ctx
        .client
        .create_company(&CompanyCreate {
            name: format!("Acme Test {suffix}"),
            ..CompanyCreate::default()
        })
        .await
        .expect("Company creation should succeed");

    // Link
    let updated = ctx
        .client
        .update_opportunity(opportunity_id, &OpportunityUpdate::company_link(Some(company.id)))
        .await
        .expect("Linking the company should succeed");
    assert_eq!(
        updated.company_id,
        Some(company.id),
        "Opportunity should carry the linked company"
    );

    // Unlink with an explicit null
    let updated = ctx
        .client
        .update_opportunity(opportunity_id, &OpportunityUpdate::company_link(None))
        .await
        .expect("Unlinking should succeed");
    assert!(
        updated.company_id.is_none(),
        "Opportunity should have no company after unlink"
    );

    ctx.client
        .delete_company(company.id)
        .await
        .expect("Cleanup: delete company");
    ctx.delete_pair(application_id, opportunity_id).await;
}

#[tokio::test]
async fn test_document_role_links_round_trip() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;
    let suffix = unique_suffix();
    let (application_id, opportunity_id) = ctx.init(&format!("Data Engineer {suffix}")).await;

    let document = ctx
        .client
        .create_document(&DocumentCreate {
            name: format!("CV Test {suffix}"),
            doc_type: "resume".to_string(),
            format: "pdf".to_string(),
            path: format!("/documents/test-{suffix}.pdf"),
            description: None,
        })
        .await
        .expect("Document creation should succeed");

    let updated = ctx
        .client
        .update_application(application_id, &ApplicationUpdate::resume_link(Some(document.id)))
        .await
        .expect("Setting the resume should succeed");
    assert_eq!(updated.resume_used_id, Some(document.id));
    assert!(
        updated.cover_letter_id.is_none(),
        "Resume update should not touch the cover letter"
    );

    // Clear the role before deleting the document
    let updated = ctx
        .client
        .update_application(application_id, &ApplicationUpdate::resume_link(None))
        .await
        .expect("Clearing the resume should succeed");
    assert!(updated.resume_used_id.is_none());

    ctx.client
        .delete_document(document.id)
        .await
        .expect("Cleanup: delete document");
    ctx.delete_pair(application_id, opportunity_id).await;
}

#[tokio::test]
async fn test_opportunity_contact_attach_and_detach() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;
    let suffix = unique_suffix();

    let opportunity = ctx
        .client
        .create_opportunity(&OpportunityCreate {
            job_title: format!("Contact Test {suffix}"),
            ..OpportunityCreate::default()
        })
        .await
        .expect("Opportunity creation should succeed");

    let contact = ctx
        .client
        .create_contact(&ContactCreate {
            first_name: "Jane".to_string(),
            last_name: format!("Doe {suffix}"),
            ..ContactCreate::default()
        })
        .await
        .expect("Contact creation should succeed");

    let link = ctx
        .client
        .create_opportunity_contact(&OpportunityContactCreate {
            opportunity_id: opportunity.id,
            contact_id: contact.id,
            is_primary_contact: true,
            contact_role: Some("recruiter".to_string()),
            ..OpportunityContactCreate::default()
        })
        .await
        .expect("Attaching the contact should succeed");
    assert_eq!(link.opportunity_id, opportunity.id);
    assert_eq!(link.contact_id, contact.id);
    assert!(link.is_primary_contact);

    ctx.client
        .delete_opportunity_contact(link.id)
        .await
        .expect("Detaching the contact should succeed");

    ctx.client
        .delete_contact(contact.id)
        .await
        .expect("Cleanup: delete contact");
    ctx.client
        .delete_opportunity(opportunity.id)
        .await
        .expect("Cleanup: delete opportunity");
}

#[tokio::test]
async fn test_opportunity_product_attach_and_detach() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;
    let suffix = unique_suffix();

    let opportunity = ctx
        .client
        .create_opportunity(&OpportunityCreate {
            job_title: format!("Product Test {suffix}"),
            ..OpportunityCreate::default()
        })
        .await
        .expect("Opportunity creation should succeed");

    let company = ctx
        .client
        .create_company(&CompanyCreate {
            name: format!("Globex Test {suffix}"),
            ..CompanyCreate::default()
        })
        .await
        .expect("Company creation should succeed");

    let product = ctx
        .client
        .create_product(&ProductCreate {
            name: format!("Billing API {suffix}"),
            company_id: company.id,
            ..ProductCreate::default()
        })
        .await
        .expect("Product creation should succeed");

    let link = ctx
        .client
        .create_opportunity_product(&OpportunityProductCreate {
            opportunity_id: opportunity.id,
            product_id: product.id,
        })
        .await
        .expect("Attaching the product should succeed");
    assert_eq!(link.product_id, product.id);

    ctx.client
        .delete_opportunity_product(link.id)
        .await
        .expect("Detaching the product should succeed");

    ctx.client
        .delete_product(product.id)
        .await
        .expect("Cleanup: delete product");
    ctx.client
        .delete_company(company.id)
        .await
        .expect("Cleanup: delete company");
    ctx.client
        .delete_opportunity(opportunity.id)
        .await
        .expect("Cleanup: delete opportunity");
}

#[tokio::test]
async fn test_deleted_records_report_not_found() {
    skip_if_not_configured!();

    let ctx = ApiTestContext::login().await;
    let suffix = unique_suffix();
    let (application_id, opportunity_id) = ctx.init(&format!("Gone Soon {suffix}")).await;

    ctx.delete_pair(application_id, opportunity_id).await;

    let err = ctx
        .client
        .get_application(application_id)
        .await
        .expect_err("Deleted application should not be fetchable");
    assert!(
        err.is_not_found(),
        "Expected a 404 for the deleted application, got: {err}"
    );

    let err = ctx
        .client
        .get_opportunity(opportunity_id)
        .await
        .expect_err("Deleted opportunity should not be fetchable");
    assert!(err.is_not_found(), "Expected a 404, got: {err}");
}
