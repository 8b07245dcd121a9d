//! Field definitions and payload builders for each wizard form.
//!
//! One function pair per entity: `*_fields` declares the form,
//! `*_create` turns a validated form into the request body. Builders
//! assume [`EntityForm::validate`] passed; anything unparseable at that
//! point falls back to the field's default rather than panicking.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::{
    ActionCreate, ApplicationSeed, ApplicationType, CommunicationMethod, CompanyCreate,
    ContactCreate, ContractType, DocumentCreate, EventStatus, OpportunityCreate, ProductCreate,
    RemotePolicy, ScheduledEventCreate, WizardInitRequest,
};
use crate::ui::form::{EntityForm, FieldSpec};
use crate::wizard::session::WizardState;

fn wire_value<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => s,
        _ => String::new(),
    }
}

fn parse_enum<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(Value::String(raw.to_string())).ok()
}

fn enum_options<T: Copy + Serialize>(
    values: &[T],
    label: impl Fn(&T) -> &'static str,
) -> Vec<(String, String)> {
    values
        .iter()
        .map(|v| (wire_value(v), label(v).to_string()))
        .collect()
}

fn optional(mut options: Vec<(String, String)>) -> Vec<(String, String)> {
    options.insert(0, (String::new(), "(none)".to_string()));
    options
}

fn id_options(entries: impl Iterator<Item = (i64, String)>) -> Vec<(String, String)> {
    entries.map(|(id, label)| (id.to_string(), label)).collect()
}

// ---------------------------------------------------------------------------
// Step 1: opportunity + application

pub fn init_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("job_title", "Job title")
            .required()
            .min_len(2)
            .max_len(255)
            .placeholder("Backend Engineer"),
        FieldSpec::select(
            "application_type",
            "How did this come about?",
            enum_options(ApplicationType::all(), ApplicationType::label),
        )
        .required(),
        FieldSpec::date("application_date", "Application date")
            .required()
            .default_value(Utc::now().date_naive().to_string()),
        FieldSpec::select(
            "contract_type",
            "Contract",
            optional(enum_options(ContractType::all(), ContractType::label)),
        ),
        FieldSpec::text("location", "Location").placeholder("Lyon, Paris, ..."),
        FieldSpec::select(
            "remote_policy",
            "Remote policy",
            optional(enum_options(RemotePolicy::all(), RemotePolicy::label)),
        ),
        FieldSpec::text("job_posting_url", "Job posting URL")
            .url()
            .placeholder("https://..."),
        FieldSpec::number("salary_min", "Salary min"),
        FieldSpec::number("salary_max", "Salary max"),
        FieldSpec::multiline("job_description", "Job description"),
    ]
}

/// Validation for step 1: the per-field rules plus the salary range check.
pub fn validate_init(form: &mut EntityForm) -> bool {
    let mut ok = form.validate();
    if let (Some(min), Some(max)) = (form.f64_value("salary_min"), form.f64_value("salary_max")) {
        if max < min {
            form.set_error("salary_max", "Must be at least the salary minimum");
            ok = false;
        }
    }
    ok
}

pub fn init_request(form: &EntityForm) -> WizardInitRequest {
    let opportunity = OpportunityCreate {
        job_title: form.value("job_title").trim().to_string(),
        application_type: parse_enum(&form.value("application_type")).unwrap_or_default(),
        contract_type: form
            .opt_value("contract_type")
            .and_then(|v| parse_enum(&v)),
        location: form.opt_value("location"),
        job_posting_url: form.opt_value("job_posting_url"),
        job_description: form.opt_value("job_description"),
        salary_min: form.f64_value("salary_min"),
        salary_max: form.f64_value("salary_max"),
        remote_policy: form
            .opt_value("remote_policy")
            .and_then(|v| parse_enum(&v)),
        ..OpportunityCreate::default()
    };
    let application = ApplicationSeed {
        application_date: form
            .date_value("application_date")
            .unwrap_or_else(|| Utc::now().date_naive()),
        ..ApplicationSeed::default()
    };
    WizardInitRequest {
        opportunity,
        application,
    }
}

// ---------------------------------------------------------------------------
// Step 2: companies

pub fn company_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("name", "Name").required().max_len(255),
        FieldSpec::text("industry", "Industry").placeholder("Fintech, health, ..."),
        FieldSpec::select(
            "size",
            "Size",
            optional(
                ["1-10", "11-50", "51-200", "201-500", "501-1000", "1000+"]
                    .iter()
                    .map(|s| ((*s).to_string(), format!("{s} employees")))
                    .collect(),
            ),
        ),
        FieldSpec::text("website", "Website").url().placeholder("https://..."),
        FieldSpec::text("linkedin", "LinkedIn").url(),
        FieldSpec::text("address", "Address"),
        FieldSpec::toggle("is_intermediary", "Staffing agency / ESN"),
        FieldSpec::multiline("notes", "Notes"),
    ]
}

pub fn company_create(form: &EntityForm) -> CompanyCreate {
    CompanyCreate {
        name: form.value("name").trim().to_string(),
        industry: form.opt_value("industry"),
        size: form.opt_value("size"),
        website: form.opt_value("website"),
        linkedin: form.opt_value("linkedin"),
        address: form.opt_value("address"),
        is_intermediary: form.bool_value("is_intermediary"),
        notes: form.opt_value("notes"),
    }
}

// ---------------------------------------------------------------------------
// Step 3: contacts

pub fn contact_fields(state: &WizardState) -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("first_name", "First name").required().max_len(255),
        FieldSpec::text("last_name", "Last name").required().max_len(255),
        FieldSpec::text("position", "Position").placeholder("Recruiter, CTO, ..."),
        FieldSpec::text("email", "Email").email(),
        FieldSpec::text("phone", "Phone"),
        FieldSpec::text("linkedin", "LinkedIn").url(),
        FieldSpec::select(
            "company_id",
            "Company",
            optional(id_options(
                state
                    .created_companies
                    .iter()
                    .map(|c| (c.id, c.name.clone())),
            )),
        ),
        FieldSpec::toggle("is_independent_recruiter", "Independent recruiter"),
        FieldSpec::multiline("notes", "Notes"),
    ]
}

pub fn contact_create(form: &EntityForm) -> ContactCreate {
    ContactCreate {
        first_name: form.value("first_name").trim().to_string(),
        last_name: form.value("last_name").trim().to_string(),
        position: form.opt_value("position"),
        email: form.opt_value("email"),
        phone: form.opt_value("phone"),
        linkedin: form.opt_value("linkedin"),
        relationship_notes: None,
        is_independent_recruiter: form.bool_value("is_independent_recruiter"),
        notes: form.opt_value("notes"),
        company_id: form.opt_value("company_id").and_then(|v| v.parse().ok()),
    }
}

// ---------------------------------------------------------------------------
// Step 4: documents

pub fn document_fields() -> Vec<FieldSpec> {
    let type_options = [
        ("resume", "Resume"),
        ("cover_letter", "Cover letter"),
        ("portfolio", "Portfolio"),
        ("certificate", "Certificate"),
        ("job_posting", "Job posting"),
        ("other", "Other"),
    ];
    let format_options = ["pdf", "docx", "md", "txt", "html", "other"];

    vec![
        FieldSpec::text("name", "Name")
            .required()
            .max_len(255)
            .placeholder("CV 2024"),
        FieldSpec::select(
            "type",
            "Type",
            type_options
                .iter()
                .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
                .collect(),
        )
        .required(),
        FieldSpec::select(
            "format",
            "Format",
            format_options
                .iter()
                .map(|f| ((*f).to_string(), (*f).to_string()))
                .collect(),
        )
        .required(),
        FieldSpec::text("path", "Path or URL")
            .required()
            .placeholder("/documents/cv-2024.pdf"),
        FieldSpec::multiline("description", "Description"),
    ]
}

pub fn document_create(form: &EntityForm) -> DocumentCreate {
    DocumentCreate {
        name: form.value("name").trim().to_string(),
        doc_type: form.value("type"),
        format: form.value("format"),
        path: form.value("path").trim().to_string(),
        description: form.opt_value("description"),
    }
}

// ---------------------------------------------------------------------------
// Step 5: products

/// Products require an owning company; callers must not open this form
/// while the session has none.
pub fn product_fields(state: &WizardState) -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("name", "Name").required().max_len(255),
        FieldSpec::select(
            "company_id",
            "Company",
            id_options(
                state
                    .created_companies
                    .iter()
                    .map(|c| (c.id, c.name.clone())),
            ),
        )
        .required(),
        FieldSpec::multiline("description", "Description"),
        FieldSpec::text("website", "Website").url(),
        FieldSpec::text("technologies_used", "Technologies").placeholder("Rust, Postgres, ..."),
    ]
}

pub fn product_create(form: &EntityForm) -> ProductCreate {
    ProductCreate {
        name: form.value("name").trim().to_string(),
        description: form.opt_value("description"),
        company_id: form.value("company_id").parse().unwrap_or_default(),
        website: form.opt_value("website"),
        technologies_used: form.opt_value("technologies_used"),
    }
}

// ---------------------------------------------------------------------------
// Step 6: events

pub fn event_fields() -> Vec<FieldSpec> {
    let type_options = [
        ("interview", "Interview"),
        ("phone_screen", "Phone screen"),
        ("technical_test", "Technical test"),
        ("meeting", "Meeting"),
        ("other", "Other"),
    ];

    vec![
        FieldSpec::text("title", "Title")
            .required()
            .max_len(255)
            .placeholder("Tech interview with the team"),
        FieldSpec::select(
            "event_type",
            "Type",
            optional(
                type_options
                    .iter()
                    .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
                    .collect(),
            ),
        ),
        FieldSpec::datetime("scheduled_date", "Scheduled (UTC)").required(),
        FieldSpec::number("duration_minutes", "Duration (minutes)"),
        FieldSpec::select(
            "communication_method",
            "Via",
            optional(enum_options(
                CommunicationMethod::all(),
                CommunicationMethod::label,
            )),
        ),
        FieldSpec::text("event_link", "Meeting link").url(),
        FieldSpec::text("phone_number", "Phone number"),
        FieldSpec::text("location", "Location"),
        FieldSpec::select(
            "status",
            "Status",
            enum_options(EventStatus::all(), EventStatus::label),
        )
        .required(),
        FieldSpec::multiline("notes", "Notes"),
    ]
}

pub fn event_create(form: &EntityForm) -> ScheduledEventCreate {
    ScheduledEventCreate {
        title: form.value("title").trim().to_string(),
        event_type: form.opt_value("event_type"),
        scheduled_date: form
            .datetime_value("scheduled_date")
            .unwrap_or_else(Utc::now),
        duration_minutes: form.f64_value("duration_minutes").map(|v| v as i32),
        communication_method: form
            .opt_value("communication_method")
            .and_then(|v| parse_enum(&v)),
        event_link: form.opt_value("event_link"),
        phone_number: form.opt_value("phone_number"),
        location: form.opt_value("location"),
        instructions: None,
        status: parse_enum(&form.value("status")).unwrap_or_default(),
        notes: form.opt_value("notes"),
    }
}

// ---------------------------------------------------------------------------
// Step 7: actions

pub fn action_fields(state: &WizardState) -> Vec<FieldSpec> {
    let type_options = [
        ("follow_up", "Follow up"),
        ("note", "Note"),
        ("rejection", "Rejection"),
        ("offer", "Offer"),
        ("other", "Other"),
    ];

    vec![
        FieldSpec::select(
            "type",
            "Type",
            type_options
                .iter()
                .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
                .collect(),
        )
        .required(),
        FieldSpec::multiline("notes", "Notes"),
        FieldSpec::toggle("is_completed", "Already done"),
        FieldSpec::select(
            "scheduled_event_id",
            "Linked event",
            optional(id_options(
                state.created_events.iter().map(|e| (e.id, e.title.clone())),
            )),
        ),
    ]
}

pub fn action_create(form: &EntityForm, application_id: i64) -> ActionCreate {
    let is_completed = form.bool_value("is_completed");
    ActionCreate {
        action_type: form.value("type"),
        completed_date: is_completed.then(Utc::now),
        is_completed,
        notes: form.opt_value("notes"),
        parent_action_id: None,
        scheduled_event_id: form
            .opt_value("scheduled_event_id")
            .and_then(|v| v.parse().ok()),
        application_id,
    }
}
