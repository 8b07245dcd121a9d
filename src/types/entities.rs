//! Wire records for the CandiDash REST API.
//!
//! Field sets mirror the server's read schemas: integer ids, RFC 3339
//! timestamps (timezone-aware server side), snake_case enum values.
//! `updated_at` is nullable server side until the first update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A job posting or lead being pursued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: i64,
    pub job_title: String,
    pub application_type: ApplicationType,
    /// Primary company link; at most one at a time.
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub position_type: Option<String>,
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_posting_url: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub required_skills: Option<String>,
    #[serde(default)]
    pub technologies: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub salary_info: Option<String>,
    #[serde(default)]
    pub remote_policy: Option<RemotePolicy>,
    #[serde(default)]
    pub remote_details: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub recruitment_process: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The act of applying to an [`Opportunity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub application_date: NaiveDate,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub salary_expectation: Option<f64>,
    #[serde(default)]
    pub is_archived: bool,
    /// Document currently marked as the resume for this application.
    #[serde(default)]
    pub resume_used_id: Option<i64>,
    /// Document currently marked as the cover letter for this application.
    #[serde(default)]
    pub cover_letter_id: Option<i64>,
    pub opportunity_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// ESN / staffing agency rather than the hiring company itself.
    #[serde(default)]
    pub is_intermediary: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub relationship_notes: Option<String>,
    #[serde(default)]
    pub is_independent_recruiter: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// "First Last" display form used in lists and confirmation dialogs.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A stored file reference (resume, cover letter, portfolio, ...).
///
/// `doc_type` and `format` are free strings server side; the form offers
/// the conventional values (resume, cover_letter, portfolio, certificate,
/// job_posting, other).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub format: String,
    /// Storage path or external URL.
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product, service, or project tied to a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub company_id: i64,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub technologies_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An interview, call, or other appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub event_type: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub communication_method: Option<CommunicationMethod>,
    #[serde(default)]
    pub event_link: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A follow-up task attached to an application.
///
/// `action_type` is a free string server side (follow_up, note, rejection,
/// offer, other by convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub parent_action_id: Option<i64>,
    #[serde(default)]
    pub scheduled_event_id: Option<i64>,
    pub application_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Contact attached to an opportunity with a role in that recruitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityContact {
    pub id: i64,
    pub opportunity_id: i64,
    pub contact_id: i64,
    #[serde(default)]
    pub is_primary_contact: bool,
    #[serde(default)]
    pub contact_role: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Product attached to an opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityProduct {
    pub id: i64,
    pub opportunity_id: i64,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
}

/// The authenticated account; its id scopes the persisted wizard session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl User {
    /// "First Last" when at least one name part is set.
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (None, None) => None,
            (first, last) => Some(
                [first.as_deref(), last.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

/// How the opportunity came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    #[default]
    JobPosting,
    Spontaneous,
    ReachedOut,
}

impl ApplicationType {
    pub fn all() -> &'static [ApplicationType] {
        &[
            ApplicationType::JobPosting,
            ApplicationType::Spontaneous,
            ApplicationType::ReachedOut,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationType::JobPosting => "Job posting",
            ApplicationType::Spontaneous => "Spontaneous",
            ApplicationType::ReachedOut => "They reached out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    Permanent,
    FixedTerm,
    Freelance,
    Contractor,
    Internship,
    Apprenticeship,
}

impl ContractType {
    pub fn all() -> &'static [ContractType] {
        &[
            ContractType::Permanent,
            ContractType::FixedTerm,
            ContractType::Freelance,
            ContractType::Contractor,
            ContractType::Internship,
            ContractType::Apprenticeship,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContractType::Permanent => "Permanent",
            ContractType::FixedTerm => "Fixed term",
            ContractType::Freelance => "Freelance",
            ContractType::Contractor => "Contractor",
            ContractType::Internship => "Internship",
            ContractType::Apprenticeship => "Apprenticeship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemotePolicy {
    OnSite,
    FullRemote,
    Hybrid,
    Flexible,
}

impl RemotePolicy {
    pub fn all() -> &'static [RemotePolicy] {
        &[
            RemotePolicy::OnSite,
            RemotePolicy::FullRemote,
            RemotePolicy::Hybrid,
            RemotePolicy::Flexible,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RemotePolicy::OnSite => "On site",
            RemotePolicy::FullRemote => "Full remote",
            RemotePolicy::Hybrid => "Hybrid",
            RemotePolicy::Flexible => "Flexible",
        }
    }
}

/// Application lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    FollowUpScheduled,
    InterviewScheduled,
    Rejected,
    Accepted,
    Obsolete,
}

impl ApplicationStatus {
    pub fn all() -> &'static [ApplicationStatus] {
        &[
            ApplicationStatus::Pending,
            ApplicationStatus::FollowUpScheduled,
            ApplicationStatus::InterviewScheduled,
            ApplicationStatus::Rejected,
            ApplicationStatus::Accepted,
            ApplicationStatus::Obsolete,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::FollowUpScheduled => "Follow-up scheduled",
            ApplicationStatus::InterviewScheduled => "Interview scheduled",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Obsolete => "Obsolete",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Pending,
    Confirmed,
    Rescheduled,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn all() -> &'static [EventStatus] {
        &[
            EventStatus::Pending,
            EventStatus::Confirmed,
            EventStatus::Rescheduled,
            EventStatus::Cancelled,
            EventStatus::Completed,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Confirmed => "Confirmed",
            EventStatus::Rescheduled => "Rescheduled",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationMethod {
    Video,
    Phone,
    InPerson,
    Email,
    Other,
}

impl CommunicationMethod {
    pub fn all() -> &'static [CommunicationMethod] {
        &[
            CommunicationMethod::Video,
            CommunicationMethod::Phone,
            CommunicationMethod::InPerson,
            CommunicationMethod::Email,
            CommunicationMethod::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommunicationMethod::Video => "Video call",
            CommunicationMethod::Phone => "Phone",
            CommunicationMethod::InPerson => "In person",
            CommunicationMethod::Email => "Email",
            CommunicationMethod::Other => "Other",
        }
    }
}
