//! Request bodies for create and update calls.
//!
//! Create payloads mirror the server's create schemas minus generated
//! fields. Update payloads are partial: `None` fields are omitted from the
//! JSON so the server leaves them untouched. The three nullable link fields
//! (`company_id`, `resume_used_id`, `cover_letter_id`) use a double
//! `Option` so that "omit" and "set to null" stay distinct on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::entities::{
    ApplicationStatus, ApplicationType, CommunicationMethod, ContractType, EventStatus,
    RemotePolicy,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct OpportunityCreate {
    pub job_title: String,
    pub application_type: ApplicationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_posting_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<RemotePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruitment_process: Option<String>,
}

/// The application half of the combined init call. The server assigns
/// `opportunity_id` from the opportunity created in the same transaction.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSeed {
    pub application_date: NaiveDate,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_expectation: Option<f64>,
    pub is_archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_used_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter_id: Option<i64>,
}

impl Default for ApplicationSeed {
    fn default() -> Self {
        Self {
            application_date: Utc::now().date_naive(),
            status: ApplicationStatus::Pending,
            salary_expectation: None,
            is_archived: false,
            resume_used_id: None,
            cover_letter_id: None,
        }
    }
}

/// Body of `POST /applications/with-opportunity`: both records created in
/// one server-side transaction.
#[derive(Debug, Clone, Serialize)]
pub struct WizardInitRequest {
    pub opportunity: OpportunityCreate,
    pub application: ApplicationSeed,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OpportunityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_type: Option<ApplicationType>,
    /// `Some(None)` unlinks the primary company; `None` leaves it alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_posting_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<RemotePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruitment_process: Option<String>,
}

impl OpportunityUpdate {
    /// Update that only touches the primary company link.
    pub fn company_link(company_id: Option<i64>) -> Self {
        Self {
            company_id: Some(company_id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_expectation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    /// `Some(None)` clears the resume role; `None` leaves it alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_used_id: Option<Option<i64>>,
    /// `Some(None)` clears the cover-letter role; `None` leaves it alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter_id: Option<Option<i64>>,
}

impl ApplicationUpdate {
    /// Update that only touches the resume link.
    pub fn resume_link(document_id: Option<i64>) -> Self {
        Self {
            resume_used_id: Some(document_id),
            ..Self::default()
        }
    }

    /// Update that only touches the cover-letter link.
    pub fn cover_letter_link(document_id: Option<i64>) -> Self {
        Self {
            cover_letter_id: Some(document_id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub is_intermediary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactCreate {
    pub last_name: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_notes: Option<String>,
    pub is_independent_recruiter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub format: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub company_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies_used: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledEventCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication_method: Option<CommunicationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for ScheduledEventCreate {
    fn default() -> Self {
        Self {
            title: String::new(),
            event_type: None,
            scheduled_date: Utc::now(),
            duration_minutes: None,
            communication_method: None,
            event_link: None,
            phone_number: None,
            location: None,
            instructions: None,
            status: EventStatus::Pending,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionCreate {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_action_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_event_id: Option<i64>,
    pub application_id: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OpportunityContactCreate {
    pub opportunity_id: i64,
    pub contact_id: i64,
    pub is_primary_contact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpportunityProductCreate {
    pub opportunity_id: i64,
    pub product_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_omits_untouched_fields() {
        let update = OpportunityUpdate::company_link(Some(42));
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["company_id"], 42);
        assert!(json.get("job_title").is_none());
        assert!(json.get("salary_min").is_none());
    }

    #[test]
    fn test_update_sends_explicit_null_to_unlink() {
        let update = OpportunityUpdate::company_link(None);
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"company_id":null}"#);

        let update = ApplicationUpdate::resume_link(None);
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"resume_used_id":null}"#);
    }

    #[test]
    fn test_link_updates_touch_one_role_only() {
        let update = ApplicationUpdate::cover_letter_link(Some(7));
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["cover_letter_id"], 7);
        assert!(json.get("resume_used_id").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_init_request_shape() {
        let request = WizardInitRequest {
            opportunity: OpportunityCreate {
                job_title: "Backend Engineer".to_string(),
                application_type: ApplicationType::JobPosting,
                ..OpportunityCreate::default()
            },
            application: ApplicationSeed {
                application_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                ..ApplicationSeed::default()
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["opportunity"]["job_title"], "Backend Engineer");
        assert_eq!(json["opportunity"]["application_type"], "job_posting");
        assert_eq!(json["application"]["application_date"], "2024-01-10");
        assert_eq!(json["application"]["status"], "pending");
        assert!(json["opportunity"].get("company_id").is_none());
    }

    #[test]
    fn test_document_create_renames_type() {
        let create = DocumentCreate {
            name: "CV 2024".to_string(),
            doc_type: "resume".to_string(),
            format: "pdf".to_string(),
            path: "https://example.com/cv.pdf".to_string(),
            description: None,
        };

        let json = serde_json::to_value(&create).unwrap();
        assert_eq!(json["type"], "resume");
        assert!(json.get("doc_type").is_none());
    }
}
