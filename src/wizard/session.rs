//! Wizard session state and its persistence.
//!
//! Everything the wizard accumulates lives in [`WizardState`]: the ids
//! created in step 1, the entities added in steps 2..=7, and the three
//! link fields. [`WizardStore`] wraps the state with write-through
//! persistence: every mutation is saved as one snapshot under a
//! per-user key, so a crash at any point resumes from the last applied
//! change.
//!
//! The store only mutates after the server has accepted the matching
//! request. Callers perform the API call first and record the result
//! here on success.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Action, Company, Contact, Document, Product, ScheduledEvent};
use crate::wizard::storage::WizardStorage;

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 8;

/// Accumulated wizard data, snapshotted to storage on every change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardState {
    /// Set together with `opportunity_id` when step 1 succeeds; never one
    /// without the other.
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub opportunity_id: Option<i64>,
    /// Company currently linked to the opportunity. Always one of
    /// `created_companies` or `None`.
    #[serde(default)]
    pub linked_company_id: Option<i64>,
    /// Document marked as the resume. Never equal to
    /// `cover_letter_document_id`.
    #[serde(default)]
    pub resume_document_id: Option<i64>,
    #[serde(default)]
    pub cover_letter_document_id: Option<i64>,
    #[serde(default)]
    pub created_companies: Vec<Company>,
    #[serde(default)]
    pub created_contacts: Vec<Contact>,
    #[serde(default)]
    pub created_documents: Vec<Document>,
    #[serde(default)]
    pub created_products: Vec<Product>,
    #[serde(default)]
    pub created_events: Vec<ScheduledEvent>,
    #[serde(default)]
    pub created_actions: Vec<Action>,
    /// Step the user was last on, for resuming.
    #[serde(default = "first_step")]
    pub last_step: u8,
}

fn first_step() -> u8 {
    FIRST_STEP
}

impl WizardState {
    /// True once step 1 has created the application and opportunity.
    pub fn initialized(&self) -> bool {
        self.application_id.is_some() && self.opportunity_id.is_some()
    }

    /// Whether the list step holds at least one entity. Steps 1 and 8
    /// have no list and report false.
    pub fn step_has_items(&self, step: u8) -> bool {
        match step {
            2 => !self.created_companies.is_empty(),
            3 => !self.created_contacts.is_empty(),
            4 => !self.created_documents.is_empty(),
            5 => !self.created_products.is_empty(),
            6 => !self.created_events.is_empty(),
            7 => !self.created_actions.is_empty(),
            _ => false,
        }
    }
}

/// The persisted snapshot: state plus when it was last touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardSession {
    #[serde(default)]
    pub state: WizardState,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

/// What the dashboard shows when offering to resume an unfinished wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSummary {
    pub application_id: i64,
    pub opportunity_id: i64,
    pub step: u8,
    pub last_updated: DateTime<Utc>,
}

pub fn session_key(user_id: i64) -> String {
    format!("candidash_wizard_{user_id}")
}

/// Reads and parses the stored session. A snapshot that no longer parses
/// is removed so it cannot wedge the wizard on every launch.
fn read_session(storage: &mut dyn WizardStorage, key: &str) -> Option<WizardSession> {
    let raw = storage.read(key)?;
    match serde_json::from_str::<WizardSession>(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Discarding unreadable wizard session {}: {}", key, e);
            if let Err(e) = storage.remove(key) {
                tracing::warn!("Failed to remove wizard session {}: {}", key, e);
            }
            None
        }
    }
}

/// Checks for a resumable draft without constructing a store. Sessions
/// that never got past step 1 are not worth offering.
pub fn peek_draft(storage: &mut dyn WizardStorage, user_id: i64) -> Option<DraftSummary> {
    let session = read_session(storage, &session_key(user_id))?;
    let application_id = session.state.application_id?;
    let opportunity_id = session.state.opportunity_id?;
    Some(DraftSummary {
        application_id,
        opportunity_id,
        step: session.state.last_step,
        last_updated: session.last_updated,
    })
}

/// Session state with write-through persistence.
///
/// Mutations never fail: a storage write error is logged and the
/// in-memory state stays authoritative for the rest of the run.
pub struct WizardStore {
    key: String,
    state: WizardState,
    last_updated: DateTime<Utc>,
    storage: Box<dyn WizardStorage>,
}

impl WizardStore {
    /// Opens the stored session for `user_id`, falling back to a fresh
    /// state when nothing (readable) is stored.
    pub fn open(user_id: i64, mut storage: Box<dyn WizardStorage>) -> Self {
        let key = session_key(user_id);
        let (state, last_updated) = match read_session(storage.as_mut(), &key) {
            Some(session) => (session.state, session.last_updated),
            None => (WizardState::default(), Utc::now()),
        };
        Self {
            key,
            state,
            last_updated,
            storage,
        }
    }

    /// Starts over, dropping any stored session for `user_id`.
    pub fn fresh(user_id: i64, storage: Box<dyn WizardStorage>) -> Self {
        let mut store = Self {
            key: session_key(user_id),
            state: WizardState::default(),
            last_updated: Utc::now(),
            storage,
        };
        if let Err(e) = store.storage.remove(&store.key) {
            tracing::warn!("Failed to remove wizard session {}: {}", store.key, e);
        }
        store
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Records the ids created by step 1. Both are set in one step so the
    /// state never holds one without the other.
    pub fn set_init_ids(&mut self, application_id: i64, opportunity_id: i64) {
        self.state.application_id = Some(application_id);
        self.state.opportunity_id = Some(opportunity_id);
        self.persist();
    }

    pub fn set_last_step(&mut self, step: u8) {
        if self.state.last_step != step {
            self.state.last_step = step;
            self.persist();
        }
    }

    pub fn add_company(&mut self, company: Company) {
        let id = company.id;
        upsert(&mut self.state.created_companies, company, |c| c.id == id);
        self.persist();
    }

    /// Drops the company from the session. If it was the linked company,
    /// the link is cleared too.
    pub fn remove_company(&mut self, id: i64) {
        self.state.created_companies.retain(|c| c.id != id);
        if self.state.linked_company_id == Some(id) {
            self.state.linked_company_id = None;
        }
        self.persist();
    }

    pub fn add_contact(&mut self, contact: Contact) {
        let id = contact.id;
        upsert(&mut self.state.created_contacts, contact, |c| c.id == id);
        self.persist();
    }

    pub fn remove_contact(&mut self, id: i64) {
        self.state.created_contacts.retain(|c| c.id != id);
        self.persist();
    }

    pub fn add_document(&mut self, document: Document) {
        let id = document.id;
        upsert(&mut self.state.created_documents, document, |d| d.id == id);
        self.persist();
    }

    /// Drops the document and clears whichever role fields pointed at it.
    pub fn remove_document(&mut self, id: i64) {
        self.state.created_documents.retain(|d| d.id != id);
        if self.state.resume_document_id == Some(id) {
            self.state.resume_document_id = None;
        }
        if self.state.cover_letter_document_id == Some(id) {
            self.state.cover_letter_document_id = None;
        }
        self.persist();
    }

    pub fn add_product(&mut self, product: Product) {
        let id = product.id;
        upsert(&mut self.state.created_products, product, |p| p.id == id);
        self.persist();
    }

    pub fn remove_product(&mut self, id: i64) {
        self.state.created_products.retain(|p| p.id != id);
        self.persist();
    }

    pub fn add_event(&mut self, event: ScheduledEvent) {
        let id = event.id;
        upsert(&mut self.state.created_events, event, |e| e.id == id);
        self.persist();
    }

    pub fn remove_event(&mut self, id: i64) {
        self.state.created_events.retain(|e| e.id != id);
        self.persist();
    }

    pub fn add_action(&mut self, action: Action) {
        let id = action.id;
        upsert(&mut self.state.created_actions, action, |a| a.id == id);
        self.persist();
    }

    pub fn remove_action(&mut self, id: i64) {
        self.state.created_actions.retain(|a| a.id != id);
        self.persist();
    }

    pub fn set_linked_company_id(&mut self, company_id: Option<i64>) {
        self.state.linked_company_id = company_id;
        self.persist();
    }

    /// Marks a document as the resume. A document cannot hold both roles,
    /// so a cover letter pointing at the same document is unset.
    pub fn set_resume_document_id(&mut self, document_id: Option<i64>) {
        if document_id.is_some() && self.state.cover_letter_document_id == document_id {
            self.state.cover_letter_document_id = None;
        }
        self.state.resume_document_id = document_id;
        self.persist();
    }

    /// Marks a document as the cover letter; the mirror of
    /// [`set_resume_document_id`](Self::set_resume_document_id).
    pub fn set_cover_letter_document_id(&mut self, document_id: Option<i64>) {
        if document_id.is_some() && self.state.resume_document_id == document_id {
            self.state.resume_document_id = None;
        }
        self.state.cover_letter_document_id = document_id;
        self.persist();
    }

    /// Adopts the link fields the server reports after a resume re-fetch.
    /// Ids that are not in the session lists are treated as unlinked so
    /// the restored state stays self-consistent.
    pub fn adopt_server_links(
        &mut self,
        company_id: Option<i64>,
        resume_used_id: Option<i64>,
        cover_letter_id: Option<i64>,
    ) {
        let known_company = |id: &i64| self.state.created_companies.iter().any(|c| c.id == *id);
        let known_document = |id: &i64| self.state.created_documents.iter().any(|d| d.id == *id);

        self.state.linked_company_id = company_id.filter(known_company);
        self.state.cover_letter_document_id = cover_letter_id.filter(known_document);
        self.state.resume_document_id = resume_used_id.filter(known_document);
        if self.state.resume_document_id.is_some()
            && self.state.resume_document_id == self.state.cover_letter_document_id
        {
            self.state.cover_letter_document_id = None;
        }
        self.persist();
    }

    /// Resets the session and removes the stored snapshot. Called on
    /// finish and on confirmed cancel.
    pub fn clear(&mut self) {
        self.state = WizardState::default();
        self.last_updated = Utc::now();
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!("Failed to remove wizard session {}: {}", self.key, e);
        }
    }

    fn persist(&mut self) {
        self.last_updated = Utc::now();
        let session = WizardSession {
            state: self.state.clone(),
            last_updated: self.last_updated,
        };
        let serialized = match serde_json::to_string_pretty(&session) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to serialize wizard session: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.write(&self.key, &serialized) {
            tracing::warn!("Failed to persist wizard session {}: {}", self.key, e);
        }
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, same_id: impl Fn(&T) -> bool) {
    if let Some(existing) = items.iter_mut().find(|e| same_id(e)) {
        *existing = item;
    } else {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::storage::{FileStorage, MemoryStorage};
    use serde_json::json;

    fn company(id: i64, name: &str) -> Company {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()
    }

    fn document(id: i64, name: &str) -> Document {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "type": "resume",
            "format": "pdf",
            "path": format!("/documents/{id}.pdf"),
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()
    }

    fn contact(id: i64) -> Contact {
        serde_json::from_value(json!({
            "id": id,
            "first_name": "Jane",
            "last_name": "Doe",
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()
    }

    fn store() -> WizardStore {
        WizardStore::open(1, Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_init_ids_set_together() {
        let mut store = store();
        assert!(!store.state().initialized());

        store.set_init_ids(10, 20);
        assert!(store.state().initialized());
        assert_eq!(store.state().application_id, Some(10));
        assert_eq!(store.state().opportunity_id, Some(20));
    }

    #[test]
    fn test_add_company_is_id_unique() {
        let mut store = store();
        store.add_company(company(1, "Acme"));
        store.add_company(company(2, "Globex"));
        store.add_company(company(1, "Acme renamed"));

        assert_eq!(store.state().created_companies.len(), 2);
        assert_eq!(store.state().created_companies[0].name, "Acme renamed");
    }

    #[test]
    fn test_remove_company_clears_link() {
        let mut store = store();
        store.add_company(company(1, "Acme"));
        store.set_linked_company_id(Some(1));

        store.remove_company(1);
        assert!(store.state().created_companies.is_empty());
        assert_eq!(store.state().linked_company_id, None);
    }

    #[test]
    fn test_remove_unlinked_company_keeps_link() {
        let mut store = store();
        store.add_company(company(1, "Acme"));
        store.add_company(company(2, "Globex"));
        store.set_linked_company_id(Some(1));

        store.remove_company(2);
        assert_eq!(store.state().linked_company_id, Some(1));
    }

    #[test]
    fn test_document_roles_are_mutually_exclusive() {
        let mut store = store();
        store.add_document(document(7, "CV"));
        store.set_resume_document_id(Some(7));
        assert_eq!(store.state().resume_document_id, Some(7));

        store.set_cover_letter_document_id(Some(7));
        assert_eq!(store.state().cover_letter_document_id, Some(7));
        assert_eq!(store.state().resume_document_id, None);

        store.set_resume_document_id(Some(7));
        assert_eq!(store.state().resume_document_id, Some(7));
        assert_eq!(store.state().cover_letter_document_id, None);
    }

    #[test]
    fn test_clearing_one_role_keeps_the_other() {
        let mut store = store();
        store.add_document(document(7, "CV"));
        store.add_document(document(8, "Letter"));
        store.set_resume_document_id(Some(7));
        store.set_cover_letter_document_id(Some(8));

        store.set_resume_document_id(None);
        assert_eq!(store.state().resume_document_id, None);
        assert_eq!(store.state().cover_letter_document_id, Some(8));
    }

    #[test]
    fn test_remove_document_clears_its_roles() {
        let mut store = store();
        store.add_document(document(7, "CV"));
        store.add_document(document(8, "Letter"));
        store.set_resume_document_id(Some(7));
        store.set_cover_letter_document_id(Some(8));

        store.remove_document(7);
        assert_eq!(store.state().resume_document_id, None);
        assert_eq!(store.state().cover_letter_document_id, Some(8));
        assert_eq!(store.state().created_documents.len(), 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let storage = FileStorage::new(dir.path().to_path_buf());
            let mut store = WizardStore::open(1, Box::new(storage));
            store.set_init_ids(5, 9);
            store.add_contact(contact(3));
            store.set_last_step(3);
        }

        let storage = FileStorage::new(dir.path().to_path_buf());
        let store = WizardStore::open(1, Box::new(storage));
        assert_eq!(store.state().application_id, Some(5));
        assert_eq!(store.state().opportunity_id, Some(9));
        assert_eq!(store.state().created_contacts.len(), 1);
        assert_eq!(store.state().last_step, 3);
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let storage = MemoryStorage::new().with_entry(&session_key(1), "not json {");
        let mut storage = Box::new(storage);

        assert!(peek_draft(storage.as_mut(), 1).is_none());
        assert!(!storage.contains(&session_key(1)));

        let store = WizardStore::open(1, storage);
        assert!(!store.state().initialized());
        assert_eq!(store.state().last_step, FIRST_STEP);
    }

    #[test]
    fn test_peek_draft_requires_init() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf());
        assert!(peek_draft(&mut storage, 1).is_none());

        {
            let mut store =
                WizardStore::open(1, Box::new(FileStorage::new(dir.path().to_path_buf())));
            store.set_last_step(2);
        }
        // persisted, but no ids yet: not worth offering
        assert!(peek_draft(&mut storage, 1).is_none());

        {
            let mut store =
                WizardStore::open(1, Box::new(FileStorage::new(dir.path().to_path_buf())));
            store.set_init_ids(10, 20);
            store.set_last_step(4);
        }
        let draft = peek_draft(&mut storage, 1).unwrap();
        assert_eq!(draft.application_id, 10);
        assert_eq!(draft.opportunity_id, 20);
        assert_eq!(draft.step, 4);
    }

    #[test]
    fn test_fresh_drops_stored_session() {
        let seeded = MemoryStorage::new().with_entry(
            &session_key(1),
            &serde_json::to_string(&WizardSession {
                state: WizardState {
                    application_id: Some(10),
                    opportunity_id: Some(20),
                    last_step: 4,
                    ..WizardState::default()
                },
                last_updated: Utc::now(),
            })
            .unwrap(),
        );

        let store = WizardStore::fresh(1, Box::new(seeded));
        assert!(!store.state().initialized());
        assert_eq!(store.state().last_step, FIRST_STEP);
    }

    #[test]
    fn test_adopt_server_links_filters_unknown_ids() {
        let mut store = store();
        store.add_company(company(1, "Acme"));
        store.add_document(document(7, "CV"));

        store.adopt_server_links(Some(99), Some(7), Some(42));
        assert_eq!(store.state().linked_company_id, None);
        assert_eq!(store.state().resume_document_id, Some(7));
        assert_eq!(store.state().cover_letter_document_id, None);
    }

    #[test]
    fn test_clear_resets_and_removes() {
        let mut store = store();
        store.set_init_ids(10, 20);
        store.add_company(company(1, "Acme"));

        store.clear();
        assert!(!store.state().initialized());
        assert!(store.state().created_companies.is_empty());
    }

    #[test]
    fn test_session_parses_with_missing_fields() {
        // older snapshots may predate newer fields; defaults fill the gaps
        let session: WizardSession =
            serde_json::from_str(r#"{"state": {"application_id": 5, "opportunity_id": 6}}"#)
                .unwrap();
        assert_eq!(session.state.application_id, Some(5));
        assert_eq!(session.state.last_step, FIRST_STEP);
        assert!(session.state.created_companies.is_empty());
    }
}
