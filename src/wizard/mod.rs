//! The application wizard: an eight-step guided flow that creates an
//! application and its related records, with a locally persisted draft
//! so an interrupted run picks up where it left off.

pub mod forms;
pub mod nav;
pub mod screen;
pub mod session;
pub mod step_list;
pub mod steps;
pub mod storage;

pub use nav::WizardNav;
pub use screen::{CreatedEntity, EntityPayload, WizardEvent, WizardScreen};
pub use session::{peek_draft, DraftSummary, WizardState, WizardStore};
pub use steps::EntityKind;
