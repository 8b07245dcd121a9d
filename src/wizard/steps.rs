//! Static step definitions and the entity-kind table.
//!
//! Steps 2..=7 all run the same list-and-create flow, differing only in
//! which entity kind they manage. [`EntityKind`] is the closed set of
//! those kinds; everything kind-specific the engine needs (labels, step
//! assignment, list access) hangs off it, so the engine itself stays
//! generic.

use crate::types::{Action, Company, Contact, Document, Product, ScheduledEvent};
use crate::wizard::session::WizardState;

#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub id: u8,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const STEPS: [Step; 8] = [
    Step {
        id: 1,
        title: "Get Started",
        icon: "●",
        description: "Create the opportunity and its application",
    },
    Step {
        id: 2,
        title: "Companies",
        icon: "■",
        description: "Add companies involved in this opportunity",
    },
    Step {
        id: 3,
        title: "Contacts",
        icon: "◆",
        description: "Add recruiters and other people involved",
    },
    Step {
        id: 4,
        title: "Documents",
        icon: "▤",
        description: "Attach resumes, cover letters and other files",
    },
    Step {
        id: 5,
        title: "Products",
        icon: "▲",
        description: "Add products or projects tied to a company",
    },
    Step {
        id: 6,
        title: "Events",
        icon: "◐",
        description: "Schedule interviews, calls and appointments",
    },
    Step {
        id: 7,
        title: "Actions",
        icon: "▶",
        description: "Plan follow-ups and other next steps",
    },
    Step {
        id: 8,
        title: "Summary",
        icon: "★",
        description: "Review everything created in this wizard",
    },
];

pub fn step_by_id(id: u8) -> Option<&'static Step> {
    STEPS.iter().find(|s| s.id == id)
}

/// The six entity kinds managed by the list steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Company,
    Contact,
    Document,
    Product,
    Event,
    Action,
}

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Company,
            EntityKind::Contact,
            EntityKind::Document,
            EntityKind::Product,
            EntityKind::Event,
            EntityKind::Action,
        ]
    }

    /// The wizard step this kind is managed on.
    pub fn step(&self) -> u8 {
        match self {
            EntityKind::Company => 2,
            EntityKind::Contact => 3,
            EntityKind::Document => 4,
            EntityKind::Product => 5,
            EntityKind::Event => 6,
            EntityKind::Action => 7,
        }
    }

    pub fn for_step(step: u8) -> Option<EntityKind> {
        EntityKind::all().iter().copied().find(|k| k.step() == step)
    }

    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Contact => "contact",
            EntityKind::Document => "document",
            EntityKind::Product => "product",
            EntityKind::Event => "event",
            EntityKind::Action => "action",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Company => "companies",
            EntityKind::Contact => "contacts",
            EntityKind::Document => "documents",
            EntityKind::Product => "products",
            EntityKind::Event => "events",
            EntityKind::Action => "actions",
        }
    }

    /// Shown when the step's list is empty.
    pub fn empty_hint(&self) -> &'static str {
        match self {
            EntityKind::Company => "No companies yet. Add the hiring company or an intermediary.",
            EntityKind::Contact => "No contacts yet. Add the people you are talking to.",
            EntityKind::Document => "No documents yet. Attach the resume and cover letter you used.",
            EntityKind::Product => "No products yet. This step is optional.",
            EntityKind::Event => "No events yet. Schedule interviews or calls here.",
            EntityKind::Action => "No actions yet. Plan a follow-up so nothing slips.",
        }
    }

    pub fn count(&self, state: &WizardState) -> usize {
        match self {
            EntityKind::Company => state.created_companies.len(),
            EntityKind::Contact => state.created_contacts.len(),
            EntityKind::Document => state.created_documents.len(),
            EntityKind::Product => state.created_products.len(),
            EntityKind::Event => state.created_events.len(),
            EntityKind::Action => state.created_actions.len(),
        }
    }
}

/// Borrowed view of one session entity, independent of its kind. Lets
/// list rendering, selection and delete confirmation run off a single
/// code path.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Company(&'a Company),
    Contact(&'a Contact),
    Document(&'a Document),
    Product(&'a Product),
    Event(&'a ScheduledEvent),
    Action(&'a Action),
}

impl EntityRef<'_> {
    pub fn id(&self) -> i64 {
        match self {
            EntityRef::Company(c) => c.id,
            EntityRef::Contact(c) => c.id,
            EntityRef::Document(d) => d.id,
            EntityRef::Product(p) => p.id,
            EntityRef::Event(e) => e.id,
            EntityRef::Action(a) => a.id,
        }
    }

    /// Human label used in delete confirmations and the summary.
    pub fn label(&self) -> String {
        match self {
            EntityRef::Company(c) => c.name.clone(),
            EntityRef::Contact(c) => c.full_name(),
            EntityRef::Document(d) => d.name.clone(),
            EntityRef::Product(p) => p.name.clone(),
            EntityRef::Event(e) => e.title.clone(),
            EntityRef::Action(a) => a.action_type.replace('_', " "),
        }
    }
}

/// The session entities of one kind, in creation order.
pub fn entities_of<'a>(kind: EntityKind, state: &'a WizardState) -> Vec<EntityRef<'a>> {
    match kind {
        EntityKind::Company => state.created_companies.iter().map(EntityRef::Company).collect(),
        EntityKind::Contact => state.created_contacts.iter().map(EntityRef::Contact).collect(),
        EntityKind::Document => state.created_documents.iter().map(EntityRef::Document).collect(),
        EntityKind::Product => state.created_products.iter().map(EntityRef::Product).collect(),
        EntityKind::Event => state.created_events.iter().map(EntityRef::Event).collect(),
        EntityKind::Action => state.created_actions.iter().map(EntityRef::Action).collect(),
    }
}
