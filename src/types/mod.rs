//! Wire types shared by the API client and the wizard.

mod entities;
mod payloads;

pub use entities::{
    Action, Application, ApplicationStatus, ApplicationType, CommunicationMethod, Company, Contact,
    ContractType, Document, EventStatus, Opportunity, OpportunityContact, OpportunityProduct,
    Product, RemotePolicy, ScheduledEvent, User,
};
pub use payloads::{
    ActionCreate, ApplicationSeed, ApplicationUpdate, CompanyCreate, ContactCreate, DocumentCreate,
    OpportunityContactCreate, OpportunityCreate, OpportunityProductCreate, OpportunityUpdate,
    ProductCreate, ScheduledEventCreate, WizardInitRequest,
};
