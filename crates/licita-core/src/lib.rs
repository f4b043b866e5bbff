//! Core domain model and canonical vocabulary for Licita.

pub mod criteria;
pub mod draft;
pub mod patch;
pub mod payload;
pub mod source;
pub mod taxonomy;
pub mod tender;
pub mod vocab;

pub use criteria::{Account, MatchParameters, SearchCriteria, TenderAccount, UserRef};
pub use draft::TenderDraft;
pub use patch::{OrganizationPatch, TenderPatch};
pub use payload::{OrganizationProfilePayload, PayloadDocumentGroup, PayloadDocumentLink, PayloadSheet, SourcePayload};
pub use source::SourceId;
pub use taxonomy::{Country, CpvRef, Currency, Organization, OrganizationRef};
pub use tender::{Consultation, DocumentGroup, DocumentLink, Sheet, SourceAttribution, Tender};
pub use vocab::{ContractType, EmailFrequency, NotificationChannel, PlayerType, Procedure, TenderStatus};

pub const CRATE_NAME: &str = "licita-core";
