//! Store contracts the ingestion and matching cores depend on.
//!
//! The persistent engine behind these traits is an external collaborator;
//! uniqueness constraints live there, and callers recover from
//! [`StoreError::UniqueViolation`] by re-reading instead of crashing; the
//! store, not an in-process lock, arbitrates concurrent writers.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use licita_core::{
    Country, CpvRef, Currency, Organization, OrganizationPatch, SearchCriteria, SourceAttribution,
    Tender, TenderAccount, TenderPatch,
};

pub use memory::MemoryStore;

pub const CRATE_NAME: &str = "licita-store";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {entity}.{field} for {value:?}")]
    UniqueViolation {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("no {entity} with id {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

#[async_trait]
pub trait TenderStore: Send + Sync {
    /// All live tenders filed under the given expedient. Soft-deleted rows
    /// are never returned.
    async fn find_by_expedient(&self, expedient: &str) -> Result<Vec<Tender>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tender>, StoreError>;

    /// Insert a new tender; `UniqueViolation` on the identity slug means a
    /// concurrent writer created the same procedure first.
    async fn insert(&self, tender: Tender) -> Result<Tender, StoreError>;

    /// Apply a sparse patch in one atomic step and return the updated row.
    async fn update_fields(&self, id: Uuid, patch: TenderPatch) -> Result<Tender, StoreError>;

    /// Append a source attribution unless one with the same canonical name
    /// is already present. Idempotent per source name.
    async fn append_source_attribution(
        &self,
        id: Uuid,
        attribution: SourceAttribution,
    ) -> Result<Tender, StoreError>;

    /// Mark a tender deleted without removing the row.
    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, StoreError>;

    /// Insert a new organization; `UniqueViolation` on the slug means the
    /// find-or-create race was lost and the caller should re-read.
    async fn insert(&self, organization: Organization) -> Result<Organization, StoreError>;

    async fn update_fields(
        &self,
        id: Uuid,
        patch: OrganizationPatch,
    ) -> Result<Organization, StoreError>;
}

#[async_trait]
pub trait CpvStore: Send + Sync {
    /// Taxonomy entries for the given codes; unknown codes are absent from
    /// the result, not an error.
    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<CpvRef>, StoreError>;
}

#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn country_by_code(&self, code: &str) -> Result<Option<Country>, StoreError>;
    async fn country_by_name(&self, name: &str) -> Result<Option<Country>, StoreError>;
    async fn currency_by_name(&self, name: &str) -> Result<Option<Currency>, StoreError>;
}

#[async_trait]
pub trait CriteriaStore: Send + Sync {
    /// Active, non-archived subscriptions.
    async fn list_active(&self) -> Result<Vec<SearchCriteria>, StoreError>;
}

/// Outcome of a find-or-create on the `(tender, criteria)` pairing.
#[derive(Debug, Clone)]
pub struct PairingOutcome {
    pub created: bool,
    pub account: TenderAccount,
}

#[async_trait]
pub trait TenderAccountStore: Send + Sync {
    /// At most one pairing exists per `(tender, criteria)`; repeated calls
    /// return the existing row with `created == false`.
    async fn find_or_create(
        &self,
        tender_id: Uuid,
        criteria_id: Uuid,
        account_id: Uuid,
    ) -> Result<PairingOutcome, StoreError>;
}
