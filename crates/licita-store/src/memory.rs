//! In-memory reference store used by tests and the CLI. Enforces the same
//! uniqueness constraints a persistent backend would, so race-recovery code
//! paths behave identically against it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use licita_core::{
    Country, CpvRef, Currency, Organization, OrganizationPatch, SearchCriteria, SourceAttribution,
    Tender, TenderAccount, TenderPatch,
};

use crate::{
    CpvStore, CriteriaStore, OrganizationStore, PairingOutcome, ReferenceStore, StoreError,
    TenderAccountStore, TenderStore,
};

#[derive(Default)]
struct Inner {
    tenders: HashMap<Uuid, Tender>,
    tender_slugs: HashMap<String, Uuid>,
    organizations: HashMap<Uuid, Organization>,
    organization_slugs: HashMap<String, Uuid>,
    cpvs: HashMap<String, CpvRef>,
    countries: Vec<Country>,
    currencies: Vec<Currency>,
    criteria: Vec<SearchCriteria>,
    pairings: Vec<TenderAccount>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_cpv(&self, code: &str, name: &str) {
        let mut inner = self.inner.write().await;
        inner.cpvs.insert(
            code.to_string(),
            CpvRef {
                id: Uuid::new_v4(),
                code: code.to_string(),
                name: name.to_string(),
            },
        );
    }

    pub async fn seed_country(&self, country: Country) {
        self.inner.write().await.countries.push(country);
    }

    pub async fn seed_currency(&self, currency: Currency) {
        self.inner.write().await.currencies.push(currency);
    }

    pub async fn seed_criteria(&self, criteria: SearchCriteria) {
        self.inner.write().await.criteria.push(criteria);
    }

    pub async fn tender_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner
            .tenders
            .values()
            .filter(|t| t.deleted_at.is_none())
            .count()
    }

    pub async fn pairing_count(&self) -> usize {
        self.inner.read().await.pairings.len()
    }
}

#[async_trait]
impl TenderStore for MemoryStore {
    async fn find_by_expedient(&self, expedient: &str) -> Result<Vec<Tender>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tenders
            .values()
            .filter(|t| t.expedient == expedient && t.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tender>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tenders
            .get(&id)
            .filter(|t| t.deleted_at.is_none())
            .cloned())
    }

    async fn insert(&self, tender: Tender) -> Result<Tender, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.tender_slugs.contains_key(&tender.slug) {
            return Err(StoreError::UniqueViolation {
                entity: "tender",
                field: "slug",
                value: tender.slug,
            });
        }
        debug!(tender_id = %tender.id, slug = %tender.slug, "inserting tender");
        inner.tender_slugs.insert(tender.slug.clone(), tender.id);
        inner.tenders.insert(tender.id, tender.clone());
        Ok(tender)
    }

    async fn update_fields(&self, id: Uuid, patch: TenderPatch) -> Result<Tender, StoreError> {
        let mut inner = self.inner.write().await;
        let tender = inner.tenders.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "tender",
            id,
        })?;
        tender.apply_patch(&patch);
        Ok(tender.clone())
    }

    async fn append_source_attribution(
        &self,
        id: Uuid,
        attribution: SourceAttribution,
    ) -> Result<Tender, StoreError> {
        let mut inner = self.inner.write().await;
        let tender = inner.tenders.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "tender",
            id,
        })?;
        if !tender.has_source(&attribution.name) {
            tender.sources.push(attribution);
            tender.updated_at = Utc::now();
        }
        Ok(tender.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let tender = inner.tenders.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "tender",
            id,
        })?;
        tender.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .organization_slugs
            .get(slug)
            .and_then(|id| inner.organizations.get(id))
            .filter(|o| o.deleted_at.is_none())
            .cloned())
    }

    async fn insert(&self, organization: Organization) -> Result<Organization, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.organization_slugs.contains_key(&organization.slug) {
            return Err(StoreError::UniqueViolation {
                entity: "organization",
                field: "slug",
                value: organization.slug,
            });
        }
        debug!(org_id = %organization.id, slug = %organization.slug, "inserting organization");
        inner
            .organization_slugs
            .insert(organization.slug.clone(), organization.id);
        inner
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        patch: OrganizationPatch,
    ) -> Result<Organization, StoreError> {
        let mut inner = self.inner.write().await;
        let organization = inner.organizations.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "organization",
            id,
        })?;
        organization.apply_patch(&patch);
        Ok(organization.clone())
    }
}

#[async_trait]
impl CpvStore for MemoryStore {
    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<CpvRef>, StoreError> {
        let inner = self.inner.read().await;
        Ok(codes
            .iter()
            .filter_map(|code| inner.cpvs.get(code).cloned())
            .collect())
    }
}

#[async_trait]
impl ReferenceStore for MemoryStore {
    async fn country_by_code(&self, code: &str) -> Result<Option<Country>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.countries.iter().find(|c| c.code == code).cloned())
    }

    async fn country_by_name(&self, name: &str) -> Result<Option<Country>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.countries.iter().find(|c| c.name == name).cloned())
    }

    async fn currency_by_name(&self, name: &str) -> Result<Option<Currency>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.currencies.iter().find(|c| c.name == name).cloned())
    }
}

#[async_trait]
impl CriteriaStore for MemoryStore {
    async fn list_active(&self) -> Result<Vec<SearchCriteria>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .criteria
            .iter()
            .filter(|c| c.is_evaluable())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TenderAccountStore for MemoryStore {
    async fn find_or_create(
        &self,
        tender_id: Uuid,
        criteria_id: Uuid,
        account_id: Uuid,
    ) -> Result<PairingOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .pairings
            .iter()
            .find(|p| p.tender_id == tender_id && p.search_criteria_id == criteria_id)
        {
            return Ok(PairingOutcome {
                created: false,
                account: existing.clone(),
            });
        }
        let pairing = TenderAccount {
            id: Uuid::new_v4(),
            tender_id,
            search_criteria_id: criteria_id,
            account_id,
            is_archived: false,
            created_at: Utc::now(),
        };
        inner.pairings.push(pairing.clone());
        Ok(PairingOutcome {
            created: true,
            account: pairing,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use licita_core::{ContractType, PlayerType, Procedure, TenderStatus};

    use super::*;

    fn mk_tender(expedient: &str, name: &str, slug: &str) -> Tender {
        let now = Utc::now();
        Tender {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            expedient: expedient.to_string(),
            name: name.to_string(),
            contract_type: ContractType::NoDefinido,
            procedure: Procedure::Otros,
            status: TenderStatus::NoDefinido,
            cpv_codes: vec![],
            contracting_organization: None,
            success_bidder_organization: None,
            location_text: None,
            locations: BTreeMap::new(),
            country: None,
            currency: None,
            sources: vec![],
            documents: vec![],
            sheets: vec![],
            consultation: None,
            submission_deadline_date: None,
            expedient_created_at: None,
            expedient_updated_at: None,
            budget_no_taxes: None,
            contract_estimated_value: None,
            award_amount: None,
            result: None,
            bidders_number: None,
            is_adjudication: false,
            is_minor_contract: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn tender_slug_is_unique() {
        let store = MemoryStore::new();
        TenderStore::insert(&store, mk_tender("EXP-1", "Obras de acceso", "exp-1-obras-de-acceso"))
            .await
            .unwrap();
        let err = TenderStore::insert(&store, mk_tender("EXP-1", "Obras de acceso", "exp-1-obras-de-acceso"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn soft_deleted_tenders_are_invisible() {
        let store = MemoryStore::new();
        let tender = TenderStore::insert(&store, mk_tender("EXP-2", "Suministro de luminarias", "exp-2"))
            .await
            .unwrap();
        assert_eq!(store.find_by_expedient("EXP-2").await.unwrap().len(), 1);
        store.soft_delete(tender.id).await.unwrap();
        assert!(store.find_by_expedient("EXP-2").await.unwrap().is_empty());
        assert!(store.find_by_id(tender.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn organization_slug_conflict_signals_lost_race() {
        let store = MemoryStore::new();
        OrganizationStore::insert(&store, Organization::new(
                "ayuntamiento-de-sevilla",
                "Ayuntamiento de Sevilla",
                PlayerType::PublicContractingInstitution,
            ))
            .await
            .unwrap();
        let err = OrganizationStore::insert(&store, Organization::new(
                "ayuntamiento-de-sevilla",
                "Ayuntamiento de Sevilla",
                PlayerType::PublicContractingInstitution,
            ))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(store
            .find_by_slug("ayuntamiento-de-sevilla")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn attribution_is_idempotent_per_source_name() {
        let store = MemoryStore::new();
        let tender = TenderStore::insert(&store, mk_tender("EXP-3", "Mantenimiento de parques", "exp-3"))
            .await
            .unwrap();
        let attribution = SourceAttribution {
            name: "Contratos Menores".into(),
            country: "Spain".into(),
            source_url: Some("https://example.es/exp-3".into()),
            link_url: None,
            raw_body_snapshot: "{}".into(),
            body_sha256: String::new(),
            attributed_at: Utc::now(),
        };
        let updated = store
            .append_source_attribution(tender.id, attribution.clone())
            .await
            .unwrap();
        assert_eq!(updated.sources.len(), 1);
        let updated = store
            .append_source_attribution(tender.id, attribution)
            .await
            .unwrap();
        assert_eq!(updated.sources.len(), 1);
    }

    #[tokio::test]
    async fn pairing_find_or_create_is_idempotent() {
        let store = MemoryStore::new();
        let tender_id = Uuid::new_v4();
        let criteria_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let first = store
            .find_or_create(tender_id, criteria_id, account_id)
            .await
            .unwrap();
        assert!(first.created);
        let second = store
            .find_or_create(tender_id, criteria_id, account_id)
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(first.account.id, second.account.id);
        assert_eq!(store.pairing_count().await, 1);
    }
}
