//! Resolution of free-text codes and names against the taxonomy stores.

use std::sync::Arc;

use tracing::debug;

use licita_adapters::normalize::slugify;
use licita_core::{Country, CpvRef, Currency, Organization, OrganizationRef, PlayerType};
use licita_store::{CpvStore, OrganizationStore, ReferenceStore, StoreError};

/// Artifact of malformed award pages on the national platform; a bidder
/// "name" that actually reads "see award detail" and must never become an
/// organization.
const AWARD_DETAIL_SENTINEL: &str = "Ver detalle de la adjudicación";

pub struct TaxonomyResolver {
    cpvs: Arc<dyn CpvStore>,
    organizations: Arc<dyn OrganizationStore>,
    reference: Arc<dyn ReferenceStore>,
}

impl TaxonomyResolver {
    pub fn new(
        cpvs: Arc<dyn CpvStore>,
        organizations: Arc<dyn OrganizationStore>,
        reference: Arc<dyn ReferenceStore>,
    ) -> Self {
        Self {
            cpvs,
            organizations,
            reference,
        }
    }

    /// Look up taxonomy entries for the given codes. Codes with no match are
    /// silently dropped.
    pub async fn resolve_cpv_codes(&self, codes: &[String]) -> Result<Vec<CpvRef>, StoreError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        self.cpvs.find_by_codes(codes).await
    }

    /// Find or create an organization by the slug of its display name.
    ///
    /// Returns `None` for empty names and the award-detail sentinel. A
    /// unique-slug violation on create means a concurrent ingestion won the
    /// race; the winner's row is re-read and returned.
    pub async fn resolve_organization(
        &self,
        name: &str,
        player_type: PlayerType,
    ) -> Result<Option<OrganizationRef>, StoreError> {
        let name = name.trim();
        if name.is_empty() || name == AWARD_DETAIL_SENTINEL {
            return Ok(None);
        }

        let slug = slugify(name);
        if let Some(existing) = self.organizations.find_by_slug(&slug).await? {
            return Ok(Some(existing.to_ref()));
        }

        match self
            .organizations
            .insert(Organization::new(slug.clone(), name, player_type))
            .await
        {
            Ok(created) => Ok(Some(created.to_ref())),
            Err(err) if err.is_unique_violation() => {
                debug!(%slug, "lost organization create race, re-reading");
                let winner = self.organizations.find_by_slug(&slug).await?.ok_or_else(|| {
                    StoreError::Backend(format!(
                        "organization {slug} vanished after unique violation"
                    ))
                })?;
                Ok(Some(winner.to_ref()))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn resolve_country_by_code(&self, code: &str) -> Result<Option<Country>, StoreError> {
        self.reference.country_by_code(code).await
    }

    pub async fn resolve_country_by_name(&self, name: &str) -> Result<Option<Country>, StoreError> {
        self.reference.country_by_name(name).await
    }

    pub async fn resolve_currency_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Currency>, StoreError> {
        self.reference.currency_by_name(name).await
    }
}

#[cfg(test)]
mod tests {
    use licita_store::MemoryStore;

    use super::*;

    fn resolver(store: Arc<MemoryStore>) -> TaxonomyResolver {
        TaxonomyResolver::new(store.clone(), store.clone(), store)
    }

    #[tokio::test]
    async fn unknown_cpv_codes_are_silently_dropped() {
        let store = Arc::new(MemoryStore::new());
        store.seed_cpv("45000000", "Trabajos de construcción").await;
        let resolver = resolver(store);
        let refs = resolver
            .resolve_cpv_codes(&["45000000".into(), "99999999".into()])
            .await
            .unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].code, "45000000");
    }

    #[tokio::test]
    async fn find_or_create_is_idempotent_under_identical_names() {
        let store = Arc::new(MemoryStore::new());
        let resolver = resolver(store);
        let first = resolver
            .resolve_organization("Ayuntamiento de Málaga", PlayerType::PublicContractingInstitution)
            .await
            .unwrap()
            .unwrap();
        let second = resolver
            .resolve_organization("Ayuntamiento de Málaga", PlayerType::PublicContractingInstitution)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.slug, "ayuntamiento-de-malaga");
    }

    #[tokio::test]
    async fn sentinel_and_empty_names_resolve_to_none() {
        let store = Arc::new(MemoryStore::new());
        let resolver = resolver(store);
        assert!(resolver
            .resolve_organization("", PlayerType::Bidder)
            .await
            .unwrap()
            .is_none());
        assert!(resolver
            .resolve_organization("  ", PlayerType::Bidder)
            .await
            .unwrap()
            .is_none());
        assert!(resolver
            .resolve_organization("Ver detalle de la adjudicación", PlayerType::Bidder)
            .await
            .unwrap()
            .is_none());
    }
}
