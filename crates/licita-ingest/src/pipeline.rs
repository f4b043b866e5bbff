//! The ingestion facade: one inbound payload in, one explicit outcome out.
//!
//! Rejections are values, not errors, so callers never distinguish outcomes
//! by catching. Store failures mid-flight surface as `Rejected` with the cause
//! recorded in the structured log, and the stored tender is never left
//! partially written: the create row and the update patch are both built in
//! full before the single store call that applies them.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use licita_adapters::normalize::slugify;
use licita_adapters::{adapter_for_source, AdapterError};
use licita_core::{
    Organization, OrganizationPatch, OrganizationProfilePayload, PlayerType, SourceId,
    SourcePayload, Tender, TenderDraft,
};
use licita_match::MatchEngine;
use licita_store::{CpvStore, OrganizationStore, ReferenceStore, StoreError, TenderStore};

use crate::config::IngestConfig;
use crate::identity::IdentityResolver;
use crate::reconcile::{ReconcileError, Reconciler};
use crate::taxonomy::TaxonomyResolver;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestRequest {
    pub credential: String,
    pub payload: SourcePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationIngestRequest {
    pub credential: String,
    pub payload: OrganizationProfilePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum IngestOutcome {
    Created { id: Uuid },
    Updated { id: Uuid, applied: bool },
    Rejected { reason: RejectReason },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RejectReason {
    Unauthorized,
    MissingField { field: String },
    Failed { message: String },
}

#[derive(Debug, Error)]
enum IngestError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

pub struct IngestPipeline {
    config: IngestConfig,
    tenders: Arc<dyn TenderStore>,
    organizations: Arc<dyn OrganizationStore>,
    taxonomy: TaxonomyResolver,
    identity: IdentityResolver,
    matcher: Option<Arc<MatchEngine>>,
}

impl IngestPipeline {
    pub fn new(
        config: IngestConfig,
        tenders: Arc<dyn TenderStore>,
        organizations: Arc<dyn OrganizationStore>,
        cpvs: Arc<dyn CpvStore>,
        reference: Arc<dyn ReferenceStore>,
    ) -> Self {
        let taxonomy = TaxonomyResolver::new(cpvs, organizations.clone(), reference);
        let identity = IdentityResolver::new(config.identity_distance_threshold);
        Self {
            config,
            tenders,
            organizations,
            taxonomy,
            identity,
            matcher: None,
        }
    }

    pub fn with_matcher(mut self, matcher: Arc<MatchEngine>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Ingest one tender payload from the given feed.
    pub async fn ingest(&self, source: SourceId, request: IngestRequest) -> IngestOutcome {
        let span = info_span!(
            "ingest_tender",
            source = source.slug(),
            expedient = %request.payload.expedient
        );
        let _guard = span.enter();

        if !self.config.is_authorized(&request.credential) {
            warn!(source = source.slug(), "rejected: bad credential");
            return IngestOutcome::Rejected {
                reason: RejectReason::Unauthorized,
            };
        }

        let adapter = adapter_for_source(source);
        let draft = match adapter.map(&request.payload, Utc::now()) {
            Ok(draft) => draft,
            Err(AdapterError::MissingField { source_name: source, field }) => {
                warn!(
                    source,
                    field,
                    payload = %snapshot(&request.payload),
                    "rejected: missing mandatory field"
                );
                return IngestOutcome::Rejected {
                    reason: RejectReason::MissingField {
                        field: field.to_string(),
                    },
                };
            }
            Err(AdapterError::Message(message)) => {
                warn!(
                    source = source.slug(),
                    payload = %snapshot(&request.payload),
                    %message,
                    "rejected: adapter failure"
                );
                return IngestOutcome::Rejected {
                    reason: RejectReason::Failed { message },
                };
            }
        };

        match self.process(draft).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    source = source.slug(),
                    payload = %snapshot(&request.payload),
                    error = %err,
                    "rejected: ingestion failure"
                );
                IngestOutcome::Rejected {
                    reason: RejectReason::Failed {
                        message: err.to_string(),
                    },
                }
            }
        }
    }

    async fn process(&self, draft: TenderDraft) -> Result<IngestOutcome, IngestError> {
        let candidates = self.candidate_pool(&draft).await?;
        if let Some(existing) = self.identity.best_match(&draft.name, &candidates) {
            let existing = existing.clone();
            return self.reconcile_update(existing, draft).await;
        }
        self.create(draft).await
    }

    /// Candidate tenders for identity resolution: parent expedient first
    /// (some feeds file sub-lots under a different expedient than the parent
    /// filing), then the plain expedient.
    async fn candidate_pool(&self, draft: &TenderDraft) -> Result<Vec<Tender>, StoreError> {
        if let Some(parent) = &draft.parent_expedient {
            let candidates = self.tenders.find_by_expedient(parent).await?;
            if !candidates.is_empty() {
                return Ok(candidates);
            }
        }
        self.tenders.find_by_expedient(&draft.expedient).await
    }

    async fn create(&self, draft: TenderDraft) -> Result<IngestOutcome, IngestError> {
        let tender = self.build_tender(&draft).await?;
        match self.tenders.insert(tender).await {
            Ok(created) => {
                info!(tender = %created.id, "tender created");
                if draft.trigger_matching {
                    self.run_matching(&created).await;
                }
                Ok(IngestOutcome::Created { id: created.id })
            }
            Err(err) if err.is_unique_violation() => {
                // A concurrent ingestion stored the same procedure first;
                // re-read and continue as an update.
                let candidates = self.candidate_pool(&draft).await?;
                match self.identity.best_match(&draft.name, &candidates) {
                    Some(existing) => {
                        let existing = existing.clone();
                        self.reconcile_update(existing, draft).await
                    }
                    None => Err(StoreError::Backend(
                        "lost create race but found no candidate to update".into(),
                    )
                    .into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn reconcile_update(
        &self,
        tender: Tender,
        draft: TenderDraft,
    ) -> Result<IngestOutcome, IngestError> {
        // Attribution first; idempotent per source name even when the
        // freshness gate below turns the rest into a no-op.
        let tender = self
            .tenders
            .append_source_attribution(tender.id, draft.attribution.clone())
            .await?;

        let Some(patch) = Reconciler::build_patch(&self.taxonomy, &tender, &draft).await? else {
            info!(tender = %tender.id, "stale snapshot, attribution only");
            return Ok(IngestOutcome::Updated {
                id: tender.id,
                applied: false,
            });
        };

        let updated = self.tenders.update_fields(tender.id, patch).await?;
        info!(tender = %updated.id, "tender updated");
        if draft.trigger_matching {
            self.run_matching(&updated).await;
        }
        Ok(IngestOutcome::Updated {
            id: updated.id,
            applied: true,
        })
    }

    async fn build_tender(&self, draft: &TenderDraft) -> Result<Tender, StoreError> {
        let contracting_organization = match &draft.contracting_organization_name {
            Some(name) => {
                self.taxonomy
                    .resolve_organization(name, PlayerType::PublicContractingInstitution)
                    .await?
            }
            None => None,
        };
        let success_bidder_organization = match &draft.success_bidder_organization_name {
            Some(name) => {
                self.taxonomy
                    .resolve_organization(name, PlayerType::Bidder)
                    .await?
            }
            None => None,
        };
        let cpv_codes = self
            .taxonomy
            .resolve_cpv_codes(&draft.cpv_code_strings)
            .await?;
        let country = match &draft.country_code {
            Some(code) => self.taxonomy.resolve_country_by_code(code).await?,
            None => None,
        };
        let currency = match &draft.currency_name {
            Some(name) => self.taxonomy.resolve_currency_by_name(name).await?,
            None => None,
        };

        let now = Utc::now();
        Ok(Tender {
            id: Uuid::new_v4(),
            slug: identity_slug(&draft.expedient, &draft.name),
            expedient: draft.expedient.clone(),
            name: draft.name.clone(),
            contract_type: draft.contract_type.unwrap_or_default(),
            procedure: draft.procedure.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            cpv_codes,
            contracting_organization,
            success_bidder_organization,
            location_text: draft.location_text.clone(),
            locations: draft.locations.clone(),
            country,
            currency,
            sources: vec![draft.attribution.clone()],
            documents: draft.documents.clone(),
            sheets: draft.sheets.clone(),
            consultation: draft.consultation.clone(),
            submission_deadline_date: draft.submission_deadline_date,
            expedient_created_at: draft.expedient_created_at,
            expedient_updated_at: draft.expedient_updated_at,
            budget_no_taxes: draft.budget_no_taxes,
            contract_estimated_value: draft.contract_estimated_value,
            award_amount: draft.award_amount,
            result: draft.result.clone(),
            bidders_number: draft.bidders_number,
            is_adjudication: draft.is_adjudication(),
            is_minor_contract: draft.is_minor_contract,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Matching is fire-and-forget from the ingestion path: an evaluation
    /// failure is logged and never fails the ingestion.
    async fn run_matching(&self, tender: &Tender) {
        let Some(matcher) = &self.matcher else {
            return;
        };
        if let Err(err) = matcher.evaluate(tender).await {
            warn!(tender = %tender.id, error = %err, "subscription matching failed");
        }
    }

    /// Ingest one organization profile from the directory feed: sparse merge
    /// onto the existing row, create on first sight.
    pub async fn upsert_organization_profile(
        &self,
        request: OrganizationIngestRequest,
    ) -> IngestOutcome {
        let span = info_span!("ingest_organization", name = %request.payload.name);
        let _guard = span.enter();

        if !self.config.is_authorized(&request.credential) {
            warn!("rejected: bad credential");
            return IngestOutcome::Rejected {
                reason: RejectReason::Unauthorized,
            };
        }
        let payload = &request.payload;
        if payload
            .source_url
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
        {
            warn!(payload = %snapshot(payload), "rejected: missing source url");
            return IngestOutcome::Rejected {
                reason: RejectReason::MissingField {
                    field: "sourceUrl".into(),
                },
            };
        }
        if payload.name.trim().is_empty() {
            return IngestOutcome::Rejected {
                reason: RejectReason::MissingField {
                    field: "name".into(),
                },
            };
        }

        match self.apply_organization_profile(payload).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(payload = %snapshot(payload), error = %err, "rejected: organization ingestion failure");
                IngestOutcome::Rejected {
                    reason: RejectReason::Failed {
                        message: err.to_string(),
                    },
                }
            }
        }
    }

    async fn apply_organization_profile(
        &self,
        payload: &OrganizationProfilePayload,
    ) -> Result<IngestOutcome, StoreError> {
        let slug = slugify(payload.name.trim());
        let patch = self.organization_patch(payload).await?;

        if let Some(existing) = self.organizations.find_by_slug(&slug).await? {
            let updated = self.organizations.update_fields(existing.id, patch).await?;
            return Ok(IngestOutcome::Updated {
                id: updated.id,
                applied: true,
            });
        }

        let mut organization = Organization::new(
            slug.clone(),
            payload.name.trim(),
            PlayerType::PublicContractingInstitution,
        );
        organization.apply_patch(&patch);
        match self.organizations.insert(organization).await {
            Ok(created) => Ok(IngestOutcome::Created { id: created.id }),
            Err(err) if err.is_unique_violation() => {
                let winner = self.organizations.find_by_slug(&slug).await?.ok_or_else(|| {
                    StoreError::Backend(format!("organization {slug} vanished after unique violation"))
                })?;
                let updated = self.organizations.update_fields(winner.id, patch).await?;
                Ok(IngestOutcome::Updated {
                    id: updated.id,
                    applied: true,
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn organization_patch(
        &self,
        payload: &OrganizationProfilePayload,
    ) -> Result<OrganizationPatch, StoreError> {
        let country = match trimmed(&payload.country) {
            Some(name) => self.taxonomy.resolve_country_by_name(name).await?,
            None => None,
        };
        Ok(OrganizationPatch {
            country,
            languages: trimmed(&payload.languages)
                .map(|lang| vec![canonical_language(lang).to_string()]),
            email: trimmed(&payload.email).map(ToString::to_string),
            tax_identification_number: trimmed(&payload.nif).map(ToString::to_string),
            web_url: trimmed(&payload.web_url).map(ToString::to_string),
            activity: trimmed(&payload.activity).map(ToString::to_string),
            town: trimmed(&payload.town).map(ToString::to_string),
            street: trimmed(&payload.street).map(ToString::to_string),
            postal_code: trimmed(&payload.postal_code).map(ToString::to_string),
            phone: trimmed(&payload.phone).map(|phone| with_prefix(&payload.prefix, phone)),
            fax: trimmed(&payload.fax).map(|fax| with_prefix(&payload.prefix, fax)),
            ..OrganizationPatch::default()
        })
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn with_prefix(prefix: &Option<String>, number: &str) -> String {
    match prefix.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix}{number}"),
        None => number.to_string(),
    }
}

fn canonical_language(raw: &str) -> &str {
    if raw == "Español" {
        "Spanish"
    } else {
        raw
    }
}

/// Identity slug for the uniqueness constraint: expedient plus name,
/// truncated the way the feeds' own case-file slugs are.
fn identity_slug(expedient: &str, name: &str) -> String {
    let text: String = format!("{expedient} {name}").chars().take(100).collect();
    slugify(&text)
}

fn snapshot<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|_| "<unserializable payload>".to_string())
}
