//! Reconciliation of a matched tender with a fresh payload.
//!
//! The core consistency invariant lives here: a field overwrite happens only
//! when the incoming `expedient_updated_at` is strictly later than the
//! stored one, so redelivered or out-of-order snapshots can never regress
//! state. The patch is built completely, including every taxonomy
//! resolution, before a single store write, so a resolution failure aborts
//! the update without touching the tender.

use thiserror::Error;

use licita_core::{PlayerType, Tender, TenderDraft, TenderPatch};
use licita_store::StoreError;

use crate::taxonomy::TaxonomyResolver;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("taxonomy resolution failed: {0}")]
    Resolution(#[from] StoreError),
}

pub struct Reconciler;

impl Reconciler {
    /// Build the sparse patch for an accepted update, or `None` when the
    /// incoming snapshot is stale. Stale delivery is a silent no-op, not an
    /// error.
    pub async fn build_patch(
        taxonomy: &TaxonomyResolver,
        tender: &Tender,
        draft: &TenderDraft,
    ) -> Result<Option<TenderPatch>, ReconcileError> {
        let Some(incoming) = draft.expedient_updated_at else {
            // A payload that cannot prove freshness never overwrites.
            return Ok(None);
        };
        if let Some(stored) = tender.expedient_updated_at {
            if incoming <= stored {
                return Ok(None);
            }
        }

        let mut patch = TenderPatch {
            name: Some(draft.name.clone()),
            contract_type: draft.contract_type,
            procedure: draft.procedure,
            status: draft.status,
            submission_deadline_date: draft.submission_deadline_date,
            expedient_updated_at: Some(incoming),
            budget_no_taxes: draft.budget_no_taxes,
            contract_estimated_value: draft.contract_estimated_value,
            award_amount: draft.award_amount,
            bidders_number: draft.bidders_number,
            result: draft.result.clone(),
            ..TenderPatch::default()
        };

        if !draft.cpv_code_strings.is_empty() {
            patch.cpv_codes = Some(taxonomy.resolve_cpv_codes(&draft.cpv_code_strings).await?);
        }
        if !draft.documents.is_empty() {
            patch.documents = Some(draft.documents.clone());
        }
        if !draft.sheets.is_empty() {
            patch.sheets = Some(draft.sheets.clone());
        }

        // Award information is first-writer-wins: once a success bidder is
        // recorded, later resubmissions never replace it.
        if tender.success_bidder_organization.is_none() {
            if let Some(bidder_name) = &draft.success_bidder_organization_name {
                patch.success_bidder_organization = taxonomy
                    .resolve_organization(bidder_name, PlayerType::Bidder)
                    .await?;
            }
        }

        // Derived flags are recomputed on every applied update.
        patch.is_adjudication = Some(draft.is_adjudication());
        if draft.is_minor_contract {
            patch.is_minor_contract = Some(true);
        }

        Ok(Some(patch))
    }
}
