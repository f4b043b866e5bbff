//! Normalized handoff contract from a source adapter into the ingest
//! pipeline. Taxonomy fields (CPV codes, organization names, country and
//! currency) are still unresolved strings at this stage; the pipeline
//! resolves them against the stores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::SourceId;
use crate::tender::{Consultation, DocumentGroup, Sheet, SourceAttribution};
use crate::vocab::{ContractType, Procedure, TenderStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderDraft {
    pub source: SourceId,
    pub expedient: String,
    pub parent_expedient: Option<String>,
    pub name: String,
    pub contract_type: Option<ContractType>,
    pub procedure: Option<Procedure>,
    pub status: Option<TenderStatus>,
    pub cpv_code_strings: Vec<String>,
    pub location_text: Option<String>,
    pub locations: BTreeMap<String, String>,
    pub country_code: Option<String>,
    pub currency_name: Option<String>,
    pub contracting_organization_name: Option<String>,
    pub success_bidder_organization_name: Option<String>,
    pub submission_deadline_date: Option<DateTime<Utc>>,
    pub expedient_created_at: Option<DateTime<Utc>>,
    pub expedient_updated_at: Option<DateTime<Utc>>,
    pub budget_no_taxes: Option<f64>,
    pub contract_estimated_value: Option<f64>,
    pub award_amount: Option<f64>,
    pub bidders_number: Option<u32>,
    pub result: Option<String>,
    pub documents: Vec<DocumentGroup>,
    pub sheets: Vec<Sheet>,
    pub consultation: Option<Consultation>,
    pub attribution: SourceAttribution,
    pub is_minor_contract: bool,
    pub trigger_matching: bool,
}

impl TenderDraft {
    /// Empty draft carrying only identity and attribution; adapters fill in
    /// whatever their feed provides.
    pub fn new(
        source: SourceId,
        expedient: impl Into<String>,
        name: impl Into<String>,
        attribution: SourceAttribution,
    ) -> Self {
        Self {
            source,
            expedient: expedient.into(),
            parent_expedient: None,
            name: name.into(),
            contract_type: None,
            procedure: None,
            status: None,
            cpv_code_strings: Vec::new(),
            location_text: None,
            locations: BTreeMap::new(),
            country_code: None,
            currency_name: None,
            contracting_organization_name: None,
            success_bidder_organization_name: None,
            submission_deadline_date: None,
            expedient_created_at: None,
            expedient_updated_at: None,
            budget_no_taxes: None,
            contract_estimated_value: None,
            award_amount: None,
            bidders_number: None,
            result: None,
            documents: Vec::new(),
            sheets: Vec::new(),
            consultation: None,
            attribution,
            is_minor_contract: false,
            trigger_matching: false,
        }
    }

    /// Whether the mapped status marks a contract award.
    pub fn is_adjudication(&self) -> bool {
        matches!(self.status, Some(TenderStatus::Adjudicada))
    }
}
