//! The canonical tender record, one row per real-world procurement procedure.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::taxonomy::{Country, CpvRef, Currency, OrganizationRef};
use crate::vocab::{ContractType, Procedure, TenderStatus};

/// Record that one external feed reported on this tender.
///
/// Appended at most once per canonical source name and never overwritten on
/// resubmission; the raw body snapshot preserves exactly what the feed sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAttribution {
    pub name: String,
    pub country: String,
    pub source_url: Option<String>,
    pub link_url: Option<String>,
    pub raw_body_snapshot: String,
    pub body_sha256: String,
    pub attributed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGroup {
    pub publication_date: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub documents: Vec<DocumentLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Preliminary market consultation attached by the national platform's
/// consultation feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Consultation {
    pub name: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub open: Option<bool>,
    pub participants: Option<String>,
    pub selection_type: Option<String>,
    pub web_url: Option<String>,
    pub conditions: Option<String>,
    pub consultation_created_at: Option<DateTime<Utc>>,
}

/// Canonical procurement procedure record.
///
/// Created by a source adapter on first sighting, mutated only through the
/// reconciliation engine, soft-deleted only. `expedient_updated_at` is the
/// authoritative ordering field for reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    pub id: Uuid,
    pub slug: String,
    pub expedient: String,
    pub name: String,
    pub contract_type: ContractType,
    pub procedure: Procedure,
    pub status: TenderStatus,
    pub cpv_codes: Vec<CpvRef>,
    pub contracting_organization: Option<OrganizationRef>,
    pub success_bidder_organization: Option<OrganizationRef>,
    pub location_text: Option<String>,
    pub locations: BTreeMap<String, String>,
    pub country: Option<Country>,
    pub currency: Option<Currency>,
    pub sources: Vec<SourceAttribution>,
    pub documents: Vec<DocumentGroup>,
    pub sheets: Vec<Sheet>,
    pub consultation: Option<Consultation>,
    pub submission_deadline_date: Option<DateTime<Utc>>,
    pub expedient_created_at: Option<DateTime<Utc>>,
    pub expedient_updated_at: Option<DateTime<Utc>>,
    pub budget_no_taxes: Option<f64>,
    pub contract_estimated_value: Option<f64>,
    pub award_amount: Option<f64>,
    pub result: Option<String>,
    pub bidders_number: Option<u32>,
    pub is_adjudication: bool,
    pub is_minor_contract: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tender {
    /// Whether the given feed has already been attributed on this tender.
    pub fn has_source(&self, source_name: &str) -> bool {
        self.sources.iter().any(|s| s.name == source_name)
    }

    /// Location entries in the `key/value` form used by search criteria.
    pub fn location_entries(&self) -> Vec<String> {
        self.locations
            .iter()
            .map(|(key, value)| format!("{key}/{value}"))
            .collect()
    }
}
