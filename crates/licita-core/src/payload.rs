//! Inbound payload contracts as delivered by the scraper processes.
//!
//! One explicit struct of optional string-typed fields; which fields a feed
//! actually carries, and which are mandatory, is decided by its adapter.
//! Values arrive in the feed's own encoding (localized dates, price strings
//! with thousands separators, delimited code lists) and are normalized by
//! the adapters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SourcePayload {
    pub expedient: String,
    /// Parent case-file id when the feed reports sub-lots of a parent filing.
    pub parent_expedient: Option<String>,
    pub name: String,
    pub contract_type: Option<String>,
    pub procedure: Option<String>,
    pub status: Option<String>,
    /// Delimited CPV code list; the delimiter is feed-specific.
    pub cpv_codes: Option<String>,
    pub location_text: Option<String>,
    pub locations: BTreeMap<String, String>,
    pub source_url: Option<String>,
    pub link_url: Option<String>,
    pub submission_deadline_date: Option<String>,
    pub expedient_created_at: Option<String>,
    pub expedient_updated_at: Option<String>,
    pub budget_no_taxes: Option<String>,
    pub contract_estimated_value: Option<String>,
    pub award_amount: Option<String>,
    pub bidders_number: Option<String>,
    pub result: Option<String>,
    pub contracting_organization: Option<String>,
    pub success_bidder_organization: Option<String>,
    pub currency: Option<String>,
    pub documents: Vec<PayloadDocumentGroup>,
    pub sheets: Vec<PayloadSheet>,
    pub consultation_name: Option<String>,
    pub consultation_status: Option<String>,
    pub consultation_start_date: Option<String>,
    pub consultation_deadline: Option<String>,
    pub consultation_open: Option<String>,
    pub consultation_participants: Option<String>,
    pub consultation_selection_type: Option<String>,
    pub consultation_web_url: Option<String>,
    pub consultation_conditions: Option<String>,
    pub consultation_created_at: Option<String>,
    /// When set, a created or applied update re-runs subscription matching.
    #[serde(rename = "match")]
    pub trigger_matching: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PayloadDocumentGroup {
    pub publication_date: Option<String>,
    pub name: Option<String>,
    pub documents: Vec<PayloadDocumentLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PayloadDocumentLink {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PayloadSheet {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Organization profile delivered by the organization directory feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationProfilePayload {
    pub name: String,
    pub country: Option<String>,
    pub languages: Option<String>,
    pub email: Option<String>,
    pub nif: Option<String>,
    pub web_url: Option<String>,
    pub activity: Option<String>,
    pub town: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    /// International dial prefix prepended to phone and fax when present.
    pub prefix: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub source_url: Option<String>,
}
