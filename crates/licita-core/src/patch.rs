//! Sparse update sets. A `None` field is left untouched by the store; the
//! reconciliation engine can therefore never null out a canonical field by
//! omitting it from a payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::taxonomy::{Country, CpvRef, Organization, OrganizationRef};
use crate::tender::{DocumentGroup, Sheet, Tender};
use crate::vocab::{ContractType, PlayerType, Procedure, TenderStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TenderPatch {
    pub name: Option<String>,
    pub contract_type: Option<ContractType>,
    pub procedure: Option<Procedure>,
    pub status: Option<TenderStatus>,
    pub cpv_codes: Option<Vec<CpvRef>>,
    pub submission_deadline_date: Option<DateTime<Utc>>,
    pub expedient_updated_at: Option<DateTime<Utc>>,
    pub budget_no_taxes: Option<f64>,
    pub contract_estimated_value: Option<f64>,
    pub award_amount: Option<f64>,
    pub bidders_number: Option<u32>,
    pub result: Option<String>,
    pub success_bidder_organization: Option<OrganizationRef>,
    pub documents: Option<Vec<DocumentGroup>>,
    pub sheets: Option<Vec<Sheet>>,
    pub is_adjudication: Option<bool>,
    pub is_minor_contract: Option<bool>,
}

impl TenderPatch {
    pub fn is_empty(&self) -> bool {
        self == &TenderPatch::default()
    }
}

impl Tender {
    /// Apply a sparse patch in place, bumping `updated_at`.
    pub fn apply_patch(&mut self, patch: &TenderPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(contract_type) = patch.contract_type {
            self.contract_type = contract_type;
        }
        if let Some(procedure) = patch.procedure {
            self.procedure = procedure;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(cpv_codes) = &patch.cpv_codes {
            self.cpv_codes = cpv_codes.clone();
        }
        if let Some(deadline) = patch.submission_deadline_date {
            self.submission_deadline_date = Some(deadline);
        }
        if let Some(updated_at) = patch.expedient_updated_at {
            self.expedient_updated_at = Some(updated_at);
        }
        if let Some(budget) = patch.budget_no_taxes {
            self.budget_no_taxes = Some(budget);
        }
        if let Some(estimated) = patch.contract_estimated_value {
            self.contract_estimated_value = Some(estimated);
        }
        if let Some(award) = patch.award_amount {
            self.award_amount = Some(award);
        }
        if let Some(bidders) = patch.bidders_number {
            self.bidders_number = Some(bidders);
        }
        if let Some(result) = &patch.result {
            self.result = Some(result.clone());
        }
        if let Some(bidder) = &patch.success_bidder_organization {
            self.success_bidder_organization = Some(bidder.clone());
        }
        if let Some(documents) = &patch.documents {
            self.documents = documents.clone();
        }
        if let Some(sheets) = &patch.sheets {
            self.sheets = sheets.clone();
        }
        if let Some(is_adjudication) = patch.is_adjudication {
            self.is_adjudication = is_adjudication;
        }
        if let Some(is_minor_contract) = patch.is_minor_contract {
            self.is_minor_contract = is_minor_contract;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct OrganizationPatch {
    pub player_type: Option<PlayerType>,
    pub country: Option<Country>,
    pub languages: Option<Vec<String>>,
    pub email: Option<String>,
    pub tax_identification_number: Option<String>,
    pub web_url: Option<String>,
    pub activity: Option<String>,
    pub town: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
}

impl OrganizationPatch {
    pub fn is_empty(&self) -> bool {
        self == &OrganizationPatch::default()
    }
}

impl Organization {
    /// Apply a sparse patch in place, bumping `updated_at`.
    pub fn apply_patch(&mut self, patch: &OrganizationPatch) {
        if let Some(player_type) = patch.player_type {
            self.player_type = player_type;
        }
        if let Some(country) = &patch.country {
            self.country = Some(country.clone());
        }
        if let Some(languages) = &patch.languages {
            self.languages = languages.clone();
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(nif) = &patch.tax_identification_number {
            self.tax_identification_number = Some(nif.clone());
        }
        if let Some(web_url) = &patch.web_url {
            self.web_url = Some(web_url.clone());
        }
        if let Some(activity) = &patch.activity {
            self.activity = Some(activity.clone());
        }
        if let Some(town) = &patch.town {
            self.town = Some(town.clone());
        }
        if let Some(street) = &patch.street {
            self.street = Some(street.clone());
        }
        if let Some(postal_code) = &patch.postal_code {
            self.postal_code = Some(postal_code.clone());
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(fax) = &patch.fax {
            self.fax = Some(fax.clone());
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use uuid::Uuid;

    use super::*;

    fn tender_with_budget(budget: Option<f64>) -> Tender {
        let now = Utc::now();
        Tender {
            id: Uuid::new_v4(),
            slug: "exp-9-limpieza".into(),
            expedient: "EXP-9".into(),
            name: "Servicio de limpieza".into(),
            contract_type: ContractType::Servicios,
            procedure: Procedure::Abierto,
            status: TenderStatus::Publicada,
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
            budget_no_taxes: budget,
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

    #[test]
    fn omitted_fields_are_left_untouched() {
        let mut tender = tender_with_budget(Some(1500.0));
        let patch = TenderPatch {
            name: Some("Servicio de limpieza viaria".into()),
            ..TenderPatch::default()
        };
        tender.apply_patch(&patch);
        assert_eq!(tender.name, "Servicio de limpieza viaria");
        assert_eq!(tender.budget_no_taxes, Some(1500.0));
        assert_eq!(tender.status, TenderStatus::Publicada);
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(TenderPatch::default().is_empty());
        assert!(!TenderPatch {
            budget_no_taxes: Some(0.0),
            ..TenderPatch::default()
        }
        .is_empty());
    }
}
