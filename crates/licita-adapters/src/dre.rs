//! Adapter for the Portuguese national gazette. A reduced field set:
//! contract type and money fields only, no status or procedure vocabulary,
//! and sub-lots filed under a parent expedient.

use chrono::{DateTime, Utc};

use licita_core::{ContractType, SourceId, SourcePayload, TenderDraft};

use crate::common::{attribution, non_empty, parent_expedient, validate_identity};
use crate::normalize::{parse_price_string, repair_date, slugify, split_code_list};
use crate::{AdapterError, SourceAdapter};

const DATE_OFFSET_HOURS: i64 = 1;
const CPV_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy)]
pub struct DreAdapter;

fn contract_type(raw: &str) -> ContractType {
    if raw.trim().is_empty() {
        return ContractType::NoDefinido;
    }
    match slugify(raw).as_str() {
        "fornecimentos" => ContractType::Suministros,
        "servicos" => ContractType::Servicios,
        "obras" => ContractType::Obras,
        _ => ContractType::NoDefinido,
    }
}

impl SourceAdapter for DreAdapter {
    fn source(&self) -> SourceId {
        SourceId::Dre
    }

    fn requires_source_url(&self) -> bool {
        false
    }

    fn map(
        &self,
        payload: &SourcePayload,
        received_at: DateTime<Utc>,
    ) -> Result<TenderDraft, AdapterError> {
        validate_identity(self.source(), payload)?;

        let attribution = attribution(self.source(), payload, received_at)?;
        let mut draft = TenderDraft::new(
            self.source(),
            payload.expedient.trim(),
            payload.name.trim(),
            attribution,
        );

        draft.parent_expedient = parent_expedient(payload);
        draft.contract_type = non_empty(&payload.contract_type).map(contract_type);
        draft.cpv_code_strings = non_empty(&payload.cpv_codes)
            .map(|raw| split_code_list(raw, CPV_DELIMITER))
            .unwrap_or_default();
        draft.location_text = non_empty(&payload.location_text).map(ToString::to_string);
        draft.locations = payload.locations.clone();
        draft.expedient_created_at = non_empty(&payload.expedient_created_at)
            .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS));
        draft.expedient_updated_at = non_empty(&payload.expedient_updated_at)
            .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS));
        draft.budget_no_taxes = non_empty(&payload.budget_no_taxes).and_then(parse_price_string);
        draft.contract_estimated_value =
            non_empty(&payload.contract_estimated_value).and_then(parse_price_string);
        draft.contracting_organization_name =
            non_empty(&payload.contracting_organization).map(ToString::to_string);
        draft.country_code = Some("PT".to_string());
        draft.currency_name = Some("Euro".to_string());
        draft.trigger_matching = payload.trigger_matching;

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SourcePayload {
        SourcePayload {
            expedient: "DRE-2024-881".into(),
            parent_expedient: Some("DRE-2024-880".into()),
            name: "Fornecimento de refeições escolares".into(),
            contract_type: Some("Fornecimentos".into()),
            cpv_codes: Some("55523100-3".into()),
            budget_no_taxes: Some("310.000,00".into()),
            contracting_organization: Some("Município de Braga".into()),
            ..SourcePayload::default()
        }
    }

    #[test]
    fn maps_portuguese_contract_types() {
        let draft = DreAdapter.map(&payload(), Utc::now()).unwrap();
        assert_eq!(draft.contract_type, Some(ContractType::Suministros));
        assert_eq!(contract_type("Serviços"), ContractType::Servicios);
        assert_eq!(contract_type("empreitada"), ContractType::NoDefinido);
    }

    #[test]
    fn carries_the_parent_expedient_for_sub_lots() {
        let draft = DreAdapter.map(&payload(), Utc::now()).unwrap();
        assert_eq!(draft.parent_expedient.as_deref(), Some("DRE-2024-880"));
    }

    #[test]
    fn accepts_payloads_without_source_url() {
        assert!(!DreAdapter.requires_source_url());
        assert!(DreAdapter.map(&payload(), Utc::now()).is_ok());
    }
}
