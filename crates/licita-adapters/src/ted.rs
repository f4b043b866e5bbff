//! Adapter for the EU-wide Tenders Electronic Daily feed. Notices reference
//! a parent filing for sub-lots, carry their own currency, and use the EU
//! notice vocabulary for contract types and procedures.

use chrono::{DateTime, Utc};

use licita_core::{ContractType, Procedure, SourceId, SourcePayload, TenderDraft};

use crate::common::{attribution, documents, non_empty, parent_expedient, sheets, validate_identity};
use crate::normalize::{parse_integer_string, parse_price_string, repair_date, slugify, split_code_list};
use crate::vocab::spanish_status;
use crate::{AdapterError, SourceAdapter};

const DATE_OFFSET_HOURS: i64 = 1;
const CPV_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy)]
pub struct TedAdapter;

fn contract_type(raw: &str) -> ContractType {
    if raw.trim().is_empty() {
        return ContractType::NoDefinido;
    }
    match slugify(raw).as_str() {
        "contratos-combinados" => ContractType::ContratosCombinados,
        "suministros" => ContractType::Suministros,
        "obras" => ContractType::Obras,
        "servicios" => ContractType::Servicios,
        "no-procede" => ContractType::NoDefinido,
        _ => ContractType::NoDefinido,
    }
}

fn procedure(raw: &str) -> Procedure {
    if raw.trim().is_empty() {
        return Procedure::Otros;
    }
    match slugify(raw).as_str() {
        "procedimiento-abierto" => Procedure::Abierto,
        "adjudicacion-de-concesion-sin-anuncio-previo-de-concesion" => Procedure::Adjudicacion,
        "adjudicacion-de-contrato-sin-publicacion-previa" => Procedure::Adjudicacion,
        "adjudicacion-directa" => Procedure::Adjudicacion,
        "procedimiento-de-adjudicacion-de-concesion" => Procedure::Adjudicacion,
        "asociacion-para-la-innovacion" => Procedure::AsociacionParaLaInnovacion,
        "dialogo-competitivo" => Procedure::DialogoCompetitivo,
        "licitacion-publica" => Procedure::LicitacionPublica,
        "procedimiento-de-licitacion-con-negociacion" => Procedure::LicitacionConNegociacion,
        "procedimiento-negociado-sin-convocatoria-de-licitacion" => {
            Procedure::NegociadoSinPublicidad
        }
        "prodecimiento-negociado" => Procedure::NegociadoConPublicidad,
        "procedimiento-restringido" => Procedure::Restringido,
        "otro-procedimiento-de-multiples-etapas" => Procedure::Otros,
        "otro-procedimiento-de-una-sola-etapa" => Procedure::Otros,
        "no-procede" => Procedure::NoDefinido,
        _ => Procedure::Otros,
    }
}

impl SourceAdapter for TedAdapter {
    fn source(&self) -> SourceId {
        SourceId::Ted
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
        draft.procedure = non_empty(&payload.procedure).map(procedure);
        draft.status = non_empty(&payload.status).map(spanish_status);
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
        draft.award_amount = non_empty(&payload.award_amount).and_then(parse_price_string);
        draft.bidders_number = non_empty(&payload.bidders_number).and_then(parse_integer_string);
        draft.contracting_organization_name =
            non_empty(&payload.contracting_organization).map(ToString::to_string);
        draft.success_bidder_organization_name =
            non_empty(&payload.success_bidder_organization).map(ToString::to_string);
        draft.documents = documents(&payload.documents, DATE_OFFSET_HOURS);
        draft.sheets = sheets(&payload.sheets);
        // TED spans member states; the notice names its own currency.
        draft.currency_name = non_empty(&payload.currency).map(ToString::to_string);
        draft.trigger_matching = payload.trigger_matching;

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SourcePayload {
        SourcePayload {
            expedient: "123456-2024".into(),
            parent_expedient: Some("120000-2024".into()),
            name: "Supply of laboratory reagents".into(),
            contract_type: Some("Suministros".into()),
            procedure: Some("Procedimiento abierto".into()),
            cpv_codes: Some("33696500-0, 38000000-5".into()),
            currency: Some("Euro".into()),
            budget_no_taxes: Some("2.400.000,00".into()),
            ..SourcePayload::default()
        }
    }

    #[test]
    fn maps_eu_notice_vocabulary() {
        let draft = TedAdapter.map(&payload(), Utc::now()).unwrap();
        assert_eq!(draft.contract_type, Some(ContractType::Suministros));
        assert_eq!(draft.procedure, Some(Procedure::Abierto));
        assert_eq!(procedure("Adjudicación directa"), Procedure::Adjudicacion);
        assert_eq!(
            procedure("Otro procedimiento de una sola etapa"),
            Procedure::Otros
        );
        assert_eq!(contract_type("Contratos combinados"), ContractType::ContratosCombinados);
    }

    #[test]
    fn currency_comes_from_the_notice_not_a_fixed_default() {
        let draft = TedAdapter.map(&payload(), Utc::now()).unwrap();
        assert_eq!(draft.currency_name.as_deref(), Some("Euro"));
        assert_eq!(draft.country_code, None);

        let mut other = payload();
        other.currency = Some("Danish Krone".into());
        let draft = TedAdapter.map(&other, Utc::now()).unwrap();
        assert_eq!(draft.currency_name.as_deref(), Some("Danish Krone"));
    }

    #[test]
    fn accepts_payloads_without_source_url() {
        assert!(!TedAdapter.requires_source_url());
        assert!(TedAdapter.map(&payload(), Utc::now()).is_ok());
    }
}
