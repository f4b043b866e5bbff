//! Adapter for the Catalan regional contracting portal. Vocabulary arrives
//! in Catalan, including the status labels, and is translated to the
//! canonical Castilian variants here.

use chrono::{DateTime, Utc};

use licita_core::{ContractType, Procedure, SourceId, SourcePayload, TenderDraft, TenderStatus};

use crate::common::{
    attribution, non_empty, parent_expedient, sheets, validate_identity, validate_source_url,
};
use crate::normalize::{parse_integer_string, parse_price_string, repair_date, slugify, split_code_list};
use crate::{AdapterError, SourceAdapter};

const DATE_OFFSET_HOURS: i64 = 1;
const CPV_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy)]
pub struct GencatAdapter;

fn contract_type(raw: &str) -> ContractType {
    if raw.trim().is_empty() {
        return ContractType::NoDefinido;
    }
    match slugify(raw).as_str() {
        "subministraments" => ContractType::Suministros,
        "serveis" => ContractType::Servicios,
        "obres" => ContractType::Obras,
        "administrativo-especial" => ContractType::AdministrativoEspecial,
        "privado" => ContractType::Privado,
        "gestion-de-servicios-publicos" => ContractType::GestionDeServiciosPublicos,
        "concesion-de-servicios" => ContractType::ConcesionDeServicios,
        "concesion-de-obras-publicas" => ContractType::ConcesionDeObrasPublicas,
        "concesion-de-obras" => ContractType::ConcesionDeObras,
        "patrimonial" => ContractType::Patrimonial,
        _ => ContractType::NoDefinido,
    }
}

fn procedure(raw: &str) -> Procedure {
    if raw.trim().is_empty() {
        return Procedure::Otros;
    }
    match slugify(raw).as_str() {
        "obert" => Procedure::Abierto,
        "obert-simplificat" => Procedure::AbiertoSimplificado,
        "obert-simplificat-abreujat" => Procedure::AbiertoSimplificadoAbreviado,
        "contracte-menor" => Procedure::ContratoMenor,
        "dialeg-competitiu" => Procedure::DialogoCompetitivo,
        "restringit" => Procedure::Restringido,
        "negociat-amb-publicitat" => Procedure::NegociadoConPublicidad,
        "negociat-sense-publicitat" => Procedure::NegociadoSinPublicidad,
        "concurs-de-projectes" => Procedure::ConcursoDeProyectos,
        "basat-en-acord-marc" => Procedure::BasadoEnAcuerdoMarco,
        "derivat-d-acord-marc" => Procedure::DerivadoDeAcuerdoMarco,
        _ => Procedure::Otros,
    }
}

fn status(raw: &str) -> TenderStatus {
    if raw.trim().is_empty() {
        return TenderStatus::NoDefinido;
    }
    match slugify(raw).as_str() {
        "creada" => TenderStatus::Creada,
        "anunci-previ" => TenderStatus::AnuncioPrevio,
        "anunci-de-licitacio" => TenderStatus::AnuncioDeLicitacion,
        "publicada" => TenderStatus::Publicada,
        "evaluacio-previa" => TenderStatus::EvaluacionPrevia,
        "evaluacio" => TenderStatus::Evaluacion,
        "adjudicada" => TenderStatus::Adjudicada,
        "parcialment-adjudicada" => TenderStatus::ParcialmenteAdjudicada,
        "resolucio-provisional" => TenderStatus::ResolucionProvisional,
        "resolta" => TenderStatus::Resuelta,
        "parcialment-resolta" => TenderStatus::ParcialmenteResuelta,
        "desistida" => TenderStatus::Desistida,
        "tancada" => TenderStatus::Cerrada,
        "anulada" => TenderStatus::Anulada,
        "realitzada" => TenderStatus::Realizada,
        "no-definit" => TenderStatus::NoDefinido,
        _ => TenderStatus::NoDefinido,
    }
}

impl SourceAdapter for GencatAdapter {
    fn source(&self) -> SourceId {
        SourceId::Gencat
    }

    fn map(
        &self,
        payload: &SourcePayload,
        received_at: DateTime<Utc>,
    ) -> Result<TenderDraft, AdapterError> {
        validate_identity(self.source(), payload)?;
        validate_source_url(self.source(), payload)?;

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
        draft.status = non_empty(&payload.status).map(status);
        draft.cpv_code_strings = non_empty(&payload.cpv_codes)
            .map(|raw| split_code_list(raw, CPV_DELIMITER))
            .unwrap_or_default();
        draft.location_text = non_empty(&payload.location_text).map(ToString::to_string);
        draft.locations = payload.locations.clone();
        draft.submission_deadline_date = non_empty(&payload.submission_deadline_date)
            .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS));
        draft.expedient_created_at = non_empty(&payload.expedient_created_at)
            .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS));
        draft.expedient_updated_at = non_empty(&payload.expedient_updated_at)
            .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS));
        draft.budget_no_taxes = non_empty(&payload.budget_no_taxes).and_then(parse_price_string);
        draft.contract_estimated_value =
            non_empty(&payload.contract_estimated_value).and_then(parse_price_string);
        draft.award_amount = non_empty(&payload.award_amount).and_then(parse_price_string);
        draft.bidders_number = non_empty(&payload.bidders_number).and_then(parse_integer_string);
        draft.contracting_organization_name =
            non_empty(&payload.contracting_organization).map(ToString::to_string);
        draft.success_bidder_organization_name =
            non_empty(&payload.success_bidder_organization).map(ToString::to_string);
        draft.sheets = sheets(&payload.sheets);
        draft.country_code = Some("ES".to_string());
        draft.currency_name = Some("Euro".to_string());
        draft.trigger_matching = payload.trigger_matching;

        Ok(draft)
    }
}
