//! Adapter for the state gazette feed, which mostly reports award outcomes:
//! bidder counts, award amounts and winning organizations.

use chrono::{DateTime, Utc};

use licita_core::{SourceId, SourcePayload, TenderDraft};

use crate::common::{
    attribution, documents, non_empty, parent_expedient, sheets, validate_identity,
    validate_source_url,
};
use crate::normalize::{parse_integer_string, parse_price_string, repair_date, split_code_list};
use crate::vocab::{spanish_contract_type, spanish_procedure, spanish_status};
use crate::{AdapterError, SourceAdapter};

const DATE_OFFSET_HOURS: i64 = 1;
const CPV_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy)]
pub struct BoeAdapter;

impl SourceAdapter for BoeAdapter {
    fn source(&self) -> SourceId {
        SourceId::Boe
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
        draft.contract_type = non_empty(&payload.contract_type).map(spanish_contract_type);
        draft.procedure = non_empty(&payload.procedure).map(spanish_procedure);
        draft.status = non_empty(&payload.status).map(spanish_status);
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
        draft.result = non_empty(&payload.result).map(ToString::to_string);
        draft.contracting_organization_name =
            non_empty(&payload.contracting_organization).map(ToString::to_string);
        draft.success_bidder_organization_name =
            non_empty(&payload.success_bidder_organization).map(ToString::to_string);
        draft.documents = documents(&payload.documents, DATE_OFFSET_HOURS);
        draft.sheets = sheets(&payload.sheets);
        draft.country_code = Some("ES".to_string());
        draft.currency_name = Some("Euro".to_string());
        draft.trigger_matching = payload.trigger_matching;

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use licita_core::TenderStatus;

    use super::*;

    fn payload() -> SourcePayload {
        SourcePayload {
            expedient: "BOE-B-2024-5521".into(),
            name: "Obras de rehabilitación del puente de hierro".into(),
            status: Some("Adjudicada".into()),
            cpv_codes: Some("45221119-9, 45262690-4".into()),
            source_url: Some("https://boe.example.es/b-2024-5521".into()),
            bidders_number: Some("7 ofertas".into()),
            award_amount: Some("842.310,55 €".into()),
            success_bidder_organization: Some("Construcciones Valbuena SA".into()),
            expedient_updated_at: Some("20/05/2024 07:45".into()),
            ..SourcePayload::default()
        }
    }

    #[test]
    fn maps_award_reports() {
        let draft = BoeAdapter.map(&payload(), Utc::now()).unwrap();
        assert_eq!(draft.status, Some(TenderStatus::Adjudicada));
        assert!(draft.is_adjudication());
        assert_eq!(draft.bidders_number, Some(7));
        assert_eq!(draft.award_amount, Some(842_310.55));
        assert_eq!(
            draft.success_bidder_organization_name.as_deref(),
            Some("Construcciones Valbuena SA")
        );
        assert_eq!(draft.cpv_code_strings, vec!["452211199", "452626904"]);
    }

    #[test]
    fn rejects_payloads_without_source_url() {
        let mut bad = payload();
        bad.source_url = None;
        assert!(BoeAdapter.map(&bad, Utc::now()).is_err());
    }
}
