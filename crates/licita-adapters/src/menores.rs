//! Adapter for the minor-contract announcements feed.
//!
//! Minor contracts are simplified low-value procedures; everything this feed
//! creates or touches is flagged `is_minor_contract`.

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
const CPV_DELIMITER: char = '.';

#[derive(Debug, Clone, Copy)]
pub struct MenoresAdapter;

impl SourceAdapter for MenoresAdapter {
    fn source(&self) -> SourceId {
        SourceId::Menores
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
        draft.is_minor_contract = true;
        draft.trigger_matching = payload.trigger_matching;

        Ok(draft)
    }
}
