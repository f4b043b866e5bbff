//! Adapter for the national platform's preliminary market consultations.
//!
//! Consultations precede a formal procedure: the draft carries a nested
//! consultation record and no status or budget of its own. Attribution
//! shares the platform's canonical source name.

use chrono::{DateTime, Utc};

use licita_core::{Consultation, SourceId, SourcePayload, TenderDraft};

use crate::common::{
    attribution, documents, non_empty, parent_expedient, validate_identity, validate_source_url,
};
use crate::normalize::{parse_yes_no, repair_date, split_code_list};
use crate::vocab::{spanish_contract_type, spanish_procedure};
use crate::{AdapterError, SourceAdapter};

const DATE_OFFSET_HOURS: i64 = 2;
const CPV_DELIMITER: char = '.';

#[derive(Debug, Clone, Copy)]
pub struct ConsultasAdapter;

impl SourceAdapter for ConsultasAdapter {
    fn source(&self) -> SourceId {
        SourceId::Consultas
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
        draft.cpv_code_strings = non_empty(&payload.cpv_codes)
            .map(|raw| split_code_list(raw, CPV_DELIMITER))
            .unwrap_or_default();
        draft.expedient_created_at = non_empty(&payload.expedient_created_at)
            .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS));
        draft.expedient_updated_at = non_empty(&payload.expedient_updated_at)
            .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS));
        draft.contracting_organization_name =
            non_empty(&payload.contracting_organization).map(ToString::to_string);
        draft.documents = documents(&payload.documents, DATE_OFFSET_HOURS);
        draft.country_code = Some("ES".to_string());
        draft.currency_name = Some("Euro".to_string());
        draft.consultation = Some(Consultation {
            name: non_empty(&payload.consultation_name).map(ToString::to_string),
            status: non_empty(&payload.consultation_status).map(ToString::to_string),
            start_date: non_empty(&payload.consultation_start_date)
                .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS)),
            deadline: non_empty(&payload.consultation_deadline)
                .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS)),
            open: non_empty(&payload.consultation_open).and_then(parse_yes_no),
            participants: non_empty(&payload.consultation_participants).map(ToString::to_string),
            selection_type: non_empty(&payload.consultation_selection_type)
                .map(ToString::to_string),
            web_url: non_empty(&payload.consultation_web_url).map(ToString::to_string),
            conditions: non_empty(&payload.consultation_conditions).map(ToString::to_string),
            consultation_created_at: non_empty(&payload.consultation_created_at)
                .and_then(|raw| repair_date(raw, DATE_OFFSET_HOURS)),
        });
        draft.trigger_matching = payload.trigger_matching;

        Ok(draft)
    }
}
