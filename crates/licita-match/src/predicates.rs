//! The individual match predicates and their combination.
//!
//! Vacuous-truth rules differ per predicate and are deliberate: an empty
//! keyword list is false (keyword OR CPV must supply a positive signal), an
//! empty allowed-location or allowed-status set is true, and the empty
//! contractor allow-list is governed by [`MatchPolicy`].

use licita_core::{CpvRef, MatchParameters, Tender};

use crate::engine::MatchPolicy;

fn name_contains_any(name: &str, words: &[String]) -> bool {
    let haystack = name.to_lowercase();
    words
        .iter()
        .any(|word| haystack.contains(&word.to_lowercase()))
}

fn cpv_intersects(tender_cpvs: &[CpvRef], criteria_cpvs: &[CpvRef]) -> bool {
    tender_cpvs
        .iter()
        .any(|tc| criteria_cpvs.iter().any(|cc| cc.code == tc.code))
}

/// Strictly-between budget check; a tender with no budget value at all is
/// never excluded on price.
fn in_budget(budget: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(budget) = budget else {
        return true;
    };
    let min = min.unwrap_or(0.0);
    match max {
        Some(max) => budget > min && budget < max,
        None => budget > min,
    }
}

fn location_intersects(tender_entries: &[String], criteria_locations: &[String]) -> bool {
    criteria_locations
        .iter()
        .any(|loc| tender_entries.iter().any(|entry| entry == loc))
}

/// All predicates combined:
/// `(keyword OR cpv) AND NOT excludeWords AND NOT excludedCpv AND contractors
///  AND inBudget AND NOT excludedLocations AND inLocation AND status`.
pub fn matches_parameters(
    tender: &Tender,
    parameters: &MatchParameters,
    policy: MatchPolicy,
) -> bool {
    let keyword = name_contains_any(&tender.name, &parameters.keywords);
    let cpv = cpv_intersects(&tender.cpv_codes, &parameters.cpv_codes);
    if !(keyword || cpv) {
        return false;
    }

    if name_contains_any(&tender.name, &parameters.exclude_words) {
        return false;
    }
    if cpv_intersects(&tender.cpv_codes, &parameters.excluded_cpv_codes) {
        return false;
    }

    let contractors_allow = if parameters.contractors.is_empty() {
        policy.empty_contractor_list_matches
    } else {
        tender.contracting_organization.as_ref().is_some_and(|org| {
            parameters.contractors.iter().any(|c| c.id == org.id)
        })
    };
    if !contractors_allow {
        return false;
    }

    if !in_budget(
        tender.budget_no_taxes,
        parameters.min_budget_no_taxes,
        parameters.max_budget_no_taxes,
    ) {
        return false;
    }

    let tender_locations = tender.location_entries();
    if location_intersects(&tender_locations, &parameters.excluded_locations) {
        return false;
    }
    if !parameters.locations.is_empty()
        && !location_intersects(&tender_locations, &parameters.locations)
    {
        return false;
    }

    parameters.status.is_empty() || parameters.status.contains(&tender.status)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use licita_core::{ContractType, OrganizationRef, Procedure, TenderStatus};
    use uuid::Uuid;

    use super::*;

    fn cpv(code: &str) -> CpvRef {
        CpvRef {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: format!("CPV {code}"),
        }
    }

    fn tender(name: &str, cpv_codes: Vec<CpvRef>) -> Tender {
        let now = Utc::now();
        Tender {
            id: Uuid::new_v4(),
            slug: "t".into(),
            expedient: "EXP".into(),
            name: name.to_string(),
            contract_type: ContractType::Obras,
            procedure: Procedure::Abierto,
            status: TenderStatus::Publicada,
            cpv_codes,
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
            budget_no_taxes: None,
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

    fn open_policy() -> MatchPolicy {
        MatchPolicy {
            empty_contractor_list_matches: true,
        }
    }

    fn keyword_params(word: &str) -> MatchParameters {
        MatchParameters {
            keywords: vec![word.to_string()],
            ..MatchParameters::default()
        }
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let tender = tender("Construcción de puente peatonal", vec![]);
        assert!(matches_parameters(
            &tender,
            &keyword_params("PUENTE"),
            open_policy()
        ));
        assert!(!matches_parameters(
            &tender,
            &keyword_params("carretera"),
            open_policy()
        ));
    }

    #[test]
    fn empty_keyword_list_needs_a_cpv_signal() {
        let tender = tender("Suministro de papel", vec![cpv("30000000")]);
        let no_signal = MatchParameters::default();
        assert!(!matches_parameters(&tender, &no_signal, open_policy()));

        let cpv_signal = MatchParameters {
            cpv_codes: vec![cpv("30000000")],
            ..MatchParameters::default()
        };
        assert!(matches_parameters(&tender, &cpv_signal, open_policy()));
    }

    #[test]
    fn cpv_inclusion_compares_codes() {
        let matching = tender("Obras varias", vec![cpv("45000000")]);
        let other = tender("Obras varias", vec![cpv("30000000")]);
        let params = MatchParameters {
            cpv_codes: vec![cpv("45000000")],
            ..MatchParameters::default()
        };
        assert!(matches_parameters(&matching, &params, open_policy()));
        assert!(!matches_parameters(&other, &params, open_policy()));
    }

    #[test]
    fn excluded_cpv_vetoes() {
        let tender = tender("Obras de demolición", vec![cpv("45000000"), cpv("45110000")]);
        let params = MatchParameters {
            keywords: vec!["obras".into()],
            excluded_cpv_codes: vec![cpv("45110000")],
            ..MatchParameters::default()
        };
        assert!(!matches_parameters(&tender, &params, open_policy()));
    }

    #[test]
    fn exclude_words_veto() {
        let tender = tender("Servicio de limpieza hospitalaria", vec![]);
        let params = MatchParameters {
            keywords: vec!["limpieza".into()],
            exclude_words: vec!["hospitalaria".into()],
            ..MatchParameters::default()
        };
        assert!(!matches_parameters(&tender, &params, open_policy()));
    }

    #[test]
    fn budget_is_strictly_between_and_vacuous_when_absent() {
        let mut priced = tender("Obras", vec![]);
        priced.budget_no_taxes = Some(100.0);
        let params = MatchParameters {
            keywords: vec!["obras".into()],
            min_budget_no_taxes: Some(100.0),
            ..MatchParameters::default()
        };
        // 100 is not strictly greater than the minimum of 100.
        assert!(!matches_parameters(&priced, &params, open_policy()));

        priced.budget_no_taxes = Some(100.01);
        assert!(matches_parameters(&priced, &params, open_policy()));

        priced.budget_no_taxes = None;
        assert!(matches_parameters(&priced, &params, open_policy()));

        priced.budget_no_taxes = Some(5_000_000.0);
        let capped = MatchParameters {
            keywords: vec!["obras".into()],
            max_budget_no_taxes: Some(1_000_000.0),
            ..MatchParameters::default()
        };
        assert!(!matches_parameters(&priced, &capped, open_policy()));
    }

    #[test]
    fn empty_location_sets_are_vacuously_true() {
        let mut tender = tender("Obras de urbanización", vec![]);
        tender.locations.insert("country".into(), "España".into());
        let params = keyword_params("obras");
        assert!(matches_parameters(&tender, &params, open_policy()));
    }

    #[test]
    fn location_inclusion_and_exclusion_use_key_value_entries() {
        let mut tender = tender("Obras de urbanización", vec![]);
        tender.locations.insert("province".into(), "Sevilla".into());

        let include = MatchParameters {
            keywords: vec!["obras".into()],
            locations: vec!["province/Sevilla".into()],
            ..MatchParameters::default()
        };
        assert!(matches_parameters(&tender, &include, open_policy()));

        let include_other = MatchParameters {
            keywords: vec!["obras".into()],
            locations: vec!["province/Madrid".into()],
            ..MatchParameters::default()
        };
        assert!(!matches_parameters(&tender, &include_other, open_policy()));

        let exclude = MatchParameters {
            keywords: vec!["obras".into()],
            excluded_locations: vec!["province/Sevilla".into()],
            ..MatchParameters::default()
        };
        assert!(!matches_parameters(&tender, &exclude, open_policy()));
    }

    #[test]
    fn status_set_is_vacuous_when_empty() {
        let tender = tender("Obras de acceso", vec![]);
        let open_status = MatchParameters {
            keywords: vec!["obras".into()],
            status: vec![],
            ..MatchParameters::default()
        };
        assert!(matches_parameters(&tender, &open_status, open_policy()));

        let awarded_only = MatchParameters {
            keywords: vec!["obras".into()],
            status: vec![TenderStatus::Adjudicada],
            ..MatchParameters::default()
        };
        assert!(!matches_parameters(&tender, &awarded_only, open_policy()));
    }

    #[test]
    fn contractor_list_policy_is_explicit() {
        let org = OrganizationRef {
            id: Uuid::new_v4(),
            slug: "ayto-madrid".into(),
            name: "Ayuntamiento de Madrid".into(),
        };
        let mut tender = tender("Obras de asfaltado", vec![]);
        tender.contracting_organization = Some(org.clone());

        let params = keyword_params("obras");
        let strict = MatchPolicy {
            empty_contractor_list_matches: false,
        };
        assert!(!matches_parameters(&tender, &params, strict));
        assert!(matches_parameters(&tender, &params, open_policy()));

        let listed = MatchParameters {
            keywords: vec!["obras".into()],
            contractors: vec![org],
            ..MatchParameters::default()
        };
        assert!(matches_parameters(&tender, &listed, strict));

        let other = MatchParameters {
            keywords: vec!["obras".into()],
            contractors: vec![OrganizationRef {
                id: Uuid::new_v4(),
                slug: "otro".into(),
                name: "Otro".into(),
            }],
            ..MatchParameters::default()
        };
        assert!(!matches_parameters(&tender, &other, strict));
    }
}
