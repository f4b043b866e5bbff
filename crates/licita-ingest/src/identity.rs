//! Fuzzy identity resolution: decide whether an incoming payload is a
//! resubmission of a stored tender or a new procedure.
//!
//! Expedient identifiers are inconsistently formatted across feeds and
//! sometimes reused, so the expedient only scopes the candidate pool; the
//! declared name is the deciding signal.

use std::cmp::Ordering;

use strsim::jaro_winkler;

use licita_core::Tender;

/// Name-similarity distance: 0.0 is a perfect match, 1.0 entirely
/// unrelated. A candidate is accepted when its distance is at or below the
/// configured threshold.
pub trait SimilarityScorer: Send + Sync {
    fn distance(&self, left: &str, right: &str) -> f64;
}

/// Default scorer: fuzzy token overlap weighted with whole-string
/// Jaro–Winkler. Token overlap dominates so that two names sharing only
/// filler words ("de", "el") stay far apart, while a typo inside one token
/// barely moves the score.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenJaroWinkler;

const TOKEN_MATCH_SIMILARITY: f64 = 0.9;
const TOKEN_OVERLAP_WEIGHT: f64 = 0.7;
const FULL_STRING_WEIGHT: f64 = 0.3;

fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_overlap(left: &str, right: &str) -> f64 {
    let left_tokens: Vec<&str> = left.split_whitespace().collect();
    let right_tokens: Vec<&str> = right.split_whitespace().collect();
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0.0;
    }
    let shared = left_tokens
        .iter()
        .filter(|lt| {
            right_tokens
                .iter()
                .any(|rt| jaro_winkler(lt, rt) >= TOKEN_MATCH_SIMILARITY)
        })
        .count();
    let union = left_tokens.len() + right_tokens.len() - shared;
    shared as f64 / union as f64
}

impl SimilarityScorer for TokenJaroWinkler {
    fn distance(&self, left: &str, right: &str) -> f64 {
        let left = normalize(left);
        let right = normalize(right);
        if left == right {
            return 0.0;
        }
        let overlap = token_overlap(&left, &right);
        let full = jaro_winkler(&left, &right);
        1.0 - (TOKEN_OVERLAP_WEIGHT * overlap + FULL_STRING_WEIGHT * full)
    }
}

pub struct IdentityResolver {
    scorer: Box<dyn SimilarityScorer>,
    threshold: f64,
}

impl IdentityResolver {
    pub fn new(threshold: f64) -> Self {
        Self {
            scorer: Box::new(TokenJaroWinkler),
            threshold,
        }
    }

    pub fn with_scorer(scorer: Box<dyn SimilarityScorer>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    /// Best-scoring candidate at or below the threshold, or `None` when the
    /// payload names a new procedure. Ambiguity above the threshold is not
    /// an error; it deliberately produces a new tender.
    pub fn best_match<'t>(&self, name: &str, candidates: &'t [Tender]) -> Option<&'t Tender> {
        candidates
            .iter()
            .map(|tender| (self.scorer.distance(name, &tender.name), tender))
            .filter(|(distance, _)| *distance <= self.threshold)
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map(|(_, tender)| tender)
    }
}
