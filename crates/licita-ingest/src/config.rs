//! Ingestion configuration, built once at startup and passed into the
//! pipeline explicitly.

/// Default acceptance threshold for identity resolution, on the 0–1 distance
/// scale where 0.0 is a perfect match.
pub const DEFAULT_IDENTITY_THRESHOLD: f64 = 0.55;

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Shared credential the scraper processes must present.
    pub api_key: String,
    /// Maximum name-similarity distance at which an incoming payload is
    /// treated as a resubmission of an existing tender.
    pub identity_distance_threshold: f64,
}

impl IngestConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("LICITA_API_KEY").unwrap_or_default(),
            identity_distance_threshold: std::env::var("LICITA_IDENTITY_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_IDENTITY_THRESHOLD),
        }
    }

    /// An unset key authorizes nobody; a scraper is valid only on exact
    /// match.
    pub fn is_authorized(&self, credential: &str) -> bool {
        !self.api_key.is_empty() && credential == self.api_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_rejects_everything() {
        let config = IngestConfig {
            api_key: String::new(),
            identity_distance_threshold: DEFAULT_IDENTITY_THRESHOLD,
        };
        assert!(!config.is_authorized(""));
        assert!(!config.is_authorized("anything"));
    }

    #[test]
    fn exact_match_is_required() {
        let config = IngestConfig {
            api_key: "scraper-key".into(),
            identity_distance_threshold: DEFAULT_IDENTITY_THRESHOLD,
        };
        assert!(config.is_authorized("scraper-key"));
        assert!(!config.is_authorized("scraper-key "));
        assert!(!config.is_authorized("other"));
    }
}
