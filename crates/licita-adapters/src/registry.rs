//! Source registry loaded from `sources.yaml`, gating which feeds a
//! deployment ingests from.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use licita_core::SourceId;

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRegistry {
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub source_id: String,
    pub display_name: String,
    pub enabled: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SourceRegistry {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Enabled entries whose id resolves to a known adapter.
    pub fn enabled_sources(&self) -> Vec<SourceId> {
        self.sources
            .iter()
            .filter(|s| s.enabled)
            .filter_map(|s| SourceId::from_slug(&s.source_id))
            .collect()
    }
}
