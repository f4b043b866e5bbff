//! Source adapter contracts and the seven per-feed implementations.
//!
//! An adapter is a pure mapping from one feed's raw payload into a
//! [`TenderDraft`]: vocabulary translation, date/price normalization and
//! mandatory-field validation happen here; every store access lives in the
//! ingest pipeline. Unknown vocabulary never blocks ingestion; it maps to
//! the documented default instead.

pub mod boe;
pub mod common;
pub mod consultas;
pub mod dre;
pub mod gencat;
pub mod menores;
pub mod normalize;
pub mod placsp;
pub mod registry;
pub mod ted;
pub mod vocab;

use chrono::{DateTime, Utc};
use thiserror::Error;

use licita_core::{SourceId, SourcePayload, TenderDraft};

pub use registry::{SourceConfig, SourceRegistry};

pub const CRATE_NAME: &str = "licita-adapters";

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("missing mandatory field `{field}` for source {source_name}")]
    MissingField {
        source_name: &'static str,
        field: &'static str,
    },
    #[error("{0}")]
    Message(String),
}

pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> SourceId;

    /// Whether this feed must carry a source URL for a payload to be
    /// accepted at all.
    fn requires_source_url(&self) -> bool {
        true
    }

    /// Translate a raw payload into the normalized draft. Pure; `received_at`
    /// stamps the source attribution.
    fn map(
        &self,
        payload: &SourcePayload,
        received_at: DateTime<Utc>,
    ) -> Result<TenderDraft, AdapterError>;
}

pub fn adapter_for_source(source: SourceId) -> Box<dyn SourceAdapter> {
    match source {
        SourceId::Placsp => Box::new(placsp::PlacspAdapter),
        SourceId::Consultas => Box::new(consultas::ConsultasAdapter),
        SourceId::Menores => Box::new(menores::MenoresAdapter),
        SourceId::Boe => Box::new(boe::BoeAdapter),
        SourceId::Gencat => Box::new(gencat::GencatAdapter),
        SourceId::Dre => Box::new(dre::DreAdapter),
        SourceId::Ted => Box::new(ted::TedAdapter),
    }
}

pub fn all_adapters() -> Vec<Box<dyn SourceAdapter>> {
    SourceId::ALL.into_iter().map(adapter_for_source).collect()
}
