//! Ingestion core: taxonomy resolution, fuzzy identity resolution,
//! monotonic reconciliation, and the pipeline facade tying them together.

pub mod config;
pub mod identity;
pub mod pipeline;
pub mod reconcile;
pub mod taxonomy;

pub use config::IngestConfig;
pub use identity::{IdentityResolver, SimilarityScorer, TokenJaroWinkler};
pub use pipeline::{IngestOutcome, IngestPipeline, IngestRequest, OrganizationIngestRequest, RejectReason};
pub use reconcile::Reconciler;
pub use taxonomy::TaxonomyResolver;

pub const CRATE_NAME: &str = "licita-ingest";
