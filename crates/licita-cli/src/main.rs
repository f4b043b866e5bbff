//! Command-line front end: drives the ingest pipeline over payload files on
//! disk against the in-memory reference store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use licita_adapters::normalize::slugify;
use licita_adapters::SourceRegistry;
use licita_core::{Country, Currency, SourceId, SourcePayload};
use licita_ingest::{IngestConfig, IngestOutcome, IngestPipeline, IngestRequest};
use licita_match::{LoggingDispatcher, MatchEngine, MatchPolicy};
use licita_store::MemoryStore;

#[derive(Debug, Parser)]
#[command(name = "licita-cli")]
#[command(about = "Licita tender ingestion command-line interface")]
struct Cli {
    /// Source registry file.
    #[arg(long, default_value = "sources.yaml")]
    registry: PathBuf,

    /// Optional reference-data seed file (CPV codes, countries, currencies).
    #[arg(long)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest a single payload file through one source adapter.
    Ingest {
        /// Registry id of the source feed (e.g. `menores`, `boe`).
        #[arg(long)]
        source: String,
        /// JSON payload file as delivered by the scraper.
        #[arg(long)]
        payload: PathBuf,
    },
    /// Ingest every `<source>__*.json` payload file in a directory, gated by
    /// the registry's enabled flags.
    Batch {
        #[arg(long, default_value = "payloads")]
        dir: PathBuf,
    },
    /// List the configured sources.
    Sources,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SeedFile {
    cpvs: Vec<SeedCpv>,
    countries: Vec<SeedCountry>,
    currencies: Vec<SeedCurrency>,
}

#[derive(Debug, Deserialize)]
struct SeedCpv {
    code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SeedCountry {
    code: String,
    name: String,
    #[serde(default)]
    iso_code: String,
}

#[derive(Debug, Deserialize)]
struct SeedCurrency {
    name: String,
    #[serde(default)]
    iso_code: String,
    #[serde(default)]
    symbol: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = IngestConfig::from_env();

    match cli.command {
        Commands::Ingest { source, payload } => {
            let store = seeded_store(cli.seed.as_deref()).await?;
            let pipeline = build_pipeline(config.clone(), store);
            let outcome = ingest_file(&pipeline, &config, &source, &payload).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Batch { dir } => {
            let registry = SourceRegistry::load(&cli.registry)?;
            let store = seeded_store(cli.seed.as_deref()).await?;
            let pipeline = build_pipeline(config.clone(), store.clone());
            let summary = ingest_directory(&pipeline, &config, &registry, &dir).await?;
            println!(
                "batch complete: files={} created={} updated={} rejected={} tenders={}",
                summary.files,
                summary.created,
                summary.updated,
                summary.rejected,
                store.tender_count().await
            );
        }
        Commands::Sources => {
            let registry = SourceRegistry::load(&cli.registry)?;
            for source in &registry.sources {
                println!(
                    "{:<12} {:<45} enabled={}",
                    source.source_id, source.display_name, source.enabled
                );
            }
        }
    }

    Ok(())
}

fn build_pipeline(config: IngestConfig, store: Arc<MemoryStore>) -> IngestPipeline {
    let matcher = MatchEngine::new(
        store.clone(),
        store.clone(),
        Arc::new(LoggingDispatcher),
        MatchPolicy::from_env(),
    );
    IngestPipeline::new(
        config,
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    )
    .with_matcher(Arc::new(matcher))
}

async fn seeded_store(seed: Option<&Path>) -> Result<Arc<MemoryStore>> {
    let store = Arc::new(MemoryStore::new());
    let Some(path) = seed else {
        return Ok(store);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let seed: SeedFile =
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    for cpv in &seed.cpvs {
        store.seed_cpv(&cpv.code, &cpv.name).await;
    }
    for country in seed.countries {
        store
            .seed_country(Country {
                id: Uuid::new_v4(),
                slug: slugify(&country.name),
                name: country.name,
                code: country.code,
                iso_code: country.iso_code,
            })
            .await;
    }
    for currency in seed.currencies {
        store
            .seed_currency(Currency {
                id: Uuid::new_v4(),
                slug: slugify(&currency.name),
                name: currency.name,
                iso_code: currency.iso_code,
                symbol: currency.symbol,
            })
            .await;
    }
    Ok(store)
}

async fn ingest_file(
    pipeline: &IngestPipeline,
    config: &IngestConfig,
    source: &str,
    path: &Path,
) -> Result<IngestOutcome> {
    let Some(source) = SourceId::from_slug(source) else {
        bail!("unknown source `{source}`");
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let payload: SourcePayload =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(pipeline
        .ingest(
            source,
            IngestRequest {
                credential: config.api_key.clone(),
                payload,
            },
        )
        .await)
}

#[derive(Debug, Default)]
struct BatchSummary {
    files: usize,
    created: usize,
    updated: usize,
    rejected: usize,
}

async fn ingest_directory(
    pipeline: &IngestPipeline,
    config: &IngestConfig,
    registry: &SourceRegistry,
    dir: &Path,
) -> Result<BatchSummary> {
    let enabled = registry.enabled_sources();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    let mut summary = BatchSummary::default();
    for path in entries {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(slug) = stem.split("__").next() else {
            continue;
        };
        let Some(source) = SourceId::from_slug(slug) else {
            tracing::warn!(file = %path.display(), "no adapter for payload file, skipping");
            continue;
        };
        if !enabled.contains(&source) {
            tracing::warn!(file = %path.display(), "source disabled in registry, skipping");
            continue;
        }
        summary.files += 1;
        match ingest_file(pipeline, config, source.slug(), &path).await? {
            IngestOutcome::Created { .. } => summary.created += 1,
            IngestOutcome::Updated { .. } => summary.updated += 1,
            IngestOutcome::Rejected { .. } => summary.rejected += 1,
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use licita_ingest::config::DEFAULT_IDENTITY_THRESHOLD;

    use super::*;

    const SEED: &str = "\
cpvs:
  - code: \"45000000\"
    name: Trabajos de construcción
countries:
  - code: ES
    name: Spain
    iso_code: ESP
currencies:
  - name: Euro
    iso_code: EUR
    symbol: \"€\"
";

    const REGISTRY: &str = "\
sources:
  - source_id: menores
    display_name: Contratos Menores
    enabled: true
  - source_id: boe
    display_name: Boletín Oficial del Estado
    enabled: false
";

    fn test_config() -> IngestConfig {
        IngestConfig {
            api_key: "cli-key".into(),
            identity_distance_threshold: DEFAULT_IDENTITY_THRESHOLD,
        }
    }

    fn payload_json(expedient: &str) -> String {
        format!(
            r#"{{
  "expedient": "{expedient}",
  "name": "Reparación de cubiertas",
  "status": "Publicada",
  "cpvCodes": "45000000-7",
  "sourceUrl": "https://contrataciones.example.es/{expedient}",
  "expedientUpdatedAt": "10/01/2024 10:00",
  "budgetNoTaxes": "9.000,00 €"
}}"#
        )
    }

    #[tokio::test]
    async fn ingest_file_runs_a_payload_through_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("reference.yaml");
        std::fs::write(&seed_path, SEED).unwrap();
        let payload_path = dir.path().join("menores__cm-1.json");
        std::fs::write(&payload_path, payload_json("CM-1")).unwrap();

        let config = test_config();
        let store = seeded_store(Some(seed_path.as_path())).await.unwrap();
        let pipeline = build_pipeline(config.clone(), store.clone());

        let outcome = ingest_file(&pipeline, &config, "menores", &payload_path)
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Created { .. }));
        assert_eq!(store.tender_count().await, 1);
    }

    #[tokio::test]
    async fn batch_skips_disabled_and_unknown_sources() {
        let dir = tempfile::tempdir().unwrap();
        let registry_path = dir.path().join("sources.yaml");
        std::fs::write(&registry_path, REGISTRY).unwrap();
        let payloads = dir.path().join("payloads");
        std::fs::create_dir(&payloads).unwrap();
        std::fs::write(payloads.join("menores__a.json"), payload_json("CM-10")).unwrap();
        std::fs::write(payloads.join("boe__b.json"), payload_json("BOE-11")).unwrap();
        std::fs::write(payloads.join("mystery__c.json"), payload_json("X-12")).unwrap();

        let config = test_config();
        let registry = SourceRegistry::load(&registry_path).unwrap();
        let store = seeded_store(None).await.unwrap();
        let pipeline = build_pipeline(config.clone(), store.clone());

        let summary = ingest_directory(&pipeline, &config, &registry, &payloads)
            .await
            .unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.rejected, 0);
        assert_eq!(store.tender_count().await, 1);
    }

    #[test]
    fn seed_file_shape_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let seed: SeedFile = serde_yaml::from_str(&text).unwrap();
        assert_eq!(seed.cpvs.len(), 1);
        assert_eq!(seed.countries[0].code, "ES");
        assert_eq!(seed.currencies[0].name, "Euro");
    }
}
