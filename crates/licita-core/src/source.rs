//! Canonical identities of the government feeds Licita ingests from.

use serde::{Deserialize, Serialize};

/// One of the supported announcement feeds.
///
/// The canonical name is what appears in a tender's source attributions;
/// attribution is idempotent per canonical name, so two feeds sharing a
/// platform (the national platform and its preliminary-consultation feed)
/// deliberately share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    /// Plataforma de Contratación del Sector Público.
    Placsp,
    /// Preliminary market consultations on the national platform.
    Consultas,
    /// Minor-contract announcements.
    Menores,
    /// Boletín Oficial del Estado.
    Boe,
    /// Catalan regional contracting portal.
    Gencat,
    /// Diário da República Electrónico.
    Dre,
    /// Tenders Electronic Daily (EU-wide feed).
    Ted,
}

impl SourceId {
    pub const ALL: [SourceId; 7] = [
        SourceId::Placsp,
        SourceId::Consultas,
        SourceId::Menores,
        SourceId::Boe,
        SourceId::Gencat,
        SourceId::Dre,
        SourceId::Ted,
    ];

    pub fn canonical_name(self) -> &'static str {
        match self {
            SourceId::Placsp | SourceId::Consultas => {
                "Plataforma de Contratación del Sector Público"
            }
            SourceId::Menores => "Contratos Menores",
            SourceId::Boe => "Boletín Oficial del Estado",
            SourceId::Gencat => "Gencat",
            SourceId::Dre => "Diário da República Electrónico",
            SourceId::Ted => "Tenders Electronic Daily",
        }
    }

    pub fn country(self) -> &'static str {
        match self {
            SourceId::Placsp
            | SourceId::Consultas
            | SourceId::Menores
            | SourceId::Boe
            | SourceId::Gencat => "Spain",
            SourceId::Dre => "Portugal",
            SourceId::Ted => "Europe",
        }
    }

    /// Registry identifier used in configuration files and CLI arguments.
    pub fn slug(self) -> &'static str {
        match self {
            SourceId::Placsp => "placsp",
            SourceId::Consultas => "consultas",
            SourceId::Menores => "menores",
            SourceId::Boe => "boe",
            SourceId::Gencat => "gencat",
            SourceId::Dre => "dre",
            SourceId::Ted => "ted",
        }
    }

    pub fn from_slug(slug: &str) -> Option<SourceId> {
        SourceId::ALL.into_iter().find(|s| s.slug() == slug)
    }
}
