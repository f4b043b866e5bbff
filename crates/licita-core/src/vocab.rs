//! Closed vocabularies shared by every source feed.
//!
//! The canonical labels are the Castilian forms used by the national
//! contracting platform; adapters translate their local vocabulary into
//! these variants and fall back to the documented default on a miss.

use serde::{Deserialize, Serialize};

/// Contract type of a procurement procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContractType {
    #[serde(rename = "Suministros")]
    Suministros,
    #[serde(rename = "Servicios")]
    Servicios,
    #[serde(rename = "Obras")]
    Obras,
    #[serde(rename = "Administrativo especial")]
    AdministrativoEspecial,
    #[serde(rename = "Privado")]
    Privado,
    #[serde(rename = "Gestión de Servicios Públicos")]
    GestionDeServiciosPublicos,
    #[serde(rename = "Concesión de Servicios")]
    ConcesionDeServicios,
    #[serde(rename = "Concesión de Obras Públicas")]
    ConcesionDeObrasPublicas,
    #[serde(rename = "Concesión de Obras")]
    ConcesionDeObras,
    #[serde(rename = "Colaboración entre el sector público y sector privado")]
    ColaboracionPublicoPrivada,
    #[serde(rename = "Patrimonial")]
    Patrimonial,
    #[serde(rename = "Contratos Combinados")]
    ContratosCombinados,
    #[default]
    #[serde(rename = "No definido")]
    NoDefinido,
}

/// Award procedure of a procurement procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Procedure {
    #[serde(rename = "Abierto")]
    Abierto,
    #[serde(rename = "Abierto simplificado")]
    AbiertoSimplificado,
    #[serde(rename = "Abierto simplificado abreviado")]
    AbiertoSimplificadoAbreviado,
    #[serde(rename = "Abierto acelerado")]
    AbiertoAcelerado,
    #[serde(rename = "Abierto simplificado acelerado")]
    AbiertoSimplificadoAcelerado,
    #[serde(rename = "Adjudicación")]
    Adjudicacion,
    #[serde(rename = "Asociación para la innovación")]
    AsociacionParaLaInnovacion,
    #[serde(rename = "Basado en Acuerdo Marco")]
    BasadoEnAcuerdoMarco,
    #[serde(rename = "Basado en sistema dinámico de adquisición")]
    BasadoEnSistemaDinamicoDeAdquisicion,
    #[serde(rename = "Concurso de proyectos")]
    ConcursoDeProyectos,
    #[serde(rename = "Derivado de asociación para la innovación")]
    DerivadoDeAsociacionParaLaInnovacion,
    #[serde(rename = "Derivado de acuerdo marco")]
    DerivadoDeAcuerdoMarco,
    #[serde(rename = "Diálogo competitivo")]
    DialogoCompetitivo,
    #[serde(rename = "Instrucción interna de contratación")]
    InstruccionInternaDeContratacion,
    #[serde(rename = "Licitación pública")]
    LicitacionPublica,
    #[serde(rename = "Licitación con negociación")]
    LicitacionConNegociacion,
    #[serde(rename = "Negociado con publicidad")]
    NegociadoConPublicidad,
    #[serde(rename = "Negociado con publicidad acelerado")]
    NegociadoConPublicidadAcelerado,
    #[serde(rename = "Negociado sin publicidad")]
    NegociadoSinPublicidad,
    #[serde(rename = "Negociado sin publicidad acelerado")]
    NegociadoSinPublicidadAcelerado,
    #[serde(rename = "Normas Internas")]
    NormasInternas,
    #[serde(rename = "Contrato Menor")]
    ContratoMenor,
    #[serde(rename = "Otros")]
    Otros,
    #[serde(rename = "Restringido")]
    Restringido,
    #[serde(rename = "Simplificado")]
    Simplificado,
    #[default]
    #[serde(rename = "No definido")]
    NoDefinido,
}

/// Lifecycle status of a procurement procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TenderStatus {
    #[serde(rename = "Creada")]
    Creada,
    #[serde(rename = "Anuncio Previo")]
    AnuncioPrevio,
    #[serde(rename = "Anuncio de Licitación")]
    AnuncioDeLicitacion,
    #[serde(rename = "Publicada")]
    Publicada,
    #[serde(rename = "Evaluación Previa")]
    EvaluacionPrevia,
    #[serde(rename = "Evaluación")]
    Evaluacion,
    #[serde(rename = "Adjudicada")]
    Adjudicada,
    #[serde(rename = "Parcialmente Adjudicada")]
    ParcialmenteAdjudicada,
    #[serde(rename = "Resolución Provisional")]
    ResolucionProvisional,
    #[serde(rename = "Resuelta")]
    Resuelta,
    #[serde(rename = "Parcialmente Resuelta")]
    ParcialmenteResuelta,
    #[serde(rename = "Desistida")]
    Desistida,
    #[serde(rename = "Cerrada")]
    Cerrada,
    #[serde(rename = "Anulada")]
    Anulada,
    #[serde(rename = "Realizada")]
    Realizada,
    #[default]
    #[serde(rename = "No definido")]
    NoDefinido,
}

impl TenderStatus {
    /// Whether this status marks a contract award.
    pub fn is_adjudication(self) -> bool {
        self == TenderStatus::Adjudicada
    }
}

/// Role an organization plays in procurement procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayerType {
    #[default]
    #[serde(rename = "public-contracting-institution")]
    PublicContractingInstitution,
    #[serde(rename = "bidder")]
    Bidder,
}

/// Delivery cadence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EmailFrequency {
    #[serde(rename = "real-time")]
    RealTime,
    #[default]
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
}

/// Delivery channel of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NotificationChannel {
    #[default]
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "chat")]
    Chat,
}
