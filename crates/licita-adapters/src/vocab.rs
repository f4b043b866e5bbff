//! Vocabulary tables shared by the Castilian-language feeds. Catalan,
//! Portuguese and EU-feed tables stay local to their adapters.
//!
//! Tables are keyed by the lower-cased slug of the raw value; a miss maps to
//! the documented default (`No definido` for contract types and statuses,
//! `Otros` for procedures) so unknown vocabulary never blocks ingestion.

use licita_core::{ContractType, Procedure, TenderStatus};

use crate::normalize::slugify;

pub fn spanish_contract_type(raw: &str) -> ContractType {
    if raw.trim().is_empty() {
        return ContractType::NoDefinido;
    }
    match slugify(raw).as_str() {
        "suministros" => ContractType::Suministros,
        "servicios" => ContractType::Servicios,
        "obras" => ContractType::Obras,
        "administrativo-especial" => ContractType::AdministrativoEspecial,
        "privado" => ContractType::Privado,
        "gestion-de-servicios-publicos" => ContractType::GestionDeServiciosPublicos,
        "concesion-de-servicios" => ContractType::ConcesionDeServicios,
        "concesion-de-obras-publicas" => ContractType::ConcesionDeObrasPublicas,
        "concesion-de-obras" => ContractType::ConcesionDeObras,
        "colaboracion-entre-el-sector-publico-y-sector-privado" => {
            ContractType::ColaboracionPublicoPrivada
        }
        "patrimonial" => ContractType::Patrimonial,
        "no-definido" => ContractType::NoDefinido,
        _ => ContractType::NoDefinido,
    }
}

pub fn spanish_procedure(raw: &str) -> Procedure {
    if raw.trim().is_empty() {
        return Procedure::Otros;
    }
    match slugify(raw).as_str() {
        "abierto" => Procedure::Abierto,
        "abierto-simplificado" => Procedure::AbiertoSimplificado,
        "asociacion-para-la-innovacion" => Procedure::AsociacionParaLaInnovacion,
        "basado-en-acuerdo-marco" => Procedure::BasadoEnAcuerdoMarco,
        "basado-en-sistema-dinamico-de-adquisicion" => {
            Procedure::BasadoEnSistemaDinamicoDeAdquisicion
        }
        "concurso-de-proyectos" => Procedure::ConcursoDeProyectos,
        "derivado-de-asociacion-para-la-innovacion" => {
            Procedure::DerivadoDeAsociacionParaLaInnovacion
        }
        "derivado-de-acuerdo-marco" => Procedure::DerivadoDeAcuerdoMarco,
        "dialogo-competitivo" => Procedure::DialogoCompetitivo,
        "instruccion-interna-de-contratacion" => Procedure::InstruccionInternaDeContratacion,
        "licitacion-con-negociacion" => Procedure::LicitacionConNegociacion,
        "negociado-con-publicidad" => Procedure::NegociadoConPublicidad,
        "negociado-sin-publicidad" => Procedure::NegociadoSinPublicidad,
        "normas-internas" => Procedure::NormasInternas,
        "contrato-menor" => Procedure::ContratoMenor,
        "otros" => Procedure::Otros,
        "restringido" => Procedure::Restringido,
        "simplificado" => Procedure::Simplificado,
        _ => Procedure::Otros,
    }
}

pub fn spanish_status(raw: &str) -> TenderStatus {
    if raw.trim().is_empty() {
        return TenderStatus::NoDefinido;
    }
    match slugify(raw).as_str() {
        "creada" => TenderStatus::Creada,
        "anuncio-previo" => TenderStatus::AnuncioPrevio,
        "anuncio-de-licitacion" => TenderStatus::AnuncioDeLicitacion,
        "publicada" => TenderStatus::Publicada,
        "evaluacion-previa" => TenderStatus::EvaluacionPrevia,
        "evaluacion" => TenderStatus::Evaluacion,
        "adjudicada" => TenderStatus::Adjudicada,
        "parcialmente-adjudicada" => TenderStatus::ParcialmenteAdjudicada,
        "resolucion-provisional" => TenderStatus::ResolucionProvisional,
        "resuelta" => TenderStatus::Resuelta,
        "parcialmente-resuelta" => TenderStatus::ParcialmenteResuelta,
        "desistida" => TenderStatus::Desistida,
        "cerrada" => TenderStatus::Cerrada,
        "anulada" => TenderStatus::Anulada,
        "realizada" => TenderStatus::Realizada,
        "no-definido" => TenderStatus::NoDefinido,
        _ => TenderStatus::NoDefinido,
    }
}
