//! Errores del core: taxonomía completa de fallos de registro, validación,
//! ciclo, ejecución y grabación diferida.
//!
//! Política de propagación: los problemas de validación se acumulan en una
//! sola pasada (`ChainBuildError::Invalid` lleva TODOS los problemas
//! encontrados, no sólo el primero). Los errores de ejecución abortan el run
//! completo; no hay reintentos ni resultados parciales.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::Multiplicity;

/// Productor declarado pero desactivado por su condición de activación.
/// Se adjunta a `MissingProducer` para explicar el "por qué", no sólo el
/// "qué": el caso real más frecuente es un step apagado por un flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivatedProducer {
    pub step_id: String,
    pub reason: String,
}

/// Problema individual detectado durante la validación del grafo.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationProblem {
    #[error("no producers for required kind '{kind}' consumed by step '{step_id}'")]
    MissingProducer {
        step_id: String,
        kind: String,
        inactive_producers: Vec<DeactivatedProducer>,
    },
    #[error("multiple producers of single kind '{kind}': {producers:?}")]
    MultipleProducers { kind: String, producers: Vec<String> },
    #[error("kind '{kind}' used by step '{step_id}' is not registered")]
    UndeclaredKind { step_id: String, kind: String },
    #[error("initial kind '{kind}' cannot be produced by step '{step_id}'")]
    InitialItemProduced { step_id: String, kind: String },
    #[error("step '{step_id}' produces nothing and is not flagged side-effecting")]
    NoOutputs { step_id: String },
}

/// Error terminal del motor. Variantes de validación se detectan antes de
/// ejecutar cualquier step; variantes de ejecución abortan el run.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChainBuildError {
    #[error("kind '{kind}' already registered as {existing:?}, redeclared as {requested:?}")]
    DuplicateKind {
        kind: String,
        existing: Multiplicity,
        requested: Multiplicity,
    },
    #[error("chain validation failed with {} problem(s)", .problems.len())]
    Invalid { problems: Vec<ValidationProblem> },
    #[error("cycle detected: {}", display_cycle(.path))]
    Cycle { path: Vec<String> },
    #[error("step '{step_id}' failed: {cause}")]
    StepExecution { step_id: String, cause: String },
    #[error("step '{step_id}' recorded non-recordable argument for '{target}': {reason}")]
    NonRecordableArgument {
        step_id: String,
        target: String,
        reason: String,
    },
    #[error("recorder not available to step '{step_id}' (processing-time phase)")]
    RecorderUnavailable { step_id: String },
    #[error("internal: {0}")] Internal(String),
}

/// `[A, B]` se muestra como `A -> B -> A` (el ciclo cerrado).
pub(crate) fn display_cycle(path: &[String]) -> String {
    match path.first() {
        Some(first) => format!("{} -> {}", path.join(" -> "), first),
        None => String::from("<empty>"),
    }
}

impl ChainBuildError {
    /// Azúcar para construir un `Invalid` con un único problema.
    pub fn invalid(problem: ValidationProblem) -> Self {
        ChainBuildError::Invalid { problems: vec![problem] }
    }
}
