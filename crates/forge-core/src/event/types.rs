//! Tipos de evento del run y estructura `ChainEvent`.
//!
//! Rol en el motor:
//! - Cada ejecución emite eventos a un `EventStore` append-only; ese log es
//!   la superficie de observabilidad del core (no hay logging aparte).
//! - Los eventos permiten reconstruir qué se validó, qué se podó, qué
//!   ejecutó y en qué orden, sin estructuras mutables compartidas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ChainBuildError;

/// Contrato observable y estable del motor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChainEventKind {
    /// La cadena pasó validación y pruning. Invariante: primer evento de un
    /// `run_id`; `pruned` lista los steps activos eliminados por no
    /// alcanzar ningún kind final.
    ChainValidated {
        definition_hash: String,
        step_count: usize,
        pruned: Vec<String>,
    },
    /// Un step comenzó su ejecución. No implica éxito.
    StepStarted { step_index: usize, step_id: String },
    /// Un step terminó correctamente, con sus outputs (hashes) y
    /// fingerprint.
    StepFinished {
        step_index: usize,
        step_id: String,
        outputs: Vec<String>,
        fingerprint: String,
    },
    /// Un step terminó con error terminal. El run no continúa
    /// (stop-on-failure, sin record parcial).
    StepFailed {
        step_index: usize,
        step_id: String,
        error: ChainBuildError,
    },
    /// Un step de fase diferida capturó una instrucción en el recorder.
    InstructionRecorded {
        step_id: String,
        target: String,
        seq: u64,
    },
    /// Cierre del run con el fingerprint agregado de la cadena.
    ChainCompleted { chain_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEvent {
    pub seq: u64, // asignado por el EventStore (orden de append)
    pub run_id: Uuid,
    pub kind: ChainEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprints)
}
